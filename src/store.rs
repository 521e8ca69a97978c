//! Key-value persistence contract and built-in stores for cached signed URLs.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::_prelude::*;

/// String key-value backend that persists cached token records beyond the broker's lifetime.
///
/// Keys are namespaced by the cache manager; values are opaque strings (serialized records).
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Returns the value stored under `key`, if present.
	fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

	/// Persists `value` under `key`, replacing any previous value.
	fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
