//! Thread-safe in-memory [`TokenStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	store::{StoreError, TokenStore},
};

type StoreMap = Arc<RwLock<HashMap<String, String>>>;

/// Thread-safe storage backend that keeps values in-process for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	/// Returns the number of stored keys.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when nothing has been stored yet.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}
}
impl TokenStore for MemoryStore {
	fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
		Ok(self.0.read().get(key).cloned())
	}

	fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
		self.0.write().insert(key.to_owned(), value);

		Ok(())
	}
}
