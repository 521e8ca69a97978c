//! Cache manager that decides whether a persisted signed URL is still usable.
//!
//! [`TokenCache`] is the only writer of the persisted token store. Records are stored as JSON
//! under `"{namespace}{resource}"`, overwritten on every structured fetch, and never deleted:
//! stale entries simply fail the validity check until the next fetch replaces them.

// self
use crate::{
	_prelude::*,
	clock::{Clock, SystemClock},
	obs,
	store::{StoreError, TokenStore},
	token::{CachedToken, ResourceKey, SignedUrl},
};

/// Key prefix used when no namespace is configured.
pub const DEFAULT_NAMESPACE: &str = "sas_broker.sas.";

/// Timestamp-based cache of signed URLs keyed by resource.
#[derive(Clone)]
pub struct TokenCache {
	store: Arc<dyn TokenStore>,
	clock: Arc<dyn Clock>,
	namespace: String,
}
impl TokenCache {
	/// Creates a cache over `store` using the system clock and the default namespace.
	pub fn new(store: Arc<dyn TokenStore>) -> Self {
		Self { store, clock: Arc::new(SystemClock), namespace: DEFAULT_NAMESPACE.into() }
	}

	/// Overrides the clock used for freshness decisions.
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;

		self
	}

	/// Overrides the key namespace.
	pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
		self.namespace = namespace.into();

		self
	}

	/// Current instant according to the configured clock.
	pub fn now(&self) -> OffsetDateTime {
		self.clock.now()
	}

	/// Store key for `resource`.
	pub fn key(&self, resource: &ResourceKey) -> String {
		format!("{}{resource}", self.namespace)
	}

	/// Returns the cached signed URL for `resource` if it is still valid now.
	pub fn lookup(&self, resource: &ResourceKey) -> Option<SignedUrl> {
		self.lookup_at(resource, self.now())
	}

	/// Returns the cached signed URL for `resource` if it is still valid at `now`.
	///
	/// Missing, unreadable, and malformed records all count as absent.
	pub fn lookup_at(&self, resource: &ResourceKey, now: OffsetDateTime) -> Option<SignedUrl> {
		self.record(resource)
			.filter(|record| record.is_valid_at(now))
			.map(|record| record.token_url)
	}

	/// Returns the persisted record for `resource` regardless of freshness.
	pub fn record(&self, resource: &ResourceKey) -> Option<CachedToken> {
		let key = self.key(resource);
		let raw = match self.store.get(&key) {
			Ok(raw) => raw?,
			Err(e) => {
				obs::log_event!(warn, "Failed to read cached token under `{key}`: {e}");

				return None;
			},
		};

		match serde_json::from_str(&raw) {
			Ok(record) => Some(record),
			Err(e) => {
				obs::log_event!(warn, "Ignoring malformed cached token under `{key}`: {e}");

				None
			},
		}
	}

	/// Persists a freshly fetched signed URL, applying the safety margin to `raw_valid_for`.
	pub fn store(
		&self,
		resource: &ResourceKey,
		raw_valid_for: i64,
		token_url: SignedUrl,
	) -> Result<CachedToken, StoreError> {
		self.store_at(resource, raw_valid_for, token_url, self.now())
	}

	/// Same as [`store`](Self::store) with an explicit storage instant.
	pub fn store_at(
		&self,
		resource: &ResourceKey,
		raw_valid_for: i64,
		token_url: SignedUrl,
		now: OffsetDateTime,
	) -> Result<CachedToken, StoreError> {
		let record = CachedToken::issue(token_url, raw_valid_for, now);
		let payload = serde_json::to_string(&record).map_err(|e| StoreError::Serialization {
			message: format!("Failed to serialize cached token: {e}"),
		})?;

		self.store.set(&self.key(resource), payload)?;

		Ok(record)
	}
}
impl Debug for TokenCache {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenCache").field("namespace", &self.namespace).finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{clock::ManualClock, store::MemoryStore};

	struct FailingStore;
	impl TokenStore for FailingStore {
		fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
			Err(StoreError::Backend { message: "offline".into() })
		}

		fn set(&self, _key: &str, _value: String) -> Result<(), StoreError> {
			Err(StoreError::Backend { message: "offline".into() })
		}
	}

	fn resource(value: &str) -> ResourceKey {
		ResourceKey::new(value).expect("Resource fixture should be valid.")
	}

	fn cache_at(secs: i64) -> (TokenCache, Arc<MemoryStore>, ManualClock) {
		let store = Arc::new(MemoryStore::default());
		let clock = ManualClock::at_unix(secs);
		let cache = TokenCache::new(store.clone()).with_clock(Arc::new(clock.clone()));

		(cache, store, clock)
	}

	#[test]
	fn stored_margin_matches_server_validity_minus_fifteen() {
		let (cache, _store, _clock) = cache_at(1_000);
		let blob = resource("blobA");
		let record = cache
			.store(&blob, 100, SignedUrl::new("https://x/blob?sig=abc"))
			.expect("Storing into the memory store should succeed.");

		assert_eq!(record.valid_for_seconds, 85);
		assert_eq!(
			cache.record(&blob).expect("Stored record should be readable.").valid_for_seconds,
			85
		);
	}

	#[test]
	fn lookup_honors_expiry_boundary() {
		let (cache, _store, clock) = cache_at(1_000);
		let blob = resource("blobA");

		cache
			.store(&blob, 60, SignedUrl::new("https://x/blob?sig=abc"))
			.expect("Storing into the memory store should succeed.");

		clock.advance(Duration::seconds(44));

		assert_eq!(
			cache.lookup(&blob).map(|url| url.into_inner()),
			Some("https://x/blob?sig=abc".into())
		);

		clock.advance(Duration::seconds(1));

		assert_eq!(cache.lookup(&blob), None, "Elapsed equal to validity must miss.");
	}

	#[test]
	fn records_are_namespaced_and_overwritten() {
		let (cache, store, _clock) = cache_at(1_000);
		let cache = cache.with_namespace("uploads:");
		let blob = resource("blobA");

		cache.store(&blob, 60, SignedUrl::new("first")).expect("First store should succeed.");
		cache.store(&blob, 90, SignedUrl::new("second")).expect("Second store should succeed.");

		assert_eq!(store.len(), 1);
		assert!(store.get("uploads:blobA").expect("Read should succeed.").is_some());
		assert_eq!(cache.lookup(&blob).map(|url| url.into_inner()), Some("second".into()));
	}

	#[test]
	fn malformed_records_are_treated_as_absent() {
		let (cache, store, _clock) = cache_at(1_000);
		let blob = resource("blobA");

		store.set(&cache.key(&blob), "{not-json".into()).expect("Raw write should succeed.");

		assert_eq!(cache.lookup(&blob), None);
		assert_eq!(cache.record(&blob), None);
	}

	#[test]
	fn backend_failures_read_as_misses_but_surface_on_write() {
		let cache = TokenCache::new(Arc::new(FailingStore));
		let blob = resource("blobA");

		assert_eq!(cache.lookup(&blob), None);

		let err = cache
			.store(&blob, 60, SignedUrl::new("https://x"))
			.expect_err("Write failures should be reported to the caller.");

		assert!(matches!(err, StoreError::Backend { .. }));
	}

	#[test]
	fn zero_effective_validity_never_hits() {
		let (cache, _store, _clock) = cache_at(5_000);
		let blob = resource("blobA");

		cache.store(&blob, 15, SignedUrl::new("https://x")).expect("Store should succeed.");

		assert_eq!(cache.lookup(&blob), None);
	}
}
