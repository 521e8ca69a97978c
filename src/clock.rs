//! Time sources used for cache freshness decisions.

// self
use crate::_prelude::*;

/// Wall-clock source injected into the cache so freshness checks stay deterministic in tests.
pub trait Clock
where
	Self: Send + Sync,
{
	/// Returns the current UTC instant.
	fn now(&self) -> OffsetDateTime;
}

/// Production clock backed by the system time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;
impl Clock for SystemClock {
	fn now(&self) -> OffsetDateTime {
		OffsetDateTime::now_utc()
	}
}

/// Manually driven clock for tests and simulations.
#[derive(Clone, Debug)]
pub struct ManualClock(Arc<Mutex<OffsetDateTime>>);
impl ManualClock {
	/// Creates a clock frozen at `instant`.
	pub fn new(instant: OffsetDateTime) -> Self {
		Self(Arc::new(Mutex::new(instant)))
	}

	/// Creates a clock frozen at the provided UNIX timestamp (seconds).
	///
	/// Out-of-range timestamps fall back to the UNIX epoch.
	pub fn at_unix(secs: i64) -> Self {
		Self::new(OffsetDateTime::from_unix_timestamp(secs).unwrap_or(OffsetDateTime::UNIX_EPOCH))
	}

	/// Moves the clock to `instant`.
	pub fn set(&self, instant: OffsetDateTime) {
		*self.0.lock() = instant;
	}

	/// Moves the clock forward by `delta`.
	pub fn advance(&self, delta: Duration) {
		let mut guard = self.0.lock();

		*guard = guard.saturating_add(delta);
	}
}
impl Clock for ManualClock {
	fn now(&self) -> OffsetDateTime {
		*self.0.lock()
	}
}
