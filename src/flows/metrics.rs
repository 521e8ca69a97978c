//! In-process counters for broker requests.

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::obs::RequestOutcome;

/// Thread-safe counters for request outcomes.
#[derive(Debug, Default)]
pub struct RequestMetrics {
	cache_hits: AtomicU64,
	fetches: AtomicU64,
	success: AtomicU64,
	fallback: AtomicU64,
	failure: AtomicU64,
}
impl RequestMetrics {
	/// Returns the number of requests answered from the cache.
	pub fn cache_hits(&self) -> u64 {
		self.cache_hits.load(Ordering::Relaxed)
	}

	/// Returns the number of fetches handed to the transport.
	pub fn fetches(&self) -> u64 {
		self.fetches.load(Ordering::Relaxed)
	}

	/// Returns the number of fetches that resolved with a structured, cacheable body.
	pub fn successes(&self) -> u64 {
		self.success.load(Ordering::Relaxed)
	}

	/// Returns the number of fetches that resolved with a raw body.
	pub fn fallbacks(&self) -> u64 {
		self.fallback.load(Ordering::Relaxed)
	}

	/// Returns the number of requests rejected back to the caller.
	pub fn failures(&self) -> u64 {
		self.failure.load(Ordering::Relaxed)
	}

	pub(crate) fn record(&self, outcome: RequestOutcome) {
		let counter = match outcome {
			RequestOutcome::CacheHit => &self.cache_hits,
			RequestOutcome::Fetch => &self.fetches,
			RequestOutcome::Success => &self.success,
			RequestOutcome::Fallback => &self.fallback,
			RequestOutcome::Failure => &self.failure,
		};

		counter.fetch_add(1, Ordering::Relaxed);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn each_outcome_has_its_own_counter() {
		let metrics = RequestMetrics::default();

		metrics.record(RequestOutcome::CacheHit);
		metrics.record(RequestOutcome::Fetch);
		metrics.record(RequestOutcome::Fetch);
		metrics.record(RequestOutcome::Fallback);

		assert_eq!(metrics.cache_hits(), 1);
		assert_eq!(metrics.fetches(), 2);
		assert_eq!(metrics.successes(), 0);
		assert_eq!(metrics.fallbacks(), 1);
		assert_eq!(metrics.failures(), 0);
	}
}
