//! Optional observability helpers for broker requests.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `sas_broker.request` with the `stage` and
//!   `id` fields, plus events at every cache and fetch decision.
//! - Enable `metrics` to increment the `sas_broker_request_total` counter labeled by `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

pub(crate) use tracing::log_event;

// self
use crate::_prelude::*;

/// Broker call sites observed by spans.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestStage {
	/// Caller entered [`Broker::request_token`](crate::flows::Broker::request_token).
	Request,
	/// Transport routed a completion back to the broker.
	Completion,
}
impl RequestStage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RequestStage::Request => "request",
			RequestStage::Completion => "completion",
		}
	}
}
impl Display for RequestStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestOutcome {
	/// Served from the cache without a network call.
	CacheHit,
	/// Cache miss that submitted a fetch to the transport.
	Fetch,
	/// Fetch resolved with a structured, cached response.
	Success,
	/// Fetch resolved with a raw, uncached response body.
	Fallback,
	/// Request rejected back to the caller.
	Failure,
}
impl RequestOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RequestOutcome::CacheHit => "cache_hit",
			RequestOutcome::Fetch => "fetch",
			RequestOutcome::Success => "success",
			RequestOutcome::Fallback => "fallback",
			RequestOutcome::Failure => "failure",
		}
	}
}
impl Display for RequestOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
