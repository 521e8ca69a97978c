//! Persisted signed URL records and their validity rules.

// self
use crate::{_prelude::*, token::SignedUrl};

/// Seconds deducted from every server-declared validity to absorb clock skew and latency.
pub const SAFETY_MARGIN_SECONDS: i64 = 15;

/// Signed URL persisted per resource together with the data needed to judge its freshness.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedToken {
	/// Signed URL issued by the token endpoint.
	pub token_url: SignedUrl,
	/// Server-declared validity minus [`SAFETY_MARGIN_SECONDS`].
	pub valid_for_seconds: i64,
	/// Client-observed storage instant, truncated to whole seconds.
	#[serde(with = "time::serde::timestamp")]
	pub issued_at: OffsetDateTime,
}
impl CachedToken {
	/// Builds a record from a server response observed at `now`, applying the safety margin.
	pub fn issue(token_url: SignedUrl, raw_valid_for: i64, now: OffsetDateTime) -> Self {
		Self {
			token_url,
			valid_for_seconds: raw_valid_for.saturating_sub(SAFETY_MARGIN_SECONDS),
			issued_at: truncate_to_seconds(now),
		}
	}

	/// Whole seconds elapsed between storage and `now`.
	pub fn elapsed_at(&self, now: OffsetDateTime) -> i64 {
		now.unix_timestamp().saturating_sub(self.issued_at.unix_timestamp())
	}

	/// Returns `true` while the remaining validity strictly exceeds the elapsed time.
	pub fn is_valid_at(&self, now: OffsetDateTime) -> bool {
		self.valid_for_seconds > self.elapsed_at(now)
	}

	/// Instant from which [`is_valid_at`](Self::is_valid_at) reports `false`.
	pub fn expires_at(&self) -> OffsetDateTime {
		self.issued_at.saturating_add(Duration::seconds(self.valid_for_seconds))
	}
}
impl Debug for CachedToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CachedToken")
			.field("token_url", &"<redacted>")
			.field("valid_for_seconds", &self.valid_for_seconds)
			.field("issued_at", &self.issued_at)
			.finish()
	}
}

fn truncate_to_seconds(instant: OffsetDateTime) -> OffsetDateTime {
	instant.replace_nanosecond(0).unwrap_or(instant)
}
