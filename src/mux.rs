//! Request multiplexer that owns one pending outcome per correlation id.
//!
//! Each cache miss registers a [`PendingOutcome`] whose one-shot sink feeds the
//! [`PendingToken`] returned to the caller. Completions remove the entry before settling it, so
//! an id never has more than one live entry, an entry never outlives its completion, and the id
//! becomes reusable as soon as its outcome is delivered.

// std
use std::{
	collections::hash_map::Entry,
	task::{Context, Poll},
};
// crates.io
use futures::channel::oneshot;
// self
use crate::{
	_prelude::*,
	token::{RequestId, ResourceKey, SignedUrl},
};

type TokenSender = oneshot::Sender<Result<SignedUrl>>;
type TokenReceiver = oneshot::Receiver<Result<SignedUrl>>;

/// Bookkeeping for one in-flight fetch.
pub struct PendingOutcome {
	/// Correlation id of the request.
	pub id: RequestId,
	/// Resource the fetched token belongs to.
	pub resource: ResourceKey,
	sink: TokenSender,
}
impl PendingOutcome {
	/// Resolves the caller's future with `url`; returns `false` if the caller went away.
	pub fn resolve(self, url: SignedUrl) -> bool {
		self.sink.send(Ok(url)).is_ok()
	}

	/// Rejects the caller's future with `error`; returns `false` if the caller went away.
	pub fn reject(self, error: Error) -> bool {
		self.sink.send(Err(error)).is_ok()
	}
}
impl Debug for PendingOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PendingOutcome")
			.field("id", &self.id)
			.field("resource", &self.resource)
			.field("caller_waiting", &!self.sink.is_canceled())
			.finish()
	}
}

/// Live map of pending outcomes keyed by correlation id.
#[derive(Debug, Default)]
pub struct RequestMultiplexer {
	pending: Mutex<HashMap<RequestId, PendingOutcome>>,
}
impl RequestMultiplexer {
	/// Registers a pending outcome for `id`, failing fast if one is already outstanding.
	///
	/// The existing entry is left untouched on conflict.
	pub fn register(&self, id: RequestId, resource: ResourceKey) -> Result<PendingToken> {
		let mut pending = self.pending.lock();

		match pending.entry(id) {
			Entry::Occupied(entry) => Err(Error::DuplicateRequest { id: entry.key().clone() }),
			Entry::Vacant(entry) => {
				let (sink, receiver) = oneshot::channel();
				let id = entry.key().clone();

				entry.insert(PendingOutcome { id: id.clone(), resource, sink });

				Ok(PendingToken::waiting(id, receiver))
			},
		}
	}

	/// Removes and returns the pending outcome for `id`.
	pub fn take(&self, id: &RequestId) -> Option<PendingOutcome> {
		self.pending.lock().remove(id)
	}

	/// Returns `true` while `id` is waiting for a completion.
	pub fn contains(&self, id: &RequestId) -> bool {
		self.pending.lock().contains_key(id)
	}

	/// Number of outstanding requests.
	pub fn len(&self) -> usize {
		self.pending.lock().len()
	}

	/// Returns `true` when no request is outstanding.
	pub fn is_empty(&self) -> bool {
		self.pending.lock().is_empty()
	}

	/// Snapshot of the outstanding correlation ids.
	pub fn pending_ids(&self) -> Vec<RequestId> {
		self.pending.lock().keys().cloned().collect()
	}
}

/// Future returned by [`Broker::request_token`](crate::flows::Broker::request_token).
///
/// Cache hits and immediate failures arrive already settled; fetches settle when the transport's
/// completion is routed back. Dropping the future does not cancel the fetch.
pub struct PendingToken {
	id: RequestId,
	state: PendingState,
}
impl PendingToken {
	/// Creates a future that is already settled with `result`.
	pub fn ready(id: RequestId, result: Result<SignedUrl>) -> Self {
		Self { id, state: PendingState::Ready(Some(result)) }
	}

	fn waiting(id: RequestId, receiver: TokenReceiver) -> Self {
		Self { id, state: PendingState::Waiting(receiver) }
	}

	/// Correlation id of the request.
	pub fn id(&self) -> &RequestId {
		&self.id
	}

	/// Returns `true` if the outcome was decided without waiting on a transport.
	pub fn is_immediate(&self) -> bool {
		matches!(self.state, PendingState::Ready(_))
	}
}
impl Future for PendingToken {
	type Output = Result<SignedUrl>;

	fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		let this = self.get_mut();

		match &mut this.state {
			PendingState::Ready(slot) => Poll::Ready(
				slot.take().unwrap_or_else(|| Err(Error::Abandoned { id: this.id.clone() })),
			),
			PendingState::Waiting(receiver) => match Pin::new(receiver).poll(cx) {
				Poll::Ready(Ok(result)) => Poll::Ready(result),
				Poll::Ready(Err(oneshot::Canceled)) =>
					Poll::Ready(Err(Error::Abandoned { id: this.id.clone() })),
				Poll::Pending => Poll::Pending,
			},
		}
	}
}
impl Debug for PendingToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PendingToken")
			.field("id", &self.id)
			.field("immediate", &self.is_immediate())
			.finish()
	}
}

enum PendingState {
	Ready(Option<Result<SignedUrl>>),
	Waiting(TokenReceiver),
}

#[cfg(test)]
mod tests {
	// crates.io
	use futures::FutureExt;
	// self
	use super::*;

	fn id(value: &str) -> RequestId {
		RequestId::new(value).expect("Request id fixture should be valid.")
	}

	fn blob() -> ResourceKey {
		ResourceKey::new("blobA").expect("Resource fixture should be valid.")
	}

	#[test]
	fn duplicate_ids_fail_fast_without_replacing_the_entry() {
		let mux = RequestMultiplexer::default();
		let first = mux.register(id("a"), blob()).expect("First registration should succeed.");
		let err = mux
			.register(id("a"), blob())
			.expect_err("Registering a pending id twice should fail.");

		assert!(matches!(err, Error::DuplicateRequest { .. }));
		assert_eq!(mux.len(), 1);

		let outcome = mux.take(&id("a")).expect("Original entry should still be present.");

		assert!(outcome.resolve(SignedUrl::new("https://x")));
		assert_eq!(
			first
				.now_or_never()
				.expect("Resolved token should be ready.")
				.expect("Resolved token should be Ok.")
				.expose(),
			"https://x"
		);
	}

	#[test]
	fn take_frees_the_id_for_reuse() {
		let mux = RequestMultiplexer::default();
		let _token = mux.register(id("a"), blob()).expect("Registration should succeed.");

		assert!(mux.contains(&id("a")));
		assert!(mux.take(&id("a")).is_some());
		assert!(mux.is_empty());
		assert!(mux.take(&id("a")).is_none());

		mux.register(id("a"), blob()).expect("Id should be reusable after removal.");

		assert_eq!(mux.pending_ids(), vec![id("a")]);
	}

	#[test]
	fn dropped_outcome_reports_abandoned() {
		let mux = RequestMultiplexer::default();
		let token = mux.register(id("a"), blob()).expect("Registration should succeed.");

		drop(mux);

		let err = token
			.now_or_never()
			.expect("Dropped sink should settle immediately.")
			.expect_err("Dropped sink should reject.");

		assert!(matches!(err, Error::Abandoned { .. }));
	}

	#[test]
	fn reject_reaches_waiting_caller_and_reports_dropped_callers() {
		let mux = RequestMultiplexer::default();
		let token = mux.register(id("a"), blob()).expect("Registration should succeed.");

		assert!(!token.is_immediate());
		assert!(
			mux.take(&id("a"))
				.expect("Entry should exist.")
				.reject(Error::EmptyResponse { status: Some(200) })
		);
		assert!(matches!(token.now_or_never(), Some(Err(Error::EmptyResponse { .. }))));

		let dropped = mux.register(id("b"), blob()).expect("Registration should succeed.");

		drop(dropped);

		assert!(!mux.take(&id("b")).expect("Entry should exist.").resolve(SignedUrl::new("u")));
	}
}
