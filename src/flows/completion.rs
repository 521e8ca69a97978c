//! Routes transport completions back to the callers waiting on them.

// self
use crate::{
	_prelude::*,
	error::TransportError,
	flows::BrokerCore,
	http::Completion,
	obs::{self, RequestOutcome, RequestSpan, RequestStage},
	sas::SasResponse,
	token::{ResourceKey, SignedUrl},
};

/// Handle through which a [`Transport`](crate::http::Transport) reports completions.
///
/// Routers are cheap to clone and may be moved onto other threads or tasks.
#[derive(Clone)]
pub struct CompletionRouter(Arc<BrokerCore>);
impl CompletionRouter {
	pub(crate) fn new(core: Arc<BrokerCore>) -> Self {
		Self(core)
	}

	/// Settles the request identified by `completion.id`.
	///
	/// The pending entry is removed before the caller is notified, so the id can be reused
	/// right away. Returns `false` when no request with that id is pending; such completions
	/// are logged and dropped.
	pub fn complete(&self, completion: Completion) -> bool {
		let Completion { id, status, body, is_error } = completion;
		let _span = RequestSpan::new(RequestStage::Completion, &id).entered();
		let Some(outcome) = self.0.mux.take(&id) else {
			obs::log_event!(warn, "Dropping completion for unknown request {id}.");

			return false;
		};
		let delivered = match self.0.settle(&outcome.resource, status, body, is_error) {
			Ok(url) => outcome.resolve(url),
			Err(e) => outcome.reject(e),
		};

		if !delivered {
			obs::log_event!(debug, "Caller for request {id} stopped waiting before completion.");
		}

		true
	}
}
impl Debug for CompletionRouter {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CompletionRouter").field("pending", &self.0.mux.len()).finish()
	}
}

impl BrokerCore {
	fn settle(
		&self,
		resource: &ResourceKey,
		status: Option<u16>,
		body: String,
		is_error: bool,
	) -> Result<SignedUrl> {
		if is_error {
			self.record(RequestOutcome::Failure);

			let err = match status {
				Some(status) => TransportError::Status { status, body },
				None => TransportError::NoResponse { reason: body },
			};

			obs::log_event!(warn, "Token request for {resource} failed: {err}");

			return Err(err.into());
		}
		if body.is_empty() {
			self.record(RequestOutcome::Failure);

			obs::log_event!(warn, "Token endpoint returned an empty body for {resource}.");

			return Err(Error::EmptyResponse { status });
		}

		match SasResponse::parse(&body) {
			SasResponse::Structured { sas_url, valid_for } => {
				if let Err(e) = self.cache.store(resource, valid_for, sas_url.clone()) {
					obs::log_event!(warn, "Failed to cache the signed URL for {resource}: {e}");
				}

				self.record(RequestOutcome::Success);

				Ok(sas_url)
			},
			SasResponse::Raw(raw) => {
				obs::log_event!(debug, "Handing out an uncached raw token for {resource}.");

				self.record(RequestOutcome::Fallback);

				Ok(SignedUrl::new(raw))
			},
		}
	}
}
