//! Entry point that answers token requests from the cache or submits a fetch.

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	flows::Broker,
	http::Transport,
	mux::PendingToken,
	obs::{self, RequestOutcome, RequestSpan, RequestStage},
	sas::SasRequest,
	token::{RequestId, ResourceKey},
};

impl<T> Broker<T>
where
	T: ?Sized + Transport,
{
	/// Requests a signed URL for `resource` under the correlation id `id`.
	///
	/// A still-valid cached token settles the returned future immediately without touching
	/// the transport. Otherwise the request is registered under `id` and submitted; the future
	/// settles when the transport routes the matching completion back. Configuration problems,
	/// an `id` that is already pending, and transports that refuse the request also settle the
	/// future immediately, with an error.
	pub fn request_token(&self, id: impl Into<RequestId>, resource: ResourceKey) -> PendingToken {
		let id = id.into();
		let _span = RequestSpan::new(RequestStage::Request, &id).entered();

		if let Some(url) = self.core.cache.lookup(&resource) {
			obs::log_event!(
				debug,
				"Ignoring token request for {id} because the cached token for {resource} is still \
				 valid."
			);

			self.core.record(RequestOutcome::CacheHit);

			return PendingToken::ready(id, Ok(url));
		}

		match self.fetch(id.clone(), resource) {
			Ok(token) => token,
			Err(e) => {
				obs::log_event!(warn, "Token request {id} failed before reaching the endpoint: {e}");

				self.core.record(RequestOutcome::Failure);

				PendingToken::ready(id, Err(e))
			},
		}
	}

	fn fetch(&self, id: RequestId, resource: ResourceKey) -> Result<PendingToken> {
		let endpoint = self
			.endpoint
			.resolve(&id)
			.ok_or_else(|| ConfigError::MissingEndpoint { id: id.clone() })?;
		let request = SasRequest::new(id.clone(), resource.clone(), self.config.rest_verb, endpoint)
			.with_headers(self.config.custom_headers.clone())
			.with_cors(self.config.cors)
			.with_cache_buster(self.core.cache.now());
		let token = self.core.mux.register(id.clone(), resource)?;

		obs::log_event!(
			debug,
			"Submitting token request for a {} REST request related to {id}.",
			request.verb
		);

		self.core.record(RequestOutcome::Fetch);

		if let Err(e) = self.transport.submit(request, self.router()) {
			self.core.mux.take(&id);

			return Err(e);
		}

		Ok(token)
	}
}
