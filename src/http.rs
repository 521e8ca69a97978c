//! Transport primitives for signed URL fetches.
//!
//! The broker never performs HTTP itself. It hands a fully assembled [`SasRequest`] plus a
//! [`CompletionRouter`] to a [`Transport`]; the transport performs the call however it likes
//! (reqwest, a browser bridge, a test double) and later reports exactly one [`Completion`]
//! through the router. Completions may arrive in any order relative to other requests.

// self
use crate::{
	_prelude::*,
	flows::CompletionRouter,
	sas::SasRequest,
	token::RequestId,
};
#[cfg(feature = "reqwest")]
use crate::{
	error::{ConfigError, TransportError},
	obs,
};

/// Status codes treated as success for the token fetch (`GET` only).
pub const SUCCESS_STATUSES: &[u16] = &[200];

/// Executes token endpoint calls on behalf of the broker.
///
/// Implementations must eventually call [`CompletionRouter::complete`] exactly once for every
/// request they accept. Returning `Err` means the request was not accepted; the broker then
/// cleans up and rejects the caller itself, so the router must not be used in that case.
pub trait Transport
where
	Self: 'static + Send + Sync,
{
	/// Accepts `request` for asynchronous execution.
	fn submit(&self, request: SasRequest, router: CompletionRouter) -> Result<()>;
}

/// Raw outcome of one token endpoint call, keyed by correlation id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Completion {
	/// Correlation id of the originating request.
	pub id: RequestId,
	/// HTTP status, or `None` when no response arrived.
	pub status: Option<u16>,
	/// Raw response body (or a failure description when no response arrived).
	pub body: String,
	/// Whether the transport classified the call as failed.
	pub is_error: bool,
}
impl Completion {
	/// Classifies `status` against [`SUCCESS_STATUSES`].
	pub fn from_status(id: RequestId, status: u16, body: impl Into<String>) -> Self {
		let is_error = !SUCCESS_STATUSES.contains(&status);

		Self { id, status: Some(status), body: body.into(), is_error }
	}

	/// A call that never produced an HTTP response.
	pub fn no_response(id: RequestId, reason: impl Into<String>) -> Self {
		Self { id, status: None, body: reason.into(), is_error: true }
	}
}

/// Resolves the token endpoint for a request.
pub trait EndpointResolver
where
	Self: Send + Sync,
{
	/// Returns the endpoint to call for `id`, or `None` if none is configured.
	fn resolve(&self, id: &RequestId) -> Option<Url>;
}
impl<F> EndpointResolver for F
where
	F: Send + Sync + Fn(&RequestId) -> Option<Url>,
{
	fn resolve(&self, id: &RequestId) -> Option<Url> {
		self(id)
	}
}

/// Resolver that returns the same endpoint for every request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaticEndpoint(pub Url);
impl EndpointResolver for StaticEndpoint {
	fn resolve(&self, _id: &RequestId) -> Option<Url> {
		Some(self.0.clone())
	}
}
impl From<Url> for StaticEndpoint {
	fn from(url: Url) -> Self {
		Self(url)
	}
}

/// Default transport issuing `GET` calls with reqwest on the ambient Tokio runtime.
///
/// The CORS policy carried by each request is informational here; it only matters to
/// browser-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client whose calls give up after `timeout`; timed-out calls complete without a
	/// response.
	pub fn with_timeout(timeout: std::time::Duration) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder().timeout(timeout).build()?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl Transport for ReqwestTransport {
	fn submit(&self, request: SasRequest, router: CompletionRouter) -> Result<()> {
		let runtime = tokio::runtime::Handle::try_current().map_err(TransportError::network)?;
		let headers = header_map(&request)?;
		let call = self.0.get(request.url()).headers(headers);
		let id = request.id;

		runtime.spawn(async move {
			let completion = match call.send().await {
				Ok(response) => {
					let status = response.status().as_u16();

					match response.text().await {
						Ok(body) => Completion::from_status(id, status, body),
						Err(e) => {
							obs::log_event!(warn, "Failed to read token response for {id}: {e}");

							Completion::no_response(id, e.to_string())
						},
					}
				},
				Err(e) => {
					obs::log_event!(warn, "Token request for {id} failed: {e}");

					Completion::no_response(id, e.to_string())
				},
			};

			router.complete(completion);
		});

		Ok(())
	}
}

#[cfg(feature = "reqwest")]
fn header_map(request: &SasRequest) -> Result<reqwest::header::HeaderMap> {
	use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};

	let mut headers = HeaderMap::new();

	headers.insert(ACCEPT, HeaderValue::from_static(request.accept));

	for (name, value) in &request.headers {
		let invalid = || ConfigError::InvalidHeader { name: name.clone() };
		let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
		let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;

		headers.insert(header_name, header_value);
	}

	Ok(headers)
}
