//! Broker-level error types shared across the cache, multiplexer, and transports.

// self
use crate::{_prelude::*, token::RequestId};

/// Broker-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical broker error delivered to callers of [`Broker::request_token`].
///
/// [`Broker::request_token`]: crate::flows::Broker::request_token
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Token endpoint answered with a failure status or could not be reached.
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Token endpoint answered with a success status but no body.
	#[error("Empty response.")]
	EmptyResponse {
		/// HTTP status code of the empty response, when known.
		status: Option<u16>,
	},
	/// A request with the same id is still waiting for its completion.
	#[error("Request `{id}` is already pending.")]
	DuplicateRequest {
		/// Correlation id that was reused.
		id: RequestId,
	},
	/// The outcome sink was dropped before any completion was routed to it.
	#[error("Request `{id}` was abandoned before completing.")]
	Abandoned {
		/// Correlation id of the abandoned request.
		id: RequestId,
	},
}
impl Error {
	/// Returns the HTTP status code attached to the failure, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Transport(TransportError::Status { status, .. }) => Some(*status),
			Self::EmptyResponse { status } => *status,
			_ => None,
		}
	}
}

/// Configuration and validation failures raised by the broker.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// No token endpoint could be resolved for the request.
	#[error("No token endpoint is configured for request `{id}`.")]
	MissingEndpoint {
		/// Correlation id whose endpoint lookup failed.
		id: RequestId,
	},
	/// A custom header name or value cannot be sent over HTTP.
	#[error("Custom header `{name}` is invalid.")]
	InvalidHeader {
		/// Offending header name.
		name: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (status, missing response, network).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Token endpoint answered with a status outside the success set.
	#[error("Received response code {status}.")]
	Status {
		/// HTTP status code returned by the token endpoint.
		status: u16,
		/// Raw response body, kept for diagnostics.
		body: String,
	},
	/// The transport reported a failure without any HTTP response.
	#[error("Token endpoint did not respond: {reason}.")]
	NoResponse {
		/// Transport-supplied failure description.
		reason: String,
	},
	/// The transport could not start the call (for example, no async runtime is available).
	#[error("Network error occurred while calling the token endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn status_is_exposed_for_transport_and_empty_failures() {
		let forbidden: Error = TransportError::Status { status: 403, body: String::new() }.into();

		assert_eq!(forbidden.status(), Some(403));
		assert_eq!(forbidden.to_string(), "Received response code 403.");

		let empty = Error::EmptyResponse { status: Some(200) };

		assert_eq!(empty.status(), Some(200));
		assert_eq!(empty.to_string(), "Empty response.");

		let unreachable: Error =
			TransportError::NoResponse { reason: "connection reset".into() }.into();

		assert_eq!(unreachable.status(), None);
	}

	#[test]
	fn duplicate_request_names_the_id() {
		let id = RequestId::new("upload-7").expect("Request id fixture should be valid.");
		let err = Error::DuplicateRequest { id };

		assert_eq!(err.to_string(), "Request `upload-7` is already pending.");
		assert_eq!(err.status(), None);
	}
}
