// self
use crate::{
	_prelude::*,
	token::{RequestId, ResourceKey},
};

/// Query parameter naming the resource the signed URL is scoped to.
pub const RESOURCE_PARAM: &str = "bloburi";
/// Query parameter naming the REST verb the signed URL must authorize.
pub const VERB_PARAM: &str = "_method";
/// Query parameter whose per-call value defeats intermediate HTTP caches.
pub const CACHE_BUSTER_PARAM: &str = "qqtimestamp";
/// Content type accepted from the token endpoint.
pub const ACCEPT_JSON: &str = "application/json";

/// REST verb that the requested signed URL will authorize.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RestVerb {
	/// `GET`.
	Get,
	#[default]
	/// `PUT`, used for blob and block uploads.
	Put,
	/// `POST`.
	Post,
	/// `DELETE`.
	Delete,
	/// `HEAD`.
	Head,
	/// `PATCH`.
	Patch,
}
impl RestVerb {
	/// Returns the upper-case HTTP method label.
	pub const fn as_str(self) -> &'static str {
		match self {
			RestVerb::Get => "GET",
			RestVerb::Put => "PUT",
			RestVerb::Post => "POST",
			RestVerb::Delete => "DELETE",
			RestVerb::Head => "HEAD",
			RestVerb::Patch => "PATCH",
		}
	}
}
impl Display for RestVerb {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Cross-origin expectations for browser-style transports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CorsPolicy {
	/// The token endpoint lives on another origin.
	pub expected: bool,
	/// Credentials (cookies, auth headers) accompany cross-origin calls.
	pub send_credentials: bool,
}

/// Fully assembled call to the token endpoint, handed to a [`Transport`](crate::http::Transport).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SasRequest {
	/// Correlation id the completion must carry back.
	pub id: RequestId,
	/// Resource the signed URL is scoped to.
	pub resource: ResourceKey,
	/// REST verb the signed URL must authorize.
	pub verb: RestVerb,
	/// Resolved token endpoint.
	pub endpoint: Url,
	/// Value for the `Accept` header.
	pub accept: &'static str,
	/// Custom headers attached to the call.
	pub headers: BTreeMap<String, String>,
	/// CORS expectations for the call.
	pub cors: CorsPolicy,
	/// Per-call cache-busting value, when enabled.
	pub cache_buster: Option<String>,
}
impl SasRequest {
	/// Creates a request with default headers, CORS policy, and no cache buster.
	pub fn new(id: RequestId, resource: ResourceKey, verb: RestVerb, endpoint: Url) -> Self {
		Self {
			id,
			resource,
			verb,
			endpoint,
			accept: ACCEPT_JSON,
			headers: BTreeMap::new(),
			cors: CorsPolicy::default(),
			cache_buster: None,
		}
	}

	/// Replaces the custom headers.
	pub fn with_headers(mut self, headers: BTreeMap<String, String>) -> Self {
		self.headers = headers;

		self
	}

	/// Replaces the CORS policy.
	pub fn with_cors(mut self, cors: CorsPolicy) -> Self {
		self.cors = cors;

		self
	}

	/// Stamps the request with a cache buster derived from `now` (UNIX milliseconds).
	pub fn with_cache_buster(mut self, now: OffsetDateTime) -> Self {
		self.cache_buster = Some((now.unix_timestamp_nanos() / 1_000_000).to_string());

		self
	}

	/// Query parameters the endpoint expects, in wire order.
	pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
		let mut pairs =
			vec![(RESOURCE_PARAM, self.resource.as_ref()), (VERB_PARAM, self.verb.as_str())];

		if let Some(buster) = self.cache_buster.as_deref() {
			pairs.push((CACHE_BUSTER_PARAM, buster));
		}

		pairs
	}

	/// Endpoint URL with [`query_pairs`](Self::query_pairs) appended to any existing query.
	pub fn url(&self) -> Url {
		let mut url = self.endpoint.clone();

		url.query_pairs_mut().extend_pairs(self.query_pairs());

		url
	}
}
