//! Request options shared by every fetch a broker performs.

// self
use crate::{
	_prelude::*,
	cache::DEFAULT_NAMESPACE,
	sas::{CorsPolicy, RestVerb},
};

/// Options applied to every token endpoint call.
///
/// Deserializes from camelCase JSON; absent fields keep their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BrokerConfig {
	/// Cross-origin expectations forwarded to the transport.
	pub cors: CorsPolicy,
	/// Extra headers attached to every fetch.
	pub custom_headers: BTreeMap<String, String>,
	/// REST verb the requested signed URLs must authorize.
	pub rest_verb: RestVerb,
	/// Prefix for cache keys in the token store.
	pub namespace: String,
}
impl BrokerConfig {
	/// Replaces the CORS policy.
	pub fn with_cors(mut self, cors: CorsPolicy) -> Self {
		self.cors = cors;

		self
	}

	/// Adds or replaces one custom header.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.custom_headers.insert(name.into(), value.into());

		self
	}

	/// Replaces the REST verb.
	pub fn with_rest_verb(mut self, verb: RestVerb) -> Self {
		self.rest_verb = verb;

		self
	}

	/// Replaces the cache key prefix.
	pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
		self.namespace = namespace.into();

		self
	}

	/// Parses a configuration from JSON, reporting the path of the first invalid field.
	pub fn from_json(raw: &str) -> Result<Self, serde_path_to_error::Error<serde_json::Error>> {
		let mut de = serde_json::Deserializer::from_str(raw);

		serde_path_to_error::deserialize(&mut de)
	}
}
impl Default for BrokerConfig {
	fn default() -> Self {
		Self {
			cors: CorsPolicy::default(),
			custom_headers: BTreeMap::new(),
			rest_verb: RestVerb::default(),
			namespace: DEFAULT_NAMESPACE.into(),
		}
	}
}
