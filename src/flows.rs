//! Broker facade that ties the cache, the multiplexer, and a transport together.

pub mod config;
pub mod metrics;

mod completion;
mod request;

pub use completion::*;
pub use config::*;
pub use metrics::*;

// self
use crate::{
	_prelude::*,
	cache::TokenCache,
	clock::{Clock, SystemClock},
	http::{EndpointResolver, Transport},
	mux::RequestMultiplexer,
	obs::{self, RequestOutcome},
	store::TokenStore,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Broker specialized for the crate's default reqwest transport.
pub type ReqwestBroker = Broker<ReqwestTransport>;

/// Hands out signed URLs for storage resources.
///
/// The broker owns the transport, the cache over the caller's token store, and the table of
/// pending requests. Each [`request_token`](Broker::request_token) call is answered from the
/// cache when the persisted token is still valid, and otherwise submitted to the transport; the
/// transport later routes the response back through a [`CompletionRouter`].
pub struct Broker<T>
where
	T: ?Sized + Transport,
{
	/// Transport used for every token endpoint call.
	pub transport: Arc<T>,
	/// Request options applied to every fetch.
	pub config: BrokerConfig,
	endpoint: Arc<dyn EndpointResolver>,
	core: Arc<BrokerCore>,
}
impl<T> Broker<T>
where
	T: ?Sized + Transport,
{
	/// Creates a broker with the default configuration and the system clock.
	pub fn with_transport(
		transport: impl Into<Arc<T>>,
		store: Arc<dyn TokenStore>,
		endpoint: impl 'static + EndpointResolver,
	) -> Self {
		Self::builder(transport, store, endpoint).build()
	}

	/// Starts a builder for brokers that need a custom configuration or clock.
	pub fn builder(
		transport: impl Into<Arc<T>>,
		store: Arc<dyn TokenStore>,
		endpoint: impl 'static + EndpointResolver,
	) -> BrokerBuilder<T> {
		BrokerBuilder {
			transport: transport.into(),
			store,
			endpoint: Arc::new(endpoint),
			config: BrokerConfig::default(),
			clock: Arc::new(SystemClock),
		}
	}

	/// Cache consulted before every fetch.
	pub fn cache(&self) -> &TokenCache {
		&self.core.cache
	}

	/// Table of requests still waiting for a completion.
	pub fn pending(&self) -> &RequestMultiplexer {
		&self.core.mux
	}

	/// Per-broker request counters.
	pub fn metrics(&self) -> &RequestMetrics {
		&self.core.metrics
	}

	/// Returns a router that feeds completions into this broker.
	pub fn router(&self) -> CompletionRouter {
		CompletionRouter::new(self.core.clone())
	}
}
#[cfg(feature = "reqwest")]
impl Broker<ReqwestTransport> {
	/// Creates a broker backed by a default reqwest client.
	///
	/// Requests must be made from within a Tokio runtime; the transport spawns each call onto
	/// the ambient runtime.
	pub fn new(store: Arc<dyn TokenStore>, endpoint: impl 'static + EndpointResolver) -> Self {
		Self::with_transport(ReqwestTransport::default(), store, endpoint)
	}
}
impl<T> Clone for Broker<T>
where
	T: ?Sized + Transport,
{
	fn clone(&self) -> Self {
		Self {
			transport: self.transport.clone(),
			config: self.config.clone(),
			endpoint: self.endpoint.clone(),
			core: self.core.clone(),
		}
	}
}
impl<T> Debug for Broker<T>
where
	T: ?Sized + Transport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Broker")
			.field("config", &self.config)
			.field("cache", &self.core.cache)
			.field("pending", &self.core.mux.len())
			.finish()
	}
}

/// Builder for [`Broker`] instances with non-default options.
pub struct BrokerBuilder<T>
where
	T: ?Sized + Transport,
{
	transport: Arc<T>,
	store: Arc<dyn TokenStore>,
	endpoint: Arc<dyn EndpointResolver>,
	config: BrokerConfig,
	clock: Arc<dyn Clock>,
}
impl<T> BrokerBuilder<T>
where
	T: ?Sized + Transport,
{
	/// Replaces the request options.
	pub fn config(mut self, config: BrokerConfig) -> Self {
		self.config = config;

		self
	}

	/// Replaces the clock used for cache freshness decisions.
	pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;

		self
	}

	/// Finalizes the broker.
	pub fn build(self) -> Broker<T> {
		let cache = TokenCache::new(self.store)
			.with_clock(self.clock)
			.with_namespace(self.config.namespace.clone());
		let core = BrokerCore { cache, mux: Default::default(), metrics: Default::default() };

		Broker {
			transport: self.transport,
			config: self.config,
			endpoint: self.endpoint,
			core: Arc::new(core),
		}
	}
}
impl<T> Debug for BrokerBuilder<T>
where
	T: ?Sized + Transport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("BrokerBuilder").field("config", &self.config).finish()
	}
}

/// State shared between a broker and every router it hands out.
#[derive(Debug)]
pub(crate) struct BrokerCore {
	pub(crate) cache: TokenCache,
	pub(crate) mux: RequestMultiplexer,
	pub(crate) metrics: RequestMetrics,
}
impl BrokerCore {
	pub(crate) fn record(&self, outcome: RequestOutcome) {
		self.metrics.record(outcome);

		obs::record_request_outcome(outcome);
	}
}
