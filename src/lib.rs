//! Signed access URL broker: cache-aware SAS token fetching with per-request completion routing
//! for upload pipelines.
//!
//! The crate centers on [`flows::Broker`]: callers ask for a signed URL authorizing one REST verb
//! against one storage resource, the broker answers from its persisted cache when the cached
//! token is still valid, and otherwise submits a fetch through a pluggable [`http::Transport`]
//! and routes the eventual completion back to the waiting caller.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod cache;
pub mod clock;
pub mod error;
pub mod flows;
pub mod http;
pub mod mux;
pub mod obs;
pub mod sas;
pub mod store;
pub mod token;

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use httpmock as _;
#[cfg(all(test, not(feature = "reqwest")))] use tokio as _;
