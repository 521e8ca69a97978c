//! Wire-level data for the signed URL endpoint: outgoing request descriptions and the parsed
//! shapes of its responses.
//!
//! `request` assembles everything a transport needs to call the endpoint (resource, REST verb,
//! cache buster, headers, CORS policy) in a client-agnostic form. `response` turns the raw body
//! of a successful call into either a structured, cacheable token or a raw fallback value.

/// Outgoing request descriptions.
pub mod request;
/// Parsed token endpoint responses.
pub mod response;

pub use request::*;
pub use response::*;
