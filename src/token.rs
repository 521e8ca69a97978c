//! Token-domain identifiers, signed URL secrets, and cached token records.

pub mod id;
pub mod record;
pub mod secret;

pub use id::*;
pub use record::*;
pub use secret::*;
