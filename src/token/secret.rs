//! Signed URL wrapper that redacts the embedded signature from logs.

// self
use crate::_prelude::*;

/// Redacted signed access URL; the query string carries a bearer credential.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignedUrl(String);
impl SignedUrl {
	/// Wraps a new signed URL string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner URL. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Consumes the wrapper and returns the inner URL.
	pub fn into_inner(self) -> String {
		self.0
	}
}
impl AsRef<str> for SignedUrl {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for SignedUrl {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("SignedUrl").field(&"<redacted>").finish()
	}
}
impl Display for SignedUrl {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let url = SignedUrl::new("https://x/blob?sig=abc");

		assert_eq!(format!("{url:?}"), "SignedUrl(\"<redacted>\")");
		assert_eq!(format!("{url}"), "<redacted>");
		assert_eq!(url.expose(), "https://x/blob?sig=abc");
	}
}
