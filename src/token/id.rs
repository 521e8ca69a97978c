//! Strongly typed identifiers for correlation ids and storage resources.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal, $max:expr) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Maximum permitted character count.
			pub const MAX_LEN: usize = $max;

			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view, Self::MAX_LEN)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value, Self::MAX_LEN)?;

				Ok(Self(value))
			}
		}
		impl TryFrom<&str> for $name {
			type Error = IdentifierError;

			fn try_from(value: &str) -> Result<Self, Self::Error> {
				Self::new(value)
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl std::str::FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (request, resource).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (request, resource).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (request, resource).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_id! { RequestId, "Caller-assigned correlation id for one logical token request.", "Request", 128 }
def_id! { ResourceKey, "Identity of the storage resource a signed URL is scoped to (usually a blob URI).", "Resource", 2048 }

impl From<u64> for RequestId {
	fn from(value: u64) -> Self {
		Self(value.to_string())
	}
}

fn validate_view(kind: &'static str, view: &str, max: usize) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.len() > max {
		return Err(IdentifierError::TooLong { kind, max });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_reject_whitespace_and_empty_values() {
		assert!(RequestId::new(" upload-1").is_err(), "Leading whitespace must be rejected.");
		assert!(ResourceKey::new("https://x/blob a").is_err());
		assert!(ResourceKey::new("").is_err());

		let resource = ResourceKey::new("https://account.blob.core.windows.net/c/blobA")
			.expect("Blob URI fixture should be a valid resource key.");

		assert_eq!(resource.as_ref(), "https://account.blob.core.windows.net/c/blobA");
	}

	#[test]
	fn numeric_ids_convert_without_validation_failure() {
		let id = RequestId::from(42_u64);

		assert_eq!(id.as_ref(), "42");
		assert_eq!(format!("{id:?}"), "Request(42)");
	}

	#[test]
	fn length_limits_differ_per_kind() {
		let request_limit = "a".repeat(RequestId::MAX_LEN);

		RequestId::new(&request_limit).expect("Exact length should succeed.");

		assert!(RequestId::new(format!("{request_limit}a")).is_err());

		let long_uri = format!("https://x/{}", "b".repeat(512));

		ResourceKey::new(&long_uri).expect("Blob URIs longer than request ids should be accepted.");
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let id: RequestId =
			serde_json::from_str("\"upload-9\"").expect("Request id should deserialize.");

		assert_eq!(id.as_ref(), "upload-9");
		assert!(serde_json::from_str::<RequestId>("\"with space\"").is_err());
	}

	#[test]
	fn borrow_supports_fast_lookup() {
		let map: HashMap<RequestId, u8> = HashMap::from_iter([(
			RequestId::new("upload-3").expect("Request id used for lookup should be valid."),
			7_u8,
		)]);

		assert_eq!(map.get("upload-3"), Some(&7));
	}
}
