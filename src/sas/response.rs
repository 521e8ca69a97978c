// self
use crate::{_prelude::*, obs, token::SignedUrl};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StructuredBody {
	sas_url: String,
	valid_for: f64,
}

/// Parsed body of a successful token endpoint response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SasResponse {
	/// JSON object carrying the signed URL and its validity in seconds; safe to cache.
	Structured {
		/// Signed URL issued by the endpoint.
		sas_url: SignedUrl,
		/// Server-declared validity in whole seconds (fractions rounded up), before the safety
		/// margin.
		valid_for: i64,
	},
	/// Anything else; the body itself is handed out as the token and never cached.
	Raw(String),
}
impl SasResponse {
	/// Parses `body`, falling back to [`SasResponse::Raw`] when it is not the structured shape.
	pub fn parse(body: &str) -> Self {
		let mut de = serde_json::Deserializer::from_str(body);

		match serde_path_to_error::deserialize::<_, StructuredBody>(&mut de) {
			Ok(StructuredBody { sas_url, valid_for }) => {
				if de.end().is_err() {
					obs::log_event!(debug, "Token response has trailing data; using the raw body.");

					return Self::Raw(body.to_owned());
				}

				Self::Structured {
					sas_url: SignedUrl::new(sas_url),
					valid_for: whole_seconds(valid_for),
				}
			},
			Err(e) => {
				obs::log_event!(
					debug,
					"Token response is not structured at `{}` ({}); using the raw body.",
					e.path(),
					e.inner()
				);

				Self::Raw(body.to_owned())
			},
		}
	}
}

// Rounding up keeps `valid > elapsed` identical for whole-second `elapsed`; `as` saturates.
fn whole_seconds(secs: f64) -> i64 {
	secs.ceil() as i64
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn structured_body_is_recognized() {
		let parsed = SasResponse::parse("{\"sasUrl\":\"https://x/blob?sig=abc\",\"validFor\":60}");

		assert_eq!(
			parsed,
			SasResponse::Structured {
				sas_url: SignedUrl::new("https://x/blob?sig=abc"),
				valid_for: 60,
			}
		);
	}

	#[test]
	fn bare_token_falls_back_to_raw() {
		let parsed = SasResponse::parse("raw-token-string");

		assert_eq!(parsed, SasResponse::Raw("raw-token-string".into()));
	}

	#[test]
	fn json_missing_fields_falls_back_to_raw() {
		let body = "{\"sasUrl\":\"https://x/blob?sig=abc\"}";

		assert_eq!(SasResponse::parse(body), SasResponse::Raw(body.into()));

		let wrong_type = "{\"sasUrl\":\"https://x\",\"validFor\":\"soon\"}";

		assert_eq!(SasResponse::parse(wrong_type), SasResponse::Raw(wrong_type.into()));
	}

	#[test]
	fn any_json_number_is_accepted_as_validity() {
		for (raw, expected) in [("60.0", 60), ("3600.5", 3_601), ("1e3", 1_000), ("-0.5", 0)] {
			let body = format!("{{\"sasUrl\":\"https://x/blob?sig=abc\",\"validFor\":{raw}}}");

			assert_eq!(
				SasResponse::parse(&body),
				SasResponse::Structured {
					sas_url: SignedUrl::new("https://x/blob?sig=abc"),
					valid_for: expected,
				},
				"validFor {raw} should parse as structured."
			);
		}

		let huge = "{\"sasUrl\":\"https://x\",\"validFor\":1e300}";

		assert!(matches!(
			SasResponse::parse(huge),
			SasResponse::Structured { valid_for: i64::MAX, .. }
		));
	}

	#[test]
	fn trailing_data_falls_back_to_raw() {
		let body = "{\"sasUrl\":\"https://x\",\"validFor\":30} trailing";

		assert_eq!(SasResponse::parse(body), SasResponse::Raw(body.into()));
	}

	#[test]
	fn extra_fields_are_ignored() {
		let parsed =
			SasResponse::parse("{\"sasUrl\":\"https://x\",\"validFor\":30,\"issuer\":\"app\"}");

		assert!(matches!(parsed, SasResponse::Structured { valid_for: 30, .. }));
	}
}
