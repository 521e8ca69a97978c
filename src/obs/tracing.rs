// self
use crate::{_prelude::*, obs::RequestStage, token::RequestId};

/// Emits a `tracing` event at the given level, or type-checks the message and drops it when the
/// `tracing` feature is disabled.
macro_rules! log_event {
	($level:ident, $($arg:tt)+) => {{
		#[cfg(feature = "tracing")]
		{
			::tracing::$level!($($arg)+);
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = format_args!($($arg)+);
		}
	}};
}
pub(crate) use log_event;

/// A span builder used around broker requests and completions.
#[derive(Clone, Debug)]
pub struct RequestSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl RequestSpan {
	/// Creates a new span tagged with the provided stage and correlation id.
	pub fn new(stage: RequestStage, id: &RequestId) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("sas_broker.request", stage = stage.as_str(), id = %id);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (stage, id);

			Self {}
		}
	}

	/// Enters the span for synchronous sections.
	pub fn entered(self) -> RequestSpanGuard {
		#[cfg(feature = "tracing")]
		{
			RequestSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			RequestSpanGuard {}
		}
	}
}

/// RAII guard returned by [`RequestSpan::entered`].
pub struct RequestSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for RequestSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("RequestSpanGuard(..)")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn request_span_enters_with_or_without_tracing() {
		let id = RequestId::from(1_u64);
		let _guard = RequestSpan::new(RequestStage::Completion, &id).entered();

		log_event!(debug, "Span smoke test for request {id}.");
	}
}
