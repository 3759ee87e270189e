// self
use crate::{_prelude::*, obs::Stage};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedStage<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedStage<F> = F;

/// A span builder used by the signing transport and the re-authentication handler.
#[derive(Clone, Debug)]
pub struct AuthSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl AuthSpan {
	/// Creates a new span tagged with the provided stage + step.
	pub fn new(stage: Stage, step: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("bearer_reauth.auth", stage = stage.as_str(), step);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (stage, step);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedStage<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Reports a token fetch that failed during re-authentication.
pub fn warn_fetch_failed(error: &Error) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(error = %error, "token fetch failed, declining re-authentication");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = error;
	}
}

/// Reports that a rejected request will not be retried.
pub fn debug_declined(reason: &dyn Display, retry_depth: usize) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(%reason, retry_depth, "re-authentication declined");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (reason, retry_depth);
	}
}

/// Reports that a concurrent refresh already replaced the rejected token.
pub fn debug_reused(retry_depth: usize) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(retry_depth, "reusing token refreshed by a concurrent caller");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = retry_depth;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = AuthSpan::new(Stage::Reauth, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}

	#[test]
	fn log_helpers_accept_any_reason() {
		warn_fetch_failed(&crate::error::ResponseError::Status { status: 500 }.into());
		debug_declined(&"retry depth exceeded", 3);
		debug_reused(0);
	}
}
