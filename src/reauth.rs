//! Re-authentication decisions for requests rejected with HTTP 401.
//!
//! [`ReauthHandler::authenticate`] is what a transport calls after a 401. It walks the
//! [`ResponseChain`] to find how many times this logical request already failed, declines once
//! more than [`MAX_RETRY_DEPTH`] prior responses exist, and otherwise refreshes the token inside
//! the [`TokenService`] refresh section before handing back the re-signed request. Callers that
//! queued behind a refresh reuse its token instead of fetching again.

// self
use crate::{
	_prelude::*,
	auth::{ResponseChain, Token},
	obs::{self, AuthSpan, Outcome, Stage},
	service::TokenService,
	sign::{AuthInterceptor, AuthorizationTarget, RequestSigner},
};

/// Highest retry depth that is still retried.
pub const MAX_RETRY_DEPTH: usize = 2;

/// Decision returned by [`ReauthHandler::authenticate`].
#[derive(Debug)]
pub enum ReauthOutcome<R> {
	/// Resend this request; it carries the refreshed token.
	Retry(R),
	/// Stop retrying and surface the original failure.
	Decline(DeclineReason),
}
impl<R> ReauthOutcome<R> {
	/// Returns the re-signed request, if a retry was granted.
	pub fn into_retry(self) -> Option<R> {
		match self {
			Self::Retry(request) => Some(request),
			Self::Decline(_) => None,
		}
	}

	/// Returns `true` when the handler declined.
	pub fn is_decline(&self) -> bool {
		matches!(self, Self::Decline(_))
	}
}

/// Why a rejected request will not be retried.
#[derive(Debug, ThisError)]
pub enum DeclineReason {
	/// More than [`MAX_RETRY_DEPTH`] prior responses already failed.
	#[error("Retry depth {depth} exceeds the limit of {}.", MAX_RETRY_DEPTH)]
	RetryDepthExceeded {
		/// Observed retry depth.
		depth: usize,
	},
	/// The token could not be refreshed.
	#[error("Token refresh failed.")]
	FetchFailed(#[source] Error),
	/// The refreshed token could not be attached to the request.
	#[error("Refreshed token could not be attached to the request.")]
	SignFailed(#[source] Error),
	/// The response was not an authorization failure.
	#[error("Status {status} is not an authorization failure.")]
	NotUnauthorized {
		/// Observed status.
		status: u16,
	},
}

/// Decides whether a rejected request is refreshed and retried or abandoned.
#[derive(Clone, Debug)]
pub struct ReauthHandler<S = AuthInterceptor> {
	service: TokenService,
	signer: S,
}
impl ReauthHandler {
	/// Creates a handler that re-signs with [`AuthInterceptor`].
	pub fn new(service: TokenService) -> Self {
		Self::with_signer(service, AuthInterceptor)
	}
}
impl<S> ReauthHandler<S> {
	/// Creates a handler with a custom signer.
	pub fn with_signer(service: TokenService, signer: S) -> Self {
		Self { service, signer }
	}

	/// Token service whose refresh section this handler enters.
	pub fn service(&self) -> &TokenService {
		&self.service
	}

	/// Decides what to do with `request`, which was rejected with the head of `failure`.
	///
	/// Awaiting this holds up the caller until the token fetch completes or fails. Failures
	/// are logged and turned into [`ReauthOutcome::Decline`]; they are never returned as
	/// errors.
	pub async fn authenticate<R>(&self, request: R, failure: &ResponseChain) -> ReauthOutcome<R>
	where
		R: AuthorizationTarget,
		S: RequestSigner<R>,
	{
		const STAGE: Stage = Stage::Reauth;

		let depth = failure.retry_depth();
		let span = AuthSpan::new(STAGE, "authenticate");

		obs::record_outcome(STAGE, Outcome::Attempt);

		let outcome = span.instrument(self.decide(request, failure, depth)).await;

		match &outcome {
			ReauthOutcome::Retry(_) => obs::record_outcome(STAGE, Outcome::Success),
			ReauthOutcome::Decline(reason) => {
				obs::debug_declined(reason, depth);
				obs::record_outcome(STAGE, Outcome::Failure);
			},
		}

		outcome
	}

	async fn decide<R>(&self, request: R, failure: &ResponseChain, depth: usize) -> ReauthOutcome<R>
	where
		R: AuthorizationTarget,
		S: RequestSigner<R>,
	{
		if !failure.is_unauthorized() {
			return ReauthOutcome::Decline(DeclineReason::NotUnauthorized {
				status: failure.status(),
			});
		}
		if depth > MAX_RETRY_DEPTH {
			return ReauthOutcome::Decline(DeclineReason::RetryDepthExceeded { depth });
		}

		let rejected = request.bearer_credential();
		let _section = self.service.lock().await;
		let token = match self.refreshed_elsewhere(rejected.as_deref()).await {
			Some(token) => {
				obs::debug_reused(depth);
				self.service.refresh_metrics.record_reuse();

				token
			},
			None => match self.service.fetch_token().await {
				Ok(token) => token,
				Err(e) => {
					obs::warn_fetch_failed(&e);

					return ReauthOutcome::Decline(DeclineReason::FetchFailed(e));
				},
			},
		};

		match self.signer.sign(request, &token) {
			Ok(request) => ReauthOutcome::Retry(request),
			Err(e) => ReauthOutcome::Decline(DeclineReason::SignFailed(e)),
		}
	}

	// A rejected request that carried a different credential than the store now holds lost a
	// race with a refresh that already completed.
	async fn refreshed_elsewhere(&self, rejected: Option<&str>) -> Option<Token> {
		let rejected = rejected?;
		let current = self.service.token().await.ok()?;

		(!current.is_empty() && current.expose() != rejected).then_some(current)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn decline_reasons_render() {
		assert_eq!(
			DeclineReason::RetryDepthExceeded { depth: 3 }.to_string(),
			"Retry depth 3 exceeds the limit of 2."
		);
		assert_eq!(
			DeclineReason::NotUnauthorized { status: 403 }.to_string(),
			"Status 403 is not an authorization failure."
		);
	}

	#[test]
	fn outcome_helpers_expose_the_request() {
		let retry: ReauthOutcome<u8> = ReauthOutcome::Retry(7);
		let decline: ReauthOutcome<u8> =
			ReauthOutcome::Decline(DeclineReason::RetryDepthExceeded { depth: 3 });

		assert!(!retry.is_decline());
		assert_eq!(retry.into_retry(), Some(7));
		assert!(decline.is_decline());
		assert_eq!(decline.into_retry(), None);
	}
}
