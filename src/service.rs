//! Token service tying the persisted token to the fetcher that renews it.

mod metrics;

pub use metrics::RefreshMetrics;

// self
use crate::{
	_prelude::*,
	auth::Token,
	fetch::TokenFetcher,
	obs::{self, AuthSpan, Outcome, Stage},
	sign::AuthInterceptor,
	store::TokenStore,
};

/// Owns the token store, the fetcher, and the exclusive refresh section.
///
/// Clones share all three, so the refresh section is scoped to the service instance rather
/// than to any one handle.
#[derive(Clone)]
pub struct TokenService {
	/// Store holding the current token.
	pub store: Arc<dyn TokenStore>,
	/// Fetcher that mints new tokens.
	pub fetcher: Arc<dyn TokenFetcher>,
	/// Shared counters for refresh outcomes.
	pub refresh_metrics: Arc<RefreshMetrics>,
	refresh_guard: Arc<AsyncMutex<()>>,
}
impl TokenService {
	/// Creates a service over the provided store and fetcher.
	pub fn new(store: Arc<dyn TokenStore>, fetcher: Arc<dyn TokenFetcher>) -> Self {
		Self {
			store,
			fetcher,
			refresh_metrics: Default::default(),
			refresh_guard: Default::default(),
		}
	}

	/// Current token; the empty token when nothing was saved yet.
	pub async fn token(&self) -> Result<Token> {
		Ok(self.store.get().await?.unwrap_or_default())
	}

	/// Replaces the stored token.
	pub async fn save_token(&self, token: Token) -> Result<()> {
		self.store.set(token).await.map_err(Error::from)
	}

	/// Fetches a fresh token and saves it before returning it.
	///
	/// Tokens that cannot be carried in an `Authorization` header are rejected with
	/// [`Error::InvalidToken`] and never reach the store.
	///
	/// This does not take the refresh section; callers that race other refreshes should
	/// hold [`TokenService::lock`] first.
	pub async fn fetch_token(&self) -> Result<Token> {
		const STAGE: Stage = Stage::Fetch;

		let span = AuthSpan::new(STAGE, "fetch_token");

		obs::record_outcome(STAGE, Outcome::Attempt);
		self.refresh_metrics.record_attempt();

		let result: Result<Token> = span
			.instrument(async {
				let token = self.fetcher.fetch().await?;

				AuthInterceptor::header_value(&token)?;
				self.save_token(token.clone()).await?;

				Ok(token)
			})
			.await;

		match &result {
			Ok(_) => {
				self.refresh_metrics.record_success();
				obs::record_outcome(STAGE, Outcome::Success);
			},
			Err(_) => {
				self.refresh_metrics.record_failure();
				obs::record_outcome(STAGE, Outcome::Failure);
			},
		}

		result
	}

	/// Enters the exclusive refresh section shared by every clone of this service.
	pub async fn lock(&self) -> AsyncMutexGuard<'_, ()> {
		self.refresh_guard.lock().await
	}
}
impl Debug for TokenService {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenService")
			.field("refresh_attempts", &self.refresh_metrics.attempts())
			.field("refresh_failures", &self.refresh_metrics.failures())
			.finish()
	}
}
