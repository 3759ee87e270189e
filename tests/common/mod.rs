//! Fixtures shared by the integration suites.

#![allow(dead_code)]

// std
use std::{
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration,
};
// self
use bearer_reauth::{
	auth::Token,
	error::ResponseError,
	fetch::{FetchFuture, TokenFetcher},
	service::TokenService,
	sign::{AuthInterceptor, RequestSigner},
	store::MemoryStore,
};

/// Fetcher that returns a fixed token after an optional delay and counts its calls.
pub struct CountingFetcher {
	token: &'static str,
	delay: Duration,
	calls: AtomicUsize,
}
impl CountingFetcher {
	pub fn new(token: &'static str) -> Arc<Self> {
		Self::delayed(token, Duration::ZERO)
	}

	pub fn delayed(token: &'static str, delay: Duration) -> Arc<Self> {
		Arc::new(Self { token, delay, calls: AtomicUsize::new(0) })
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl TokenFetcher for CountingFetcher {
	fn fetch(&self) -> FetchFuture<'_> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		Box::pin(async move {
			if !self.delay.is_zero() {
				tokio::time::sleep(self.delay).await;
			}

			Ok(Token::new(self.token))
		})
	}
}

/// Fetcher whose every call fails, counting the attempts.
#[derive(Default)]
pub struct FailingFetcher {
	calls: AtomicUsize,
}
impl FailingFetcher {
	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl TokenFetcher for FailingFetcher {
	fn fetch(&self) -> FetchFuture<'_> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		Box::pin(async { Err(ResponseError::Status { status: 503 }.into()) })
	}
}

/// Builds a service over an in-memory store seeded with `token`.
pub fn service_with(token: &str, fetcher: Arc<dyn TokenFetcher>) -> (TokenService, MemoryStore) {
	let store = MemoryStore::with_token(token);
	let service = TokenService::new(Arc::new(store.clone()), fetcher);

	(service, store)
}

/// Builds a request already signed with `token`.
pub fn signed_request(token: &str) -> http::Request<()> {
	let request = http::Request::builder()
		.uri("https://api.example.com/api/Users")
		.body(())
		.expect("Fixture request should build.");

	AuthInterceptor.sign(request, &Token::new(token)).expect("Fixture token should be signable.")
}
