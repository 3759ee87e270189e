//! reqwest-backed [`TokenFetcher`] that calls a configured token endpoint.

// self
use crate::{
	_prelude::*,
	auth::Token,
	error::{ResponseError, TransportError},
	fetch::{FetchFuture, FetchMethod, FetcherConfig, TokenFetcher},
};

/// Fetches tokens over HTTP.
///
/// The wrapped client must be a plain [`ReqwestClient`]; routing token calls through an
/// [`AuthClient`](crate::client::AuthClient) would re-enter the refresh section it is
/// serving.
#[derive(Clone, Debug)]
pub struct ReqwestTokenFetcher {
	client: ReqwestClient,
	config: FetcherConfig,
}
impl ReqwestTokenFetcher {
	/// Creates a fetcher with a default reqwest client.
	pub fn new(config: FetcherConfig) -> Self {
		Self::with_client(ReqwestClient::default(), config)
	}

	/// Creates a fetcher that reuses an existing reqwest client.
	pub fn with_client(client: ReqwestClient, config: FetcherConfig) -> Self {
		Self { client, config }
	}

	/// Configuration this fetcher was built from.
	pub fn config(&self) -> &FetcherConfig {
		&self.config
	}

	async fn fetch_now(&self) -> Result<Token> {
		let config = &self.config;
		let request = match config.method {
			FetchMethod::Get => self.client.get(config.endpoint.clone()).query(&config.params),
			FetchMethod::Post => self.client.post(config.endpoint.clone()).form(&config.params),
		};
		let response = request.send().await.map_err(TransportError::from)?;
		let status = response.status();

		if !status.is_success() {
			return Err(ResponseError::Status { status: status.as_u16() }.into());
		}

		let body = response.bytes().await.map_err(TransportError::from)?;

		config.format.decode(&body).map_err(Error::from)
	}
}
impl TokenFetcher for ReqwestTokenFetcher {
	fn fetch(&self) -> FetchFuture<'_> {
		Box::pin(self.fetch_now())
	}
}
