//! reqwest transport that signs every request and re-authenticates on HTTP 401.

// crates.io
use reqwest::{IntoUrl, Method, Request, RequestBuilder, Response, StatusCode};
// self
use crate::{
	_prelude::*,
	auth::ResponseChain,
	error::{ConfigError, TransportError},
	obs::{self, AuthSpan, Outcome, Stage},
	reauth::{ReauthHandler, ReauthOutcome},
	service::TokenService,
	sign::{AuthInterceptor, RequestSigner},
};

/// HTTP client that attaches the current bearer token and retries rejected requests.
///
/// Each call to [`AuthClient::execute`] is one logical request with its own
/// [`ResponseChain`], so retry depth always starts at zero. A request is resent only while
/// [`ReauthHandler`] grants a retry; once it declines, the last 401 response is returned as
/// is. Requests whose bodies cannot be cloned (streams) are sent once and never retried.
#[derive(Clone, Debug)]
pub struct AuthClient {
	http: ReqwestClient,
	service: TokenService,
	reauth: ReauthHandler,
}
impl AuthClient {
	/// Creates a client with a default reqwest client.
	pub fn new(service: TokenService) -> Self {
		Self::with_client(ReqwestClient::default(), service)
	}

	/// Creates a client that reuses an existing reqwest client.
	pub fn with_client(http: ReqwestClient, service: TokenService) -> Self {
		let reauth = ReauthHandler::new(service.clone());

		Self { http, service, reauth }
	}

	/// Builds a client from a reqwest builder, surfacing builder failures as configuration
	/// errors.
	pub fn from_builder(
		builder: reqwest::ClientBuilder,
		service: TokenService,
	) -> Result<Self, ConfigError> {
		let http = builder.build().map_err(ConfigError::http_client_build)?;

		Ok(Self::with_client(http, service))
	}

	/// Token service backing this client.
	pub fn service(&self) -> &TokenService {
		&self.service
	}

	/// Starts a request; send it with [`AuthClient::send`].
	pub fn request(&self, method: Method, url: impl IntoUrl) -> RequestBuilder {
		self.http.request(method, url)
	}

	/// Starts a `GET` request.
	pub fn get(&self, url: impl IntoUrl) -> RequestBuilder {
		self.request(Method::GET, url)
	}

	/// Starts a `POST` request.
	pub fn post(&self, url: impl IntoUrl) -> RequestBuilder {
		self.request(Method::POST, url)
	}

	/// Builds and executes a request started from this client.
	pub async fn send(&self, builder: RequestBuilder) -> Result<Response> {
		let request = builder.build().map_err(TransportError::from)?;

		self.execute(request).await
	}

	/// Signs and sends `request`, re-authenticating while the handler grants retries.
	pub async fn execute(&self, request: Request) -> Result<Response> {
		const STAGE: Stage = Stage::Request;

		let span = AuthSpan::new(STAGE, "execute");

		obs::record_outcome(STAGE, Outcome::Attempt);

		let result = span.instrument(self.execute_signed(request)).await;

		match &result {
			Ok(_) => obs::record_outcome(STAGE, Outcome::Success),
			Err(_) => obs::record_outcome(STAGE, Outcome::Failure),
		}

		result
	}

	async fn execute_signed(&self, request: Request) -> Result<Response> {
		let token = self.service.token().await?;
		let mut request = AuthInterceptor.sign(request, &token)?;
		let mut chain: Option<ResponseChain> = None;

		loop {
			let replay = request.try_clone();
			let response = self.http.execute(request).await.map_err(TransportError::from)?;
			let status = response.status();

			if status != StatusCode::UNAUTHORIZED {
				return Ok(response);
			}

			let failure = match chain.take() {
				Some(prior) => prior.then(status.as_u16()),
				None => ResponseChain::new(status.as_u16()),
			};
			let Some(replay) = replay else {
				return Ok(response);
			};

			match self.reauth.authenticate(replay, &failure).await {
				ReauthOutcome::Retry(next) => {
					request = next;
					chain = Some(failure);
				},
				ReauthOutcome::Decline(_) => return Ok(response),
			}
		}
	}
}
