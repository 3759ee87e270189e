//! Token acquisition contracts, endpoint configuration, and response decoding.

#[cfg(feature = "reqwest")] pub mod remote;

#[cfg(feature = "reqwest")] pub use remote::ReqwestTokenFetcher;

// self
use crate::{
	_prelude::*,
	auth::Token,
	error::{ConfigError, ResponseError},
};

/// Boxed future returned by [`TokenFetcher::fetch`].
pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<Token>> + 'a + Send>>;

/// Obtains a fresh token from wherever tokens are minted.
///
/// Fetchers only report the token; persisting it is the job of
/// [`TokenService`](crate::service::TokenService).
pub trait TokenFetcher
where
	Self: Send + Sync,
{
	/// Performs one fetch.
	fn fetch(&self) -> FetchFuture<'_>;
}

/// HTTP method used against the token endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FetchMethod {
	/// `GET`, with extra parameters sent as the query string.
	#[default]
	Get,
	/// `POST`, with extra parameters sent as a form body.
	Post,
}

/// JSON field read by [`TokenFormat::default`].
pub const DEFAULT_TOKEN_FIELD: &str = "token";

/// Shape of the token endpoint's response body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenFormat {
	/// JSON object carrying the token in a string field.
	Json {
		/// Field holding the token.
		field: String,
	},
	/// Entire body, trimmed, is the token.
	PlainText,
}
impl TokenFormat {
	/// Decodes a response body into a [`Token`].
	pub fn decode(&self, body: &[u8]) -> Result<Token, ResponseError> {
		match self {
			Self::Json { field } => {
				let mut de = serde_json::Deserializer::from_slice(body);
				let object: serde_json::Map<String, serde_json::Value> =
					serde_path_to_error::deserialize(&mut de)
						.map_err(|source| ResponseError::Parse { source })?;

				object
					.get(field)
					.and_then(serde_json::Value::as_str)
					.map(Token::new)
					.ok_or_else(|| ResponseError::MissingField { field: field.clone() })
			},
			Self::PlainText => std::str::from_utf8(body)
				.map(|text| Token::new(text.trim()))
				.map_err(|source| ResponseError::Encoding { source }),
		}
	}
}
impl Default for TokenFormat {
	fn default() -> Self {
		Self::Json { field: DEFAULT_TOKEN_FIELD.into() }
	}
}

/// Validated description of a token endpoint.
#[derive(Clone, Debug)]
pub struct FetcherConfig {
	/// Endpoint that mints tokens.
	pub endpoint: Url,
	/// HTTP method used for the call.
	pub method: FetchMethod,
	/// How the token is carried in the response body.
	pub format: TokenFormat,
	/// Extra parameters sent with every call.
	pub params: Vec<(String, String)>,
}
impl FetcherConfig {
	/// Starts a builder for the given endpoint.
	pub fn builder(endpoint: Url) -> FetcherConfigBuilder {
		FetcherConfigBuilder {
			endpoint,
			method: FetchMethod::default(),
			format: TokenFormat::default(),
			params: Vec::new(),
		}
	}
}

/// Builder for [`FetcherConfig`].
#[derive(Clone, Debug)]
pub struct FetcherConfigBuilder {
	endpoint: Url,
	method: FetchMethod,
	format: TokenFormat,
	params: Vec<(String, String)>,
}
impl FetcherConfigBuilder {
	/// Overrides the HTTP method (defaults to `GET`).
	pub fn method(mut self, method: FetchMethod) -> Self {
		self.method = method;

		self
	}

	/// Reads the token from the named JSON field (defaults to `token`).
	pub fn json_field(mut self, field: impl Into<String>) -> Self {
		self.format = TokenFormat::Json { field: field.into() };

		self
	}

	/// Treats the whole response body as the token.
	pub fn plain_text(mut self) -> Self {
		self.format = TokenFormat::PlainText;

		self
	}

	/// Adds a parameter sent with every call.
	pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.params.push((name.into(), value.into()));

		self
	}

	/// Validates and returns the configuration.
	pub fn build(self) -> Result<FetcherConfig, ConfigError> {
		let scheme = self.endpoint.scheme();

		if scheme != "http" && scheme != "https" {
			return Err(ConfigError::UnsupportedScheme {
				endpoint: self.endpoint.to_string(),
				scheme: scheme.to_owned(),
			});
		}
		if matches!(&self.format, TokenFormat::Json { field } if field.is_empty()) {
			return Err(ConfigError::EmptyTokenField);
		}

		Ok(FetcherConfig {
			endpoint: self.endpoint,
			method: self.method,
			format: self.format,
			params: self.params,
		})
	}
}
