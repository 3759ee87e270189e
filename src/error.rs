//! Crate-level error types shared across stores, fetchers, signing, and transports.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Upstream answered with something the client could not use.
	#[error(transparent)]
	Response(#[from] ResponseError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Token contains bytes that cannot appear in an HTTP header value.
	#[error("Token cannot be encoded as an Authorization header value.")]
	InvalidToken {
		/// Header encoding failure.
		#[source]
		source: http::header::InvalidHeaderValue,
	},
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Endpoint uses a scheme other than `http` or `https`.
	#[error("Endpoint `{endpoint}` uses unsupported scheme `{scheme}`.")]
	UnsupportedScheme {
		/// Offending endpoint.
		endpoint: String,
		/// Offending scheme.
		scheme: String,
	},
	/// JSON token format was configured with an empty field name.
	#[error("Token field name must not be empty.")]
	EmptyTokenField,
	/// Endpoint path could not be joined onto the base URL.
	#[error("Endpoint path `{path}` cannot be joined onto the base URL.")]
	InvalidEndpoint {
		/// Relative path that failed to join.
		path: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Unusable upstream responses.
#[derive(Debug, ThisError)]
pub enum ResponseError {
	/// Endpoint answered with a non-success status.
	#[error("Endpoint returned unexpected status {status}.")]
	Status {
		/// HTTP status code.
		status: u16,
	},
	/// Body was not valid JSON for the expected shape.
	#[error("Endpoint returned malformed JSON.")]
	Parse {
		/// Structured parsing failure, including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// JSON body lacked the configured token field or it was not a string.
	#[error("Token response is missing string field `{field}`.")]
	MissingField {
		/// Field that was expected.
		field: String,
	},
	/// Plain-text body was not valid UTF-8.
	#[error("Token response body is not valid UTF-8.")]
	Encoding {
		/// Decoding failure.
		#[source]
		source: std::str::Utf8Error,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the endpoint.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for Error {
	fn from(e: ReqwestError) -> Self {
		TransportError::from(e).into()
	}
}
