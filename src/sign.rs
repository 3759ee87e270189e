//! Bearer request signing for arbitrary HTTP request types.

// crates.io
use http::header::{AUTHORIZATION, HeaderValue};
// self
use crate::{
	_prelude::*,
	auth::{Token, bearer_credential},
};

/// Request types that expose a mutable `Authorization` header.
pub trait AuthorizationTarget {
	/// Current `Authorization` header value, if any.
	fn authorization(&self) -> Option<&HeaderValue>;

	/// Replaces every `Authorization` header with `value`.
	fn set_authorization(&mut self, value: HeaderValue);

	/// Credential carried by a `Bearer` `Authorization` header, if present.
	fn bearer_credential(&self) -> Option<String> {
		self.authorization()
			.and_then(|value| value.to_str().ok())
			.and_then(bearer_credential)
			.map(ToOwned::to_owned)
	}
}
impl<B> AuthorizationTarget for http::Request<B> {
	fn authorization(&self) -> Option<&HeaderValue> {
		self.headers().get(AUTHORIZATION)
	}

	fn set_authorization(&mut self, value: HeaderValue) {
		self.headers_mut().insert(AUTHORIZATION, value);
	}
}
#[cfg(feature = "reqwest")]
impl AuthorizationTarget for reqwest::Request {
	fn authorization(&self) -> Option<&HeaderValue> {
		self.headers().get(AUTHORIZATION)
	}

	fn set_authorization(&mut self, value: HeaderValue) {
		self.headers_mut().insert(AUTHORIZATION, value);
	}
}

/// Describes how to attach a [`Token`] to an outbound request without constraining the
/// HTTP client type.
pub trait RequestSigner<Request>
where
	Self: Send + Sync,
{
	/// Consumes the request and returns it carrying authorization derived from `token`.
	fn sign(&self, request: Request, token: &Token) -> Result<Request>;
}

/// Attaches `Authorization: Bearer <token>` to outbound requests.
///
/// Signing replaces any existing `Authorization` header, so re-signing an already signed
/// request never duplicates the credential. The empty token yields `Bearer ` and is not an
/// error; only tokens with bytes that are illegal in header values are rejected.
#[derive(Clone, Copy, Debug, Default)]
pub struct AuthInterceptor;
impl AuthInterceptor {
	/// Builds the sensitive header value for `token`.
	pub fn header_value(token: &Token) -> Result<HeaderValue> {
		let mut value = HeaderValue::try_from(token.bearer())
			.map_err(|source| Error::InvalidToken { source })?;

		value.set_sensitive(true);

		Ok(value)
	}
}
impl<R> RequestSigner<R> for AuthInterceptor
where
	R: AuthorizationTarget,
{
	fn sign(&self, mut request: R, token: &Token) -> Result<R> {
		request.set_authorization(Self::header_value(token)?);

		Ok(request)
	}
}
