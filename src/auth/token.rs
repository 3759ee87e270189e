//! Opaque bearer token wrapper that redacts its value.

// self
use crate::_prelude::*;

/// Opaque bearer credential.
///
/// The value carries no structure and no expiry. An absent stored token reads as the empty
/// token, which still produces a (credential-less) `Bearer ` header when signed.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);
impl Token {
	/// Wraps a new token string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns `true` when no credential is held.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Formats the `Authorization` header value (`Bearer <token>`).
	pub fn bearer(&self) -> String {
		format!("{BEARER_PREFIX}{}", self.0)
	}
}
impl AsRef<str> for Token {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl From<String> for Token {
	fn from(value: String) -> Self {
		Self(value)
	}
}
impl From<&str> for Token {
	fn from(value: &str) -> Self {
		Self(value.to_owned())
	}
}
impl Debug for Token {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Token").field(&"<redacted>").finish()
	}
}
impl Display for Token {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Scheme prefix used in `Authorization` header values.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Extracts the credential from a `Bearer <token>` header value, if it has that shape.
pub fn bearer_credential(value: &str) -> Option<&str> {
	value.strip_prefix(BEARER_PREFIX)
}
