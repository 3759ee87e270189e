//! Thread-safe in-memory [`TokenStore`] for tests and short-lived processes.

// self
use crate::{
	_prelude::*,
	auth::Token,
	store::{StoreFuture, TokenStore},
};

/// Keeps the token in-process; clones share the same cell.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Arc<RwLock<Option<Token>>>);
impl MemoryStore {
	/// Creates a store pre-populated with `token`.
	pub fn with_token(token: impl Into<Token>) -> Self {
		Self(Arc::new(RwLock::new(Some(token.into()))))
	}
}
impl TokenStore for MemoryStore {
	fn get(&self) -> StoreFuture<'_, Option<Token>> {
		let cell = self.0.clone();

		Box::pin(async move { Ok(cell.read().clone()) })
	}

	fn set(&self, token: Token) -> StoreFuture<'_, ()> {
		let cell = self.0.clone();

		Box::pin(async move {
			*cell.write() = Some(token);

			Ok(())
		})
	}
}
