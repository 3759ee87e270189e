//! Preferences-style [`TokenStore`] persisted as a flat JSON object on disk.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::Token,
	store::{StoreError, StoreFuture, TokenStore},
};

/// Key the token is stored under unless [`FileStore::with_key`] overrides it.
pub const DEFAULT_TOKEN_KEY: &str = "user_id";

type Preferences = BTreeMap<String, String>;

/// Persists the token under a fixed key of a JSON preferences file after each write.
///
/// Other keys found in the file are kept untouched, so the file can be shared with
/// unrelated settings.
///
/// Writes use blocking filesystem calls while holding the store lock; they stall the calling
/// executor thread for the duration of the write.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	key: String,
	inner: Arc<RwLock<Preferences>>,
}
impl FileStore {
	/// Opens (or creates) a store at the provided path, eagerly loading existing data.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = Self::load_snapshot(&path)?;

		Ok(Self { path, key: DEFAULT_TOKEN_KEY.into(), inner: Arc::new(RwLock::new(snapshot)) })
	}

	/// Stores the token under `key` instead of [`DEFAULT_TOKEN_KEY`].
	pub fn with_key(mut self, key: impl Into<String>) -> Self {
		self.key = key.into();

		self
	}

	/// Location of the backing file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load_snapshot(path: &Path) -> Result<Preferences, StoreError> {
		if !path.exists() {
			return Ok(Preferences::new());
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		if bytes.is_empty() {
			return Ok(Preferences::new());
		}

		serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
			message: format!("Failed to parse {}: {e}", path.display()),
		})
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn persist_locked(&self, contents: &Preferences) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let serialized =
			serde_json::to_vec_pretty(contents).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize preferences: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl TokenStore for FileStore {
	fn get(&self) -> StoreFuture<'_, Option<Token>> {
		Box::pin(async move { Ok(self.inner.read().get(&self.key).cloned().map(Token::from)) })
	}

	fn set(&self, token: Token) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let mut guard = self.inner.write();
			let mut next = guard.clone();

			next.insert(self.key.clone(), token.expose().to_owned());
			self.persist_locked(&next)?;

			*guard = next;

			Ok(())
		})
	}
}
