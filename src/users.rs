//! User listing endpoint models and the client binding that calls them through
//! [`AuthClient`](crate::client::AuthClient).

// self
use crate::{_prelude::*, auth::Token};
#[cfg(feature = "reqwest")]
use crate::{
	client::AuthClient,
	error::{ConfigError, ResponseError, TransportError},
};

#[cfg(feature = "reqwest")]
const USERS_PATH: &str = "api/Users";

/// One entry of the users listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserItem {
	/// Identifier.
	pub id: i64,
	/// Login name.
	pub login: String,
	/// Display name.
	pub name: String,
	/// Photo reference.
	pub photo: String,
	/// Password hash as stored by the server.
	pub password_hash: String,
	/// Salt for [`UserItem::password_hash`].
	pub password_salt: String,
	/// Token issued to the user.
	pub token: Token,
	/// Creation timestamp, as sent.
	pub created_at: String,
	/// Last update timestamp, as sent.
	pub updated_at: String,
}

/// Thin binding for `/api/Users`.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct UsersApi {
	client: AuthClient,
	users: Url,
}
#[cfg(feature = "reqwest")]
impl UsersApi {
	/// Binds the API rooted at `base` (e.g. `http://localhost:5295/`); a base with a path
	/// must end in `/`.
	pub fn new(client: AuthClient, base: &Url) -> Result<Self, ConfigError> {
		let users = base
			.join(USERS_PATH)
			.map_err(|source| ConfigError::InvalidEndpoint { path: USERS_PATH, source })?;

		Ok(Self { client, users })
	}

	/// Absolute URL of the users collection.
	pub fn endpoint(&self) -> &Url {
		&self.users
	}

	/// Lists one page of users.
	pub async fn users(&self, page: u32) -> Result<Vec<UserItem>> {
		let builder = self.client.get(self.users.clone()).query(&[("page", page)]);
		let response = self.client.send(builder).await?;
		let body = Self::success_body(response).await?;
		let mut de = serde_json::Deserializer::from_slice(&body);

		serde_path_to_error::deserialize(&mut de)
			.map_err(|source| ResponseError::Parse { source }.into())
	}

	/// Creates a user with the given display name.
	pub async fn create_user(&self, name: &str) -> Result<()> {
		let builder = self.client.post(self.users.clone()).form(&[("name", name)]);
		let response = self.client.send(builder).await?;

		Self::success_body(response).await.map(drop)
	}

	async fn success_body(response: reqwest::Response) -> Result<Vec<u8>> {
		let status = response.status();

		if !status.is_success() {
			return Err(ResponseError::Status { status: status.as_u16() }.into());
		}

		Ok(response.bytes().await.map_err(TransportError::from)?.to_vec())
	}
}
