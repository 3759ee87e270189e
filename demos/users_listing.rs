//! Lists users from a local API, persisting the bearer token in a preferences file.
//!
//! 1. Open a [`FileStore`] so the token survives restarts.
//! 2. Point a [`ReqwestTokenFetcher`] at the endpoint that mints tokens.
//! 3. Wrap both in a [`TokenService`] and hand it to an [`AuthClient`].
//! 4. Call [`UsersApi::users`]; a 401 triggers a refresh and at most three re-signed retries.

// std
use std::{env, sync::Arc};
// crates.io
use color_eyre::Result;
// self
use bearer_reauth::{
	client::AuthClient,
	fetch::{FetchMethod, FetcherConfig, ReqwestTokenFetcher},
	service::TokenService,
	store::FileStore,
	url::Url,
	users::UsersApi,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let base = Url::parse(
		&env::var("USERS_API_BASE").unwrap_or_else(|_| "http://localhost:5295/".into()),
	)?;
	let store = FileStore::open(env::temp_dir().join("bearer_reauth_demo").join("prefs.json"))?;
	let config = FetcherConfig::builder(base.join("api/Users/token")?)
		.method(FetchMethod::Post)
		.param("login", "demo")
		.build()?;
	let service = TokenService::new(Arc::new(store), Arc::new(ReqwestTokenFetcher::new(config)));
	let api = UsersApi::new(AuthClient::new(service.clone()), &base)?;

	for user in api.users(1).await? {
		println!("#{} {} ({})", user.id, user.name, user.login);
	}

	println!(
		"Token refreshes: {} attempted, {} failed.",
		service.refresh_metrics.attempts(),
		service.refresh_metrics.failures()
	);

	Ok(())
}
