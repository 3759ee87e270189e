//! Bearer token signing with bounded refresh-on-401 re-authentication for HTTP clients.
//!
//! A [`service::TokenService`] owns the persisted token and the fetcher that mints new
//! ones. [`sign::AuthInterceptor`] attaches the current token to outbound requests, and
//! [`reauth::ReauthHandler`] decides whether a rejected request should be re-signed with a
//! refreshed token or abandoned. With the `reqwest` feature, [`client::AuthClient`] wires the
//! pieces into a complete send/retry loop.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
#[cfg(feature = "reqwest")] pub mod client;
pub mod error;
pub mod fetch;
pub mod obs;
pub mod reauth;
pub mod service;
pub mod sign;
pub mod store;
pub mod users;

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::{Mutex as AsyncMutex, MutexGuard as AsyncMutexGuard};
	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use http;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
