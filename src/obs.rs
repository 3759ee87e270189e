//! Optional observability helpers for signing and re-authentication.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `bearer_reauth.auth` with the `stage` and
//!   `step` (call site) fields, plus events for failed fetches and declined retries.
//! - Enable `metrics` to increment the `bearer_reauth_total` counter for every
//!   attempt/success/failure, labeled by `stage` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Stages of the authorization pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
	/// One logical request through the signing transport.
	Request,
	/// Re-authentication decision after a rejected request.
	Reauth,
	/// Token fetch against the minting endpoint.
	Fetch,
}
impl Stage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Stage::Request => "request",
			Stage::Reauth => "reauth",
			Stage::Fetch => "fetch",
		}
	}
}
impl Display for Stage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
	/// Entry to a stage.
	Attempt,
	/// Stage completed (request retried, token fetched, response returned).
	Success,
	/// Stage gave up (retry declined, fetch failed, transport error).
	Failure,
}
impl Outcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Outcome::Attempt => "attempt",
			Outcome::Success => "success",
			Outcome::Failure => "failure",
		}
	}
}
impl Display for Outcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
