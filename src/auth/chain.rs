//! Prior-response history used to bound re-authentication depth.

// self
use crate::_prelude::*;

/// HTTP status that triggers re-authentication.
pub const UNAUTHORIZED: u16 = 401;

/// Failed response for one logical request, linked to the responses that preceded it.
///
/// The transport builds a fresh chain for every logical request and extends it with
/// [`ResponseChain::then`] each time a retried attempt fails again, so the depth never
/// decreases within one request and starts from zero for the next one.
#[derive(Clone, PartialEq, Eq)]
pub struct ResponseChain {
	status: u16,
	prior: Option<Box<ResponseChain>>,
}
impl ResponseChain {
	/// Starts a chain for the first failed response of a logical request.
	pub fn new(status: u16) -> Self {
		Self { status, prior: None }
	}

	/// Records another failed response, keeping `self` as its prior response.
	pub fn then(self, status: u16) -> Self {
		Self { status, prior: Some(Box::new(self)) }
	}

	/// Status of the most recent response.
	pub fn status(&self) -> u16 {
		self.status
	}

	/// Response that preceded this one, if any.
	pub fn prior(&self) -> Option<&ResponseChain> {
		self.prior.as_deref()
	}

	/// Whether the most recent response is an authorization failure.
	pub fn is_unauthorized(&self) -> bool {
		self.status == UNAUTHORIZED
	}

	/// Number of prior responses reachable through the back-links.
	pub fn retry_depth(&self) -> usize {
		let mut current = self.prior();
		let mut depth = 0;

		while let Some(response) = current {
			depth += 1;
			current = response.prior();
		}

		depth
	}
}
impl Debug for ResponseChain {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ResponseChain")
			.field("status", &self.status)
			.field("retry_depth", &self.retry_depth())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn depth_counts_prior_links() {
		let first = ResponseChain::new(UNAUTHORIZED);

		assert_eq!(first.retry_depth(), 0);
		assert!(first.prior().is_none());

		let third = first.then(UNAUTHORIZED).then(UNAUTHORIZED);

		assert_eq!(third.retry_depth(), 2);
		assert_eq!(third.prior().map(ResponseChain::retry_depth), Some(1));

		let fourth = third.then(UNAUTHORIZED);

		assert_eq!(fourth.retry_depth(), 3);
	}

	#[test]
	fn head_status_drives_unauthorized_check() {
		let chain = ResponseChain::new(UNAUTHORIZED).then(403);

		assert!(!chain.is_unauthorized());
		assert_eq!(chain.status(), 403);
		assert!(chain.prior().is_some_and(ResponseChain::is_unauthorized));
		assert_eq!(format!("{chain:?}"), "ResponseChain { status: 403, retry_depth: 1 }");
	}
}
