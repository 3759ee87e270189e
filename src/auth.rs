//! Token and response-chain models shared by signing and re-authentication.

pub mod chain;
pub mod token;

pub use chain::*;
pub use token::*;
