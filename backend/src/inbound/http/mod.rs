//! HTTP inbound adapter exposing the account endpoints.

pub mod envelope;
pub mod error;
pub mod health;
pub mod payload;
pub mod routes;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod users;
pub(crate) mod validation;

pub use error::ApiResult;
