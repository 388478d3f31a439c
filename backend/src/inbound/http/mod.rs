//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod comments;
pub mod dto;
pub mod error;
pub mod health;
pub mod identity;
pub mod posts;
pub mod routes;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod token_config;
pub mod validation;

pub use error::ApiResult;
