//! Tile server access.
//!
//! The fetch pipeline only needs "fetch bytes for URL". That capability is
//! the [`AsyncHttpClient`] trait; [`AsyncReqwestClient`] is the production
//! implementation.

mod http;
mod types;

pub use http::{AsyncHttpClient, AsyncReqwestClient, DEFAULT_ACCEPT, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
pub use types::ProviderError;

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;
