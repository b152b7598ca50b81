//! Provider error types

use std::fmt;

/// Errors that can occur while fetching tile bytes from a server.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// HTTP client could not be built
    ClientBuild(String),
    /// Request could not be sent or the connection failed
    HttpError(String),
    /// Server answered with a non-success status
    Status { status: u16, url: String },
    /// Response body could not be read
    InvalidResponse(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::ClientBuild(msg) => write!(f, "Failed to create HTTP client: {}", msg),
            ProviderError::HttpError(msg) => write!(f, "HTTP error: {}", msg),
            ProviderError::Status { status, url } => write!(f, "HTTP {} from {}", status, url),
            ProviderError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}
