//! Catalog error types.
//!
//! These never leave `RemoteCatalog`; they are logged and answered with
//! fallback data.

use thiserror::Error;

/// Errors that can occur when talking to the remote catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog is in offline mode.
    #[error("catalog is offline")]
    Offline,

    /// The API returned a non-success status.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The response body could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
