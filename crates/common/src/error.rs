//! Common error types shared across crates.

use thiserror::Error;

/// Top-level provider error type surfaced to the host orchestrator.
///
/// Variants map to HTTP status codes returned to the host:
/// - [`ProviderError::InvalidInput`] → 400
/// - [`ProviderError::UnknownResourceType`] → 404
/// - [`ProviderError::EncryptionFailed`] → 502
/// - [`ProviderError::Timeout`] → 408
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The resource configuration is missing a required attribute or is malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No resource implementation is registered under the requested type name.
    #[error("unknown resource type: {0}")]
    UnknownResourceType(String),

    /// The upstream KMS call failed. The message is the service's own, unaltered.
    #[error("{message}")]
    EncryptionFailed {
        /// Error code reported by the service (e.g. `AccessDeniedException`), if any.
        code: Option<String>,
        /// Error message reported by the service.
        message: String,
    },

    /// The lifecycle call did not finish within the configured request timeout.
    #[error("request timed out after {0} seconds")]
    Timeout(u64),
}

impl ProviderError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ProviderError::InvalidInput(_) => 400,
            ProviderError::UnknownResourceType(_) => 404,
            ProviderError::EncryptionFailed { .. } => 502,
            ProviderError::Timeout(_) => 408,
        }
    }

    /// Short machine-readable code placed in [`crate::protocol::ErrorResponse::code`].
    pub fn code(&self) -> &'static str {
        match self {
            ProviderError::InvalidInput(_) => "invalid_input",
            ProviderError::UnknownResourceType(_) => "unknown_resource_type",
            ProviderError::EncryptionFailed { .. } => "encryption_failed",
            ProviderError::Timeout(_) => "timeout",
        }
    }
}
