use common::ProviderError;
use thiserror::Error;

use crate::aws::KmsError;

/// Errors returned by resource lifecycle callbacks.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// Configuration failed schema validation or a required value is missing.
    ///
    /// Messages name the attribute but never include its value.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// KMS rejected the encrypt call. The underlying error is passed through as is.
    #[error(transparent)]
    EncryptionFailed(#[from] KmsError),
}

impl From<ResourceError> for ProviderError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::InvalidInput(msg) => ProviderError::InvalidInput(msg),
            ResourceError::EncryptionFailed(kms) => ProviderError::EncryptionFailed {
                code: kms.code().map(str::to_owned),
                message: kms.to_string(),
            },
        }
    }
}
