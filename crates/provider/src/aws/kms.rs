//! [`KmsEncrypt`]: the one KMS operation the provider needs, behind a trait.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_kms::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_kms::primitives::Blob;
use common::Sensitive;
use thiserror::Error;

/// Errors produced by the KMS layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KmsError {
    /// The service (or the transport to it) rejected the call.
    ///
    /// `message` is the SDK's own rendering of the failure, unaltered.
    #[error("{message}")]
    Service {
        /// Service error code, e.g. `AccessDeniedException`.
        code: Option<String>,
        /// Full error message.
        message: String,
    },

    /// The call succeeded but the response carried no ciphertext.
    #[error("KMS encrypt response contained no ciphertext blob")]
    MissingCiphertext,
}

impl KmsError {
    /// Service error code, if the failure came from KMS itself.
    pub fn code(&self) -> Option<&str> {
        match self {
            KmsError::Service { code, .. } => code.as_deref(),
            KmsError::MissingCiphertext => None,
        }
    }
}

/// Parameters of a single KMS `Encrypt` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptInput {
    /// Key id, key ARN, alias name, or alias ARN.
    pub key_id: String,
    /// Raw plaintext bytes. Redacted in `Debug` output.
    pub plaintext: Sensitive<Vec<u8>>,
    /// Encryption context. `None` means the field is omitted from the request.
    pub context: Option<HashMap<String, String>>,
}

/// Encrypts plaintext under a KMS key.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KmsEncrypt: Send + Sync {
    /// Call KMS `Encrypt` and return the raw ciphertext blob.
    ///
    /// # Errors
    ///
    /// Returns [`KmsError`] if the service call fails or returns no ciphertext.
    async fn encrypt(&self, input: EncryptInput) -> Result<Vec<u8>, KmsError>;
}

#[async_trait]
impl KmsEncrypt for aws_sdk_kms::Client {
    async fn encrypt(&self, input: EncryptInput) -> Result<Vec<u8>, KmsError> {
        let resp = self
            .encrypt()
            .key_id(input.key_id)
            .plaintext(Blob::new(input.plaintext.into_inner()))
            .set_encryption_context(input.context)
            .send()
            .await
            .map_err(|e| KmsError::Service {
                code: e.code().map(str::to_owned),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        resp.ciphertext_blob()
            .map(|blob| blob.as_ref().to_vec())
            .ok_or(KmsError::MissingCiphertext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypt_input_debug_redacts_plaintext() {
        let input = EncryptInput {
            key_id: "alias/test".into(),
            plaintext: Sensitive::new(b"top secret".to_vec()),
            context: None,
        };
        let rendered = format!("{input:?}");
        assert!(rendered.contains("alias/test"));
        assert!(rendered.contains("REDACTED"));
        // Neither the text nor its byte rendering may leak.
        assert!(!rendered.contains("top secret"));
        assert!(!rendered.contains("116, 111, 112"));
    }

    #[test]
    fn service_error_displays_message_verbatim() {
        let err = KmsError::Service {
            code: Some("AccessDeniedException".into()),
            message: "access denied".into(),
        };
        assert_eq!(err.to_string(), "access denied");
        assert_eq!(err.code(), Some("AccessDeniedException"));
        assert_eq!(KmsError::MissingCiphertext.code(), None);
    }
}
