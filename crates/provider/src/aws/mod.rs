//! AWS SDK client initialisation and the KMS encrypt seam.
//!
//! Resources never build their own SDK clients. A single [`ProviderClients`]
//! bundle is created at startup and passed explicitly into every lifecycle call,
//! which lets tests substitute a mock [`KmsEncrypt`] implementation.

pub mod clients;
pub mod kms;

pub use clients::ProviderClients;
pub use kms::{EncryptInput, KmsEncrypt, KmsError};
