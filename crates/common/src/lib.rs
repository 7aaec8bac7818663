//! Common types, plugin protocol definitions, and errors shared across `kms-provider` crates.

pub mod error;
pub mod protocol;
pub mod sensitive;

pub use error::ProviderError;
pub use sensitive::Sensitive;
