//! Client bundle injected into every resource lifecycle call.

use std::sync::Arc;

use anyhow::Result;
use aws_config::{BehaviorVersion, Region};
use tracing::info;

use super::KmsEncrypt;

/// Bundle of service clients available to resource implementations.
///
/// Cheap to clone; every client is `Arc`-backed.
#[derive(Clone)]
pub struct ProviderClients {
    /// KMS client used by `aws_kms_ciphertext` to encrypt plaintext.
    pub kms: Arc<dyn KmsEncrypt>,
}

impl ProviderClients {
    /// Initialise the AWS SDK clients.
    ///
    /// Credentials and (unless overridden) region are resolved via the standard
    /// AWS provider chains. `kms_endpoint_url` redirects KMS traffic, e.g. to a
    /// local emulator.
    ///
    /// # Errors
    ///
    /// Returns an error if the SDK config cannot be loaded.
    pub async fn init(region: Option<&str>, kms_endpoint_url: Option<&str>) -> Result<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region.to_owned()));
        }
        let sdk_config = loader.load().await;

        let mut kms_config = aws_sdk_kms::config::Builder::from(&sdk_config);
        if let Some(url) = kms_endpoint_url {
            kms_config = kms_config.endpoint_url(url);
        }
        let kms = aws_sdk_kms::Client::from_conf(kms_config.build());

        info!(
            region = sdk_config.region().map(|r| r.as_ref()).unwrap_or("unresolved"),
            custom_endpoint = kms_endpoint_url.is_some(),
            "AWS clients initialised"
        );

        Ok(Self::from_kms(Arc::new(kms)))
    }

    /// Build a bundle around an existing KMS implementation.
    pub fn from_kms(kms: Arc<dyn KmsEncrypt>) -> Self {
        Self { kms }
    }
}
