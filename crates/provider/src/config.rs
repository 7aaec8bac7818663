//! Configuration loading and validation for the provider plugin.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any variable is invalid.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Validated provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Port the plugin server listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// AWS region override. Falls back to the standard SDK region chain.
    #[serde(default)]
    pub aws_region: Option<String>,

    /// Custom KMS endpoint (e.g. a local KMS emulator).
    #[serde(default)]
    pub kms_endpoint_url: Option<String>,

    /// OTLP collector endpoint. When unset, only JSON logs are emitted.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Per-request timeout applied to every lifecycle call, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_listen_port() -> u16 {
    7300
}
fn default_log_level() -> String {
    "info".into()
}
fn default_request_timeout() -> u64 {
    30
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is present but cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if let Some(region) = &self.aws_region {
            ensure_non_empty(region, "AWS_REGION")?;
        }
        if let Some(url) = &self.kms_endpoint_url {
            ensure_non_empty(url, "KMS_ENDPOINT_URL")?;
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                anyhow::bail!("KMS_ENDPOINT_URL must be an http:// or https:// URL");
            }
        }
        if let Some(endpoint) = &self.otel_exporter_otlp_endpoint {
            ensure_non_empty(endpoint, "OTEL_EXPORTER_OTLP_ENDPOINT")?;
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be > 0");
        }
        Ok(())
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} must not be empty when set");
    }
    Ok(())
}
