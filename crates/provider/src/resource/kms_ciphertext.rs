//! `aws_kms_ciphertext`: encrypts a plaintext under a KMS key and keeps the
//! base64-encoded ciphertext blob as state.
//!
//! Every input is force-new, so an instance is never modified in place. Deleting
//! only forgets the instance; KMS has nothing to clean up.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::Sensitive;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use super::schema::{AttributeKind, AttributeSchema, ResourceSchema};
use super::{Resource, ResourceData, ResourceError};
use crate::aws::{EncryptInput, ProviderClients};

pub const TYPE_NAME: &str = "aws_kms_ciphertext";

pub const PLAINTEXT: &str = "plaintext";
pub const KEY_ID: &str = "key_id";
pub const CONTEXT: &str = "context";
pub const CIPHERTEXT_BLOB: &str = "ciphertext_blob";

static SCHEMA: ResourceSchema = ResourceSchema {
    attributes: &[
        AttributeSchema::required(PLAINTEXT, AttributeKind::String)
            .force_new()
            .sensitive(),
        AttributeSchema::required(KEY_ID, AttributeKind::String).force_new(),
        AttributeSchema::optional(CONTEXT, AttributeKind::Map).force_new(),
        AttributeSchema::computed(CIPHERTEXT_BLOB, AttributeKind::String),
    ],
};

/// The `aws_kms_ciphertext` resource type.
#[derive(Debug, Clone, Copy, Default)]
pub struct CiphertextResource;

#[async_trait]
impl Resource for CiphertextResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> &'static ResourceSchema {
        &SCHEMA
    }

    async fn create(&self, data: &mut ResourceData, clients: &ProviderClients) -> Result<(), ResourceError> {
        let key_id = data.get_str(KEY_ID)?;
        let plaintext = Sensitive::new(data.get_str(PLAINTEXT)?.into_bytes());
        let context = data.get_string_map(CONTEXT)?;

        debug!(key_id = %key_id, with_context = context.is_some(), "KMS encrypt for key");
        let blob = clients
            .kms
            .encrypt(EncryptInput {
                key_id,
                plaintext,
                context,
            })
            .await?;

        data.set_id(Uuid::new_v4().to_string());
        data.set(CIPHERTEXT_BLOB, Value::String(STANDARD.encode(blob)));
        Ok(())
    }

    async fn read(&self, data: &mut ResourceData, clients: &ProviderClients) -> Result<(), ResourceError> {
        // Inputs are force-new, so a compliant host never reaches this branch.
        if data.has_change(PLAINTEXT) || data.has_change(KEY_ID) || data.has_change(CONTEXT) {
            warn!(
                id = data.id().unwrap_or_default(),
                "inputs drifted from stored state; re-encrypting"
            );
            return self.create(data, clients).await;
        }
        Ok(())
    }

    async fn delete(&self, data: &mut ResourceData, _clients: &ProviderClients) -> Result<(), ResourceError> {
        data.clear_id();
        Ok(())
    }
}
