//! Resource framework and the resource types this provider serves.
//!
//! # Lifecycle
//!
//! 1. The host asks for a plan; [`diff::plan`] compares stored state with the
//!    proposed configuration. Any change to a force-new attribute yields a
//!    replacement, never an in-place update.
//! 2. `create` is called for new instances. The configuration has already
//!    passed [`ResourceSchema::validate`].
//! 3. `read` refreshes an existing instance.
//! 4. `delete` forgets the instance; the host drops it from tracked state.
//!
//! Every callback receives the [`ProviderClients`] bundle explicitly. Resources
//! hold no state of their own between calls.

pub mod data;
pub mod diff;
pub mod error;
pub mod kms_ciphertext;
pub mod registry;
pub mod schema;

pub use data::ResourceData;
pub use error::ResourceError;
pub use registry::ResourceRegistry;
pub use schema::ResourceSchema;

use async_trait::async_trait;

use crate::aws::ProviderClients;

/// A declarative resource type exposed to the host.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Name the host uses to address this resource type, e.g. `aws_kms_ciphertext`.
    fn type_name(&self) -> &'static str;

    /// Declared attributes.
    fn schema(&self) -> &'static ResourceSchema;

    /// Bring a new instance into existence and populate computed attributes.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if inputs are invalid or an upstream call fails.
    /// The id must remain unset on error.
    async fn create(&self, data: &mut ResourceData, clients: &ProviderClients) -> Result<(), ResourceError>;

    /// Refresh an existing instance.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if a refresh requires an upstream call that fails.
    async fn read(&self, data: &mut ResourceData, clients: &ProviderClients) -> Result<(), ResourceError>;

    /// Remove an instance. Implementations signal removal via [`ResourceData::clear_id`].
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if an upstream call fails.
    async fn delete(&self, data: &mut ResourceData, clients: &ProviderClients) -> Result<(), ResourceError>;
}
