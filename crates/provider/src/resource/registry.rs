//! Resource type name → implementation lookup.

use std::{collections::HashMap, sync::Arc};

use common::protocol::SchemaResponse;
use thiserror::Error;

use super::kms_ciphertext::CiphertextResource;
use super::Resource;

/// Errors from the resource registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The requested type name has no registered implementation.
    #[error("unknown resource type: {0}")]
    UnknownResourceType(String),
}

/// Immutable map of resource type names to their implementations.
///
/// Built once at startup and shared across request handlers behind an `Arc`.
#[derive(Clone, Default)]
pub struct ResourceRegistry {
    resources: HashMap<&'static str, Arc<dyn Resource>>,
}

impl ResourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry containing every resource type this provider ships.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(CiphertextResource));
        registry
    }

    /// Register (or replace) an implementation under its own type name.
    pub fn register(&mut self, resource: Arc<dyn Resource>) {
        self.resources.insert(resource.type_name(), resource);
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Look up a resource implementation by type name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownResourceType`] if `type_name` is not registered.
    pub fn get(&self, type_name: &str) -> Result<Arc<dyn Resource>, RegistryError> {
        self.resources
            .get(type_name)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownResourceType(type_name.to_owned()))
    }

    /// Attribute schemas of every registered type.
    pub fn schema_response(&self) -> SchemaResponse {
        SchemaResponse {
            resources: self
                .resources
                .iter()
                .map(|(name, resource)| ((*name).to_owned(), resource.schema().descriptors()))
                .collect(),
        }
    }
}
