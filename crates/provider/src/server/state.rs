//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::aws::ProviderClients;
use crate::resource::ResourceRegistry;

/// Application state shared across all request handlers.
///
/// All fields are cheaply cloneable so Axum can clone the state per request.
#[derive(Clone)]
pub struct AppState {
    /// Resource type name → implementation.
    pub registry: Arc<ResourceRegistry>,
    /// Clients passed into every lifecycle call.
    pub clients: ProviderClients,
}

impl AppState {
    /// Create a new [`AppState`] from a registry and client bundle.
    pub fn new(registry: ResourceRegistry, clients: ProviderClients) -> Self {
        Self {
            registry: Arc::new(registry),
            clients,
        }
    }
}
