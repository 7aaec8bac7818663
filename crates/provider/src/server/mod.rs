//! Axum server exposing the plugin lifecycle protocol to the host orchestrator.
//!
//! # Responsibilities
//! - Define the Axum router with all routes and shared middleware.
//! - Validate configuration against the resource schema before dispatch.
//! - Inject shared application state (`AppState`) into handlers.

pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;
