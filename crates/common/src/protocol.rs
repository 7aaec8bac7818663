//! Request and response types exchanged between the host orchestrator and the plugin.
//!
//! These types are serialised as JSON over the plugin's HTTP interface. Attribute
//! values travel as plain JSON; the host uses [`StateResponse::sensitive_attributes`]
//! to keep secret attributes out of anything it displays.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Attribute name → JSON value mapping used for both configuration and state.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// Instance state
// ---------------------------------------------------------------------------

/// State of a tracked resource instance as persisted by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceState {
    /// Opaque identifier assigned by the resource at creation.
    pub id: String,
    /// Input and computed attributes recorded at creation.
    #[serde(default)]
    pub attributes: Attributes,
}

// ---------------------------------------------------------------------------
// Lifecycle endpoints
// ---------------------------------------------------------------------------

/// Request body for `POST /v1/resources/:type/create`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRequest {
    /// User configuration for the new instance.
    pub config: Attributes,
}

/// Request body for `POST /v1/resources/:type/read`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadRequest {
    /// Previously persisted state.
    pub state: InstanceState,
    /// Current configuration, when the host has it. Omitted means "unchanged".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Attributes>,
}

/// Request body for `POST /v1/resources/:type/delete`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRequest {
    /// Previously persisted state.
    pub state: InstanceState,
}

/// Response body shared by the create, read, and delete endpoints.
///
/// After a delete, `id` is `null` and `attributes` is empty: the host should
/// drop the instance from tracked state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateResponse {
    /// Instance identifier, or `None` when the instance no longer exists.
    pub id: Option<String>,
    /// Input and computed attributes.
    pub attributes: Attributes,
    /// Names of attributes whose values must be redacted in any display.
    pub sensitive_attributes: Vec<String>,
}

// ---------------------------------------------------------------------------
// Plan endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /v1/resources/:type/plan`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    /// Current state, or `None` when the instance does not exist yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prior: Option<InstanceState>,
    /// Proposed configuration.
    pub config: Attributes,
}

/// What the host must do to converge an instance on its configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanAction {
    /// The instance does not exist and must be created.
    Create,
    /// State already matches configuration.
    NoOp,
    /// The instance must be destroyed and recreated.
    Replace,
}

/// Response body for `POST /v1/resources/:type/plan`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResponse {
    /// Required action.
    pub action: PlanAction,
    /// Changed attributes that force replacement.
    pub requires_replace: Vec<String>,
    /// Human-readable diff lines with sensitive values redacted.
    pub diff: Vec<String>,
}

// ---------------------------------------------------------------------------
// Schema discovery
// ---------------------------------------------------------------------------

/// Description of a single declared attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDescriptor {
    /// Attribute name.
    pub name: String,
    /// Value kind: `"string"` or `"map"`.
    pub kind: String,
    /// Must be supplied by the user.
    pub required: bool,
    /// May be supplied by the user.
    pub optional: bool,
    /// Set by the provider; never user-settable.
    pub computed: bool,
    /// A change forces destroy-then-recreate.
    pub force_new: bool,
    /// Must be redacted in logs and diffs.
    pub sensitive: bool,
}

/// Response body for `GET /v1/schema`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaResponse {
    /// Attribute schema keyed by resource type name.
    pub resources: BTreeMap<String, Vec<AttributeDescriptor>>,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"invalid_input"`).
    pub code: String,
    /// Human-readable description. For KMS failures this is the service's message.
    pub message: String,
    /// Error code reported by the upstream service, when there is one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_code: Option<String>,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            upstream_code: None,
        }
    }
}

impl From<&ProviderError> for ErrorResponse {
    fn from(err: &ProviderError) -> Self {
        let upstream_code = match err {
            ProviderError::EncryptionFailed { code, .. } => code.clone(),
            _ => None,
        };
        Self {
            code: err.code().into(),
            message: err.to_string(),
            upstream_code,
        }
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall plugin status: `"ok"` or `"degraded"`.
    pub status: String,
    /// Number of resource types registered.
    pub resource_types: usize,
}
