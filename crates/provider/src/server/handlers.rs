//! Axum request handlers for all plugin endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::protocol::{
    CreateRequest, DeleteRequest, ErrorResponse, HealthResponse, PlanRequest, ReadRequest,
};
use common::ProviderError;
use tracing::{info, warn};

use super::state::AppState;
use crate::resource::{diff, registry::RegistryError, Resource, ResourceData};

/// `POST /v1/resources/:type/plan`: compare stored state with proposed configuration.
pub async fn plan(
    State(state): State<AppState>,
    Path(type_name): Path<String>,
    payload: Result<Json<PlanRequest>, JsonRejection>,
) -> Response {
    let resource = match lookup(&state, &type_name) {
        Ok(r) => r,
        Err(e) => return error_response(&type_name, "plan", e),
    };
    let req = match parse_body(payload) {
        Ok(r) => r,
        Err(e) => return error_response(&type_name, "plan", e),
    };
    if let Err(e) = resource.schema().validate(&req.config) {
        return error_response(&type_name, "plan", e.into());
    }

    let plan = diff::plan(resource.schema(), req.prior.as_ref(), &req.config);
    info!(resource_type = %type_name, action = ?plan.action, "plan computed");
    (StatusCode::OK, Json(plan.into_response())).into_response()
}

/// `POST /v1/resources/:type/create`: create a new instance.
pub async fn create(
    State(state): State<AppState>,
    Path(type_name): Path<String>,
    payload: Result<Json<CreateRequest>, JsonRejection>,
) -> Response {
    let resource = match lookup(&state, &type_name) {
        Ok(r) => r,
        Err(e) => return error_response(&type_name, "create", e),
    };
    let req = match parse_body(payload) {
        Ok(r) => r,
        Err(e) => return error_response(&type_name, "create", e),
    };
    if let Err(e) = resource.schema().validate(&req.config) {
        return error_response(&type_name, "create", e.into());
    }

    let mut data = ResourceData::for_create(resource.schema(), req.config);
    if let Err(e) = resource.create(&mut data, &state.clients).await {
        return error_response(&type_name, "create", e.into());
    }

    info!(resource_type = %type_name, id = data.id().unwrap_or_default(), "resource created");
    (StatusCode::OK, Json(data.into_response())).into_response()
}

/// `POST /v1/resources/:type/read`: refresh an existing instance.
pub async fn read(
    State(state): State<AppState>,
    Path(type_name): Path<String>,
    payload: Result<Json<ReadRequest>, JsonRejection>,
) -> Response {
    let resource = match lookup(&state, &type_name) {
        Ok(r) => r,
        Err(e) => return error_response(&type_name, "read", e),
    };
    let req = match parse_body(payload) {
        Ok(r) => r,
        Err(e) => return error_response(&type_name, "read", e),
    };
    if let Some(config) = &req.config {
        if let Err(e) = resource.schema().validate(config) {
            return error_response(&type_name, "read", e.into());
        }
    }

    let mut data = ResourceData::from_state(resource.schema(), req.state, req.config);
    if let Err(e) = resource.read(&mut data, &state.clients).await {
        return error_response(&type_name, "read", e.into());
    }

    (StatusCode::OK, Json(data.into_response())).into_response()
}

/// `POST /v1/resources/:type/delete`: forget an instance.
pub async fn delete(
    State(state): State<AppState>,
    Path(type_name): Path<String>,
    payload: Result<Json<DeleteRequest>, JsonRejection>,
) -> Response {
    let resource = match lookup(&state, &type_name) {
        Ok(r) => r,
        Err(e) => return error_response(&type_name, "delete", e),
    };
    let req = match parse_body(payload) {
        Ok(r) => r,
        Err(e) => return error_response(&type_name, "delete", e),
    };

    let id = req.state.id.clone();
    let mut data = ResourceData::from_state(resource.schema(), req.state, None);
    if let Err(e) = resource.delete(&mut data, &state.clients).await {
        return error_response(&type_name, "delete", e.into());
    }

    info!(resource_type = %type_name, id = %id, "resource deleted");
    (StatusCode::OK, Json(data.into_response())).into_response()
}

/// `GET /v1/schema`: attribute schemas of every registered resource type.
pub async fn schema(State(state): State<AppState>) -> Response {
    (StatusCode::OK, Json(state.registry.schema_response())).into_response()
}

/// `GET /health`: liveness and readiness check.
///
/// Returns `200 OK` when at least one resource type is registered.
pub async fn health(State(state): State<AppState>) -> Response {
    let resource_types = state.registry.len();
    let (status_code, status_str) = if resource_types > 0 {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    let body = HealthResponse {
        status: status_str.into(),
        resource_types,
    };
    (status_code, Json(body)).into_response()
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested route does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

fn lookup(state: &AppState, type_name: &str) -> Result<Arc<dyn Resource>, ProviderError> {
    state.registry.get(type_name).map_err(|e| match e {
        RegistryError::UnknownResourceType(name) => ProviderError::UnknownResourceType(name),
    })
}

/// Unwrap a JSON body, turning axum's plain-text rejection into [`ProviderError::InvalidInput`].
///
/// The message describes the failure class only; serde's own messages can quote
/// values from the body, which may include sensitive attributes.
fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ProviderError> {
    payload.map(|Json(req)| req).map_err(|rejection| {
        let msg = match rejection {
            JsonRejection::JsonSyntaxError(_) => "request body is not valid JSON",
            JsonRejection::JsonDataError(_) => "request body does not match the expected shape",
            JsonRejection::MissingJsonContentType(_) => {
                "expected request with `Content-Type: application/json`"
            }
            _ => "failed to read request body",
        };
        ProviderError::InvalidInput(msg.into())
    })
}

fn error_response(type_name: &str, operation: &'static str, err: ProviderError) -> Response {
    warn!(resource_type = %type_name, operation, error = %err, "lifecycle call failed");
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::from(&err))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use axum::routing::{get, post};
    use axum::Router;
    use common::protocol::{PlanAction, PlanResponse, StateResponse};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::aws::kms::MockKmsEncrypt;
    use crate::aws::{KmsError, ProviderClients};
    use crate::resource::ResourceRegistry;

    fn test_router(mock: MockKmsEncrypt, registry: ResourceRegistry) -> Router {
        let state = AppState::new(registry, ProviderClients::from_kms(Arc::new(mock)));
        Router::new()
            .route("/health", get(health))
            .route("/v1/resources/:type/plan", post(plan))
            .route("/v1/resources/:type/create", post(create))
            .route("/v1/resources/:type/read", post(read))
            .route("/v1/resources/:type/delete", post(delete))
            .with_state(state)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(resp: Response) -> T {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_returns_503_when_registry_empty() {
        let app = test_router(MockKmsEncrypt::new(), ResourceRegistry::new());
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn create_returns_state_with_sensitive_marking() {
        let mut mock = MockKmsEncrypt::new();
        mock.expect_encrypt()
            .times(1)
            .returning(|_| Ok(vec![0xDE, 0xAD, 0xBE, 0xEF]));
        let app = test_router(mock, ResourceRegistry::with_builtin());

        let resp = app
            .oneshot(post_json(
                "/v1/resources/aws_kms_ciphertext/create",
                json!({"config": {"plaintext": "secret", "key_id": "alias/test"}}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let state: StateResponse = body_json(resp).await;
        assert!(state.id.is_some());
        assert_eq!(state.attributes["ciphertext_blob"], json!("3q2+7w=="));
        assert_eq!(state.sensitive_attributes, vec!["plaintext".to_string()]);
    }

    #[tokio::test]
    async fn create_with_invalid_config_is_400() {
        let mut mock = MockKmsEncrypt::new();
        mock.expect_encrypt().never();
        let app = test_router(mock, ResourceRegistry::with_builtin());

        let resp = app
            .oneshot(post_json(
                "/v1/resources/aws_kms_ciphertext/create",
                json!({"config": {"plaintext": "secret"}}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let err: ErrorResponse = body_json(resp).await;
        assert_eq!(err.code, "invalid_input");
        assert!(!err.message.contains("secret"));
    }

    #[tokio::test]
    async fn kms_failure_is_surfaced_verbatim() {
        let mut mock = MockKmsEncrypt::new();
        mock.expect_encrypt().times(1).returning(|_| {
            Err(KmsError::Service {
                code: Some("AccessDeniedException".into()),
                message: "access denied".into(),
            })
        });
        let app = test_router(mock, ResourceRegistry::with_builtin());

        let resp = app
            .oneshot(post_json(
                "/v1/resources/aws_kms_ciphertext/create",
                json!({"config": {"plaintext": "secret", "key_id": "alias/test"}}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let err: ErrorResponse = body_json(resp).await;
        assert_eq!(err.code, "encryption_failed");
        assert_eq!(err.message, "access denied");
        assert_eq!(err.upstream_code.as_deref(), Some("AccessDeniedException"));
    }

    #[tokio::test]
    async fn unknown_resource_type_is_404() {
        let app = test_router(MockKmsEncrypt::new(), ResourceRegistry::with_builtin());
        let resp = app
            .oneshot(post_json(
                "/v1/resources/aws_kms_key/create",
                json!({"config": {}}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let err: ErrorResponse = body_json(resp).await;
        assert_eq!(err.code, "unknown_resource_type");
    }

    #[tokio::test]
    async fn plan_redacts_plaintext() {
        let app = test_router(MockKmsEncrypt::new(), ResourceRegistry::with_builtin());
        let resp = app
            .oneshot(post_json(
                "/v1/resources/aws_kms_ciphertext/plan",
                json!({
                    "prior": {
                        "id": "abc",
                        "attributes": {"plaintext": "old", "key_id": "k", "ciphertext_blob": "AQ=="}
                    },
                    "config": {"plaintext": "brand-new", "key_id": "k"}
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let plan: PlanResponse = body_json(resp).await;
        assert_eq!(plan.action, PlanAction::Replace);
        assert_eq!(plan.requires_replace, vec!["plaintext".to_string()]);
        assert!(!plan.diff.join("\n").contains("brand-new"));
    }

    #[tokio::test]
    async fn delete_returns_null_id() {
        let mut mock = MockKmsEncrypt::new();
        mock.expect_encrypt().never();
        let app = test_router(mock, ResourceRegistry::with_builtin());
        let resp = app
            .oneshot(post_json(
                "/v1/resources/aws_kms_ciphertext/delete",
                json!({"state": {"id": "abc", "attributes": {"plaintext": "p", "key_id": "k"}}}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let state: StateResponse = body_json(resp).await;
        assert!(state.id.is_none());
        assert!(state.attributes.is_empty());
    }

    #[tokio::test]
    async fn read_with_drifted_config_reencrypts() {
        let mut mock = MockKmsEncrypt::new();
        mock.expect_encrypt()
            .withf(|input| input.key_id == "alias/rotated")
            .times(1)
            .returning(|_| Ok(vec![0xCA, 0xFE]));
        let app = test_router(mock, ResourceRegistry::with_builtin());

        let resp = app
            .oneshot(post_json(
                "/v1/resources/aws_kms_ciphertext/read",
                json!({
                    "state": {
                        "id": "abc",
                        "attributes": {"plaintext": "p", "key_id": "alias/old", "ciphertext_blob": "AQ=="}
                    },
                    "config": {"plaintext": "p", "key_id": "alias/rotated"}
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let state: StateResponse = body_json(resp).await;
        assert!(state.id.is_some_and(|id| id != "abc"));
        assert_eq!(state.attributes["key_id"], json!("alias/rotated"));
        assert_eq!(state.attributes["ciphertext_blob"], json!("yv4="));
    }

    #[tokio::test]
    async fn read_with_invalid_config_is_400() {
        let mut mock = MockKmsEncrypt::new();
        mock.expect_encrypt().never();
        let app = test_router(mock, ResourceRegistry::with_builtin());

        let resp = app
            .oneshot(post_json(
                "/v1/resources/aws_kms_ciphertext/read",
                json!({
                    "state": {"id": "abc", "attributes": {"plaintext": "p", "key_id": "k"}},
                    "config": {"plaintext": "p", "key_id": "k", "ciphertext_blob": "forged"}
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let err: ErrorResponse = body_json(resp).await;
        assert_eq!(err.code, "invalid_input");
    }

    #[tokio::test]
    async fn wrong_body_shape_is_400_error_response() {
        let mut mock = MockKmsEncrypt::new();
        mock.expect_encrypt().never();
        let app = test_router(mock, ResourceRegistry::with_builtin());

        let resp = app
            .oneshot(post_json(
                "/v1/resources/aws_kms_ciphertext/create",
                json!({"config": "top-secret"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let err: ErrorResponse = body_json(resp).await;
        assert_eq!(err.code, "invalid_input");
        assert!(!err.message.contains("top-secret"));
    }
}
