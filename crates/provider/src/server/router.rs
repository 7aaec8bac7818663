//! Axum router construction.

use std::time::Duration;

use axum::{
    middleware::map_response_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};

use super::{handlers, middleware, state::AppState};

/// Build the application [`Router`] with all routes and middleware attached.
pub fn build(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/v1/schema", get(handlers::schema))
        .route("/v1/resources/:type/plan", post(handlers::plan))
        .route("/v1/resources/:type/create", post(handlers::create))
        .route("/v1/resources/:type/read", post(handlers::read))
        .route("/v1/resources/:type/delete", post(handlers::delete))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(map_response_with_state(
            request_timeout.as_secs(),
            middleware::timeout_response,
        ))
        .layer(CompressionLayer::new())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{body::Body, http::Request};
    use axum_test::TestServer;
    use common::protocol::{ErrorResponse, SchemaResponse, StateResponse};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::aws::kms::MockKmsEncrypt;
    use crate::aws::ProviderClients;
    use crate::resource::ResourceRegistry;

    fn app(mock: MockKmsEncrypt) -> Router {
        let state = AppState::new(
            ResourceRegistry::with_builtin(),
            ProviderClients::from_kms(Arc::new(mock)),
        );
        build(state, Duration::from_secs(30))
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let req = Request::builder()
            .uri("/unknown")
            .body(Body::empty())
            .unwrap();
        let resp = app(MockKmsEncrypt::new()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn health_route_exists() {
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let resp = app(MockKmsEncrypt::new()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), 200);
    }

    #[tokio::test]
    async fn schema_lists_ciphertext_resource() {
        let server = TestServer::new(app(MockKmsEncrypt::new())).unwrap();
        let resp = server.get("/v1/schema").await;
        resp.assert_status_ok();
        let schema: SchemaResponse = resp.json();
        assert!(schema.resources.contains_key("aws_kms_ciphertext"));
    }

    #[tokio::test]
    async fn malformed_bodies_return_error_response() {
        let mut mock = MockKmsEncrypt::new();
        mock.expect_encrypt().never();
        let server = TestServer::new(app(mock)).unwrap();

        let bodies = [
            "not json",
            r#"{"config": {"plaintext": "secret""#,
            r#"{"config": "secret"}"#,
        ];
        for body in bodies {
            let resp = server
                .post("/v1/resources/aws_kms_ciphertext/create")
                .content_type("application/json")
                .bytes(body.as_bytes().to_vec().into())
                .await;
            resp.assert_status_bad_request();
            let err: ErrorResponse = resp.json();
            assert_eq!(err.code, "invalid_input");
            assert!(!err.message.contains("secret"), "body leaked into: {}", err.message);
        }
    }

    #[tokio::test]
    async fn missing_content_type_returns_error_response() {
        let server = TestServer::new(app(MockKmsEncrypt::new())).unwrap();
        let resp = server
            .post("/v1/resources/aws_kms_ciphertext/create")
            .text(r#"{"config": {}}"#)
            .await;
        resp.assert_status_bad_request();
        let err: ErrorResponse = resp.json();
        assert_eq!(err.code, "invalid_input");
    }

    #[tokio::test]
    async fn full_lifecycle() {
        let mut mock = MockKmsEncrypt::new();
        mock.expect_encrypt()
            .times(1)
            .returning(|_| Ok(vec![0xDE, 0xAD, 0xBE, 0xEF]));
        let server = TestServer::new(app(mock)).unwrap();

        let config = json!({"plaintext": "secret", "key_id": "alias/test", "context": {"purpose": "test"}});

        let created: StateResponse = server
            .post("/v1/resources/aws_kms_ciphertext/create")
            .json(&json!({ "config": config }))
            .await
            .json();
        let id = created.id.clone().unwrap();
        assert_eq!(created.attributes["ciphertext_blob"], json!("3q2+7w=="));

        // Read with unchanged config must not call KMS again.
        let read: StateResponse = server
            .post("/v1/resources/aws_kms_ciphertext/read")
            .json(&json!({
                "state": { "id": id, "attributes": created.attributes },
                "config": config,
            }))
            .await
            .json();
        assert_eq!(read, created);

        let deleted: StateResponse = server
            .post("/v1/resources/aws_kms_ciphertext/delete")
            .json(&json!({ "state": { "id": id, "attributes": read.attributes } }))
            .await
            .json();
        assert!(deleted.id.is_none());
    }
}
