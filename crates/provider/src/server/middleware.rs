//! Response middleware applied on top of the tower-http layers in [`super::router`].

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::protocol::ErrorResponse;
use common::ProviderError;
use tracing::warn;

/// Give the bare `408` produced by the timeout layer an [`ErrorResponse`] body.
///
/// `State` carries the configured timeout in seconds.
pub async fn timeout_response(State(timeout_secs): State<u64>, response: Response) -> Response {
    if response.status() != StatusCode::REQUEST_TIMEOUT {
        return response;
    }
    let err = ProviderError::Timeout(timeout_secs);
    warn!(error = %err, "lifecycle call timed out");
    (StatusCode::REQUEST_TIMEOUT, Json(ErrorResponse::from(&err))).into_response()
}
