use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;

/// Give the bare 408 from `TimeoutLayer` the usual `{"error": ...}` body
pub async fn timeout_as_json(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        tracing::warn!("Request exceeded its deadline");
        return ApiError::Timeout.into_response();
    }
    response
}
