//! Request-level error taxonomy.
//!
//! Every failure a handler can produce is one of these kinds; the HTTP
//! status and JSON body are decided only here, at the response boundary.
//! Upstream model failures and malformed model output are deliberately
//! distinct variants even though both surface as server errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or unusable caller input. Surfaced as 400 with the message.
    #[error("{0}")]
    Validation(String),

    /// Unknown task id. Surfaced as 404.
    #[error("{0}")]
    NotFound(String),

    /// Datastore or file-system failure. The detail is logged server-side
    /// only; the caller sees a generic message.
    #[error("storage error: {0}")]
    Storage(String),

    /// The model API call failed in transport or returned a non-success
    /// status. Carries the provider status when one was received.
    #[error("model provider error: {detail}")]
    Upstream { status: Option<u16>, detail: String },

    /// The model answered, but the content was empty, unparsable, or the
    /// wrong shape.
    #[error("malformed model output: {0}")]
    MalformedOutput(String),
}

impl ApiError {
    pub fn upstream(detail: impl Into<String>) -> Self {
        ApiError::Upstream {
            status: None,
            detail: detail.into(),
        }
    }
}

impl From<rusqlite::Error> for ApiError {
    fn from(err: rusqlite::Error) -> Self {
        ApiError::Storage(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Storage(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(message) => {
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, json!({ "error": message })),
            ApiError::Storage(detail) => {
                tracing::error!("storage failure: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal Server Error" }),
                )
            }
            ApiError::Upstream { status, detail } => {
                tracing::error!(status = ?status, "model provider failure: {detail}");
                let code = status
                    .and_then(|s| StatusCode::from_u16(s).ok())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (
                    code,
                    json!({ "error": "OpenAI API Error", "details": detail }),
                )
            }
            ApiError::MalformedOutput(detail) => {
                tracing::error!("malformed model output: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal Server Error", "details": detail }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let resp = ApiError::Validation("Title is required".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = ApiError::NotFound("Task not found".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = ApiError::Storage("disk on fire".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let resp = ApiError::Upstream {
            status: Some(429),
            detail: "rate limited".to_string(),
        }
        .into_response();
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

        let resp = ApiError::upstream("connection refused").into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
