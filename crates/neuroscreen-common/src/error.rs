use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Error returned by HTTP handlers.
///
/// Rendered as `{ "success": false, "message": ... }` with the matching
/// status code. `Internal` details are logged but never sent to the client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_)     => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_)   => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_)    => StatusCode::FORBIDDEN,
            ApiError::Conflict(_)     => StatusCode::CONFLICT,
            ApiError::Internal(_)     => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the requester.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Internal(_) => "Internal server error.".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(format!("{:#}", err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::Internal(detail) = &self {
            tracing::error!(%detail, "request failed");
        }
        let body = json!({
            "success": false,
            "message": self.public_message(),
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::Forbidden("x".into()).status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let err = ApiError::Internal("connection refused at 10.0.0.3".into());
        assert_eq!(err.public_message(), "Internal server error.");
        let err = ApiError::BadRequest("Invalid role".into());
        assert_eq!(err.public_message(), "Invalid role");
    }

    #[test]
    fn test_into_response_status() {
        let resp = ApiError::NotFound("Diagnosis not found.".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
