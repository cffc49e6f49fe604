//! Error type shared by the store, the backend client and the handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("please sign in to use this endpoint")]
    Unauthorized,

    #[error("API rate limit exceeded")]
    RateLimited,

    #[error("not a recognizable video link: {0}")]
    InvalidVideoUrl(String),

    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("{0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidVideoUrl(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::TaskNotFound(_) => StatusCode::NOT_FOUND,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Backend { .. } | Self::Http(_) => StatusCode::BAD_GATEWAY,
            Self::Io(_) | Self::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Io(_) | Self::Json(_) => "storage_error",
            Self::Http(_) | Self::Backend { .. } => "backend_error",
            Self::Unauthorized => "unauthorized",
            Self::RateLimited => "rate_limit_exceeded",
            Self::InvalidVideoUrl(_) => "invalid_video_url",
            Self::TaskNotFound(_) => "task_not_found",
            Self::Validation(_) => "validation_error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }

        let body = Json(serde_json::json!({
            "error": self.code(),
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_map_to_http_status() {
        let cases = [
            (AppError::Validation("title required".into()), StatusCode::BAD_REQUEST),
            (AppError::InvalidVideoUrl("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
            (AppError::TaskNotFound("id".into()), StatusCode::NOT_FOUND),
            (AppError::RateLimited, StatusCode::TOO_MANY_REQUESTS),
            (
                AppError::Backend { status: 500, message: "boom".into() },
                StatusCode::BAD_GATEWAY,
            ),
            (
                AppError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn messages_are_readable() {
        let err = AppError::Backend { status: 400, message: "no transcript".into() };
        assert_eq!(err.to_string(), "backend returned 400: no transcript");
    }
}
