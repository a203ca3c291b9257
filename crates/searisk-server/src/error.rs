//! HTTP error mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use searisk_core::{ErrorResponse, FieldIssue, IssueKind};
use searisk_runtime::AssessmentError;

/// Errors surfaced by handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Assessment(#[from] AssessmentError),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Assessment(AssessmentError::Validation(_)) | ApiError::MalformedBody(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Assessment(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::Assessment(e) => e.error_type(),
            ApiError::MalformedBody(_) => "ValidationError",
        }
    }

    /// Caller-facing body. Upstream detail stays in the logs.
    fn body(&self) -> ErrorResponse {
        let error_type = Some(self.error_type());
        match self {
            ApiError::Assessment(AssessmentError::Validation(issues)) => {
                ErrorResponse::issues(issues.clone(), error_type)
            }
            ApiError::MalformedBody(msg) => ErrorResponse::issues(
                vec![FieldIssue::new("body", msg.as_str(), IssueKind::Format)],
                error_type,
            ),
            ApiError::Assessment(AssessmentError::UpstreamUnavailable) => {
                ErrorResponse::message("Assessment service is temporarily unavailable", error_type)
            }
            ApiError::Assessment(AssessmentError::UpstreamTimeout) => {
                ErrorResponse::message("Assessment timed out", error_type)
            }
            ApiError::Assessment(AssessmentError::UpstreamFormat) => ErrorResponse::message(
                "Assessment service returned an unusable response",
                error_type,
            ),
            ApiError::Assessment(AssessmentError::Configuration(_)) => {
                ErrorResponse::message("This assessment is not available on this server", error_type)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, error_type = self.error_type(), "Request failed");
        }
        (status, Json(self.body())).into_response()
    }
}
