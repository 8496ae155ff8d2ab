use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::error::AnalysisError;

/// Body of every error response
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub status_code: u16,
}

/// An error returned by a handler, rendered as [`ErrorResponse`]
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    detail: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            detail: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Attach the underlying cause; only exposed when running in debug mode
    pub fn with_detail(mut self, debug: bool, detail: impl Display) -> Self {
        if debug {
            self.detail = Some(detail.to_string());
        }
        self
    }

    /// Map a pipeline failure to its HTTP status
    pub fn from_analysis(err: &AnalysisError, debug: bool) -> Self {
        let api_error = match err {
            AnalysisError::InvalidImage(reason) => {
                Self::bad_request(format!("Invalid image: {}", reason))
            }
            AnalysisError::RemoteUnavailable { .. } => Self::service_unavailable(
                "Analysis service temporarily unavailable. Please try again later.",
            ),
            _ => Self::internal("Internal server error during image analysis"),
        };
        api_error.with_detail(debug, err)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message,
            detail: self.detail,
            status_code: self.status.as_u16(),
        };
        (self.status, Json(body)).into_response()
    }
}
