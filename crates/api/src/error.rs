//! JSON error responses.
//!
//! Every failure leaves the API as `{ "error": CODE, "message": text }` with
//! the status code of its kind.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use reseller_core::PanelError;
use reseller_shared::AppError;

/// Error returned by handlers.
#[derive(Debug)]
pub enum ApiError {
    /// A panel operation failed.
    Panel(PanelError),
    /// A failure around the panel (token, payload, encoding).
    App(AppError),
}

impl From<PanelError> for ApiError {
    fn from(err: PanelError) -> Self {
        Self::Panel(err)
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl ApiError {
    /// Returns the HTTP status, error code and message.
    #[must_use]
    pub fn parts(&self) -> (StatusCode, &'static str, String) {
        let (status, code, message) = match self {
            Self::Panel(e) => (e.status_code(), e.error_code(), e.to_string()),
            Self::App(e) => (e.status_code(), e.error_code(), e.to_string()),
        };
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, code, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            error!(code = code, error = %message, "Request failed");
        }

        (status, Json(json!({ "error": code, "message": message }))).into_response()
    }
}
