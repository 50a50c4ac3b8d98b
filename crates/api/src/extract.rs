//! Request extractors.

use axum::{extract::FromRequest, extract::rejection::JsonRejection};

use crate::error::ApiError;
use reseller_shared::AppError;

/// JSON body extractor whose rejection renders like every other API error.
///
/// A body that is not JSON, or that misses or mistypes a field, becomes
/// `VALIDATION_ERROR` with status 400.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::App(AppError::Validation(rejection.body_text()))
    }
}
