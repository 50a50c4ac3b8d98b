//! End-user routes.
//!
//! Admins can list every end user; everything else is seller-scoped.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
};
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use crate::{AppState, error::ApiError, extract::ApiJson, middleware::auth::AuthPrincipal};
use reseller_core::{PanelStore, Role};
use reseller_shared::{
    auth::{CreateEndUserRequest, UpdateEndUserRequest},
    types::EndUserId,
};

/// Creates the end-users router.
pub fn routes<S: PanelStore + 'static>() -> Router<AppState<S>> {
    Router::new()
        .route(
            "/end-users",
            get(list_end_users::<S>).post(provision_end_user::<S>),
        )
        .route(
            "/end-users/{end_user_id}",
            patch(update_end_user::<S>).delete(delete_end_user::<S>),
        )
}

/// GET /end-users - All end users for admins, own end users for sellers.
async fn list_end_users<S: PanelStore + 'static>(
    State(state): State<AppState<S>>,
    AuthPrincipal(principal): AuthPrincipal,
) -> Result<Response, ApiError> {
    let response = match principal.role {
        Role::Admin => Json(state.panel.list_all_end_users(&principal).await?).into_response(),
        Role::Seller => Json(state.panel.list_own_end_users(&principal).await?).into_response(),
    };
    Ok(response)
}

/// POST /end-users - Provision an end user for one credit.
///
/// Responds with the new end user and the seller's balance after the debit.
async fn provision_end_user<S: PanelStore + 'static>(
    State(state): State<AppState<S>>,
    AuthPrincipal(principal): AuthPrincipal,
    ApiJson(payload): ApiJson<CreateEndUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let provisioned = state
        .panel
        .provision_end_user(&principal, &payload.username, &payload.password)
        .await?;
    Ok((StatusCode::CREATED, Json(provisioned)))
}

/// PATCH /end-users/{end_user_id} - Rename and optionally change the password.
async fn update_end_user<S: PanelStore + 'static>(
    State(state): State<AppState<S>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(end_user_id): Path<Uuid>,
    ApiJson(payload): ApiJson<UpdateEndUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let end_user = state
        .panel
        .update_end_user(
            &principal,
            EndUserId::from_uuid(end_user_id),
            &payload.username,
            payload.password.as_deref(),
        )
        .await?;
    Ok(Json(end_user))
}

/// DELETE /end-users/{end_user_id} - Remove an end user. No credit is refunded.
///
/// Responds with the deleted ID and the caller's remaining end users. The
/// list is left out if it cannot be read; the deletion has happened anyway.
async fn delete_end_user<S: PanelStore + 'static>(
    State(state): State<AppState<S>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(end_user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .panel
        .delete_end_user(&principal, EndUserId::from_uuid(end_user_id))
        .await?;

    let mut body = json!({ "end_user_id": end_user_id });
    match state.panel.list_own_end_users(&principal).await {
        Ok(end_users) => body["end_users"] = json!(end_users),
        Err(e) => warn!(end_user_id = %end_user_id, error = %e, "End user deleted but list refresh failed"),
    }
    Ok(Json(body))
}
