//! Seller management routes (admin only).

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
};
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use crate::{AppState, error::ApiError, extract::ApiJson, middleware::auth::AuthPrincipal};
use reseller_core::PanelStore;
use reseller_shared::{
    auth::{CreateSellerRequest, UpdateSellerCreditsRequest},
    types::SellerId,
};

/// Creates the sellers router.
pub fn routes<S: PanelStore + 'static>() -> Router<AppState<S>> {
    Router::new()
        .route("/sellers", get(list_sellers::<S>).post(create_seller::<S>))
        .route(
            "/sellers/{seller_id}",
            patch(set_seller_credits::<S>).delete(delete_seller::<S>),
        )
}

/// GET /sellers - Sellers administered by the caller, newest first.
async fn list_sellers<S: PanelStore + 'static>(
    State(state): State<AppState<S>>,
    AuthPrincipal(principal): AuthPrincipal,
) -> Result<impl IntoResponse, ApiError> {
    let sellers = state.panel.list_sellers(&principal).await?;
    Ok(Json(sellers))
}

/// POST /sellers - Create a seller with an opening balance.
async fn create_seller<S: PanelStore + 'static>(
    State(state): State<AppState<S>>,
    AuthPrincipal(principal): AuthPrincipal,
    ApiJson(payload): ApiJson<CreateSellerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let seller = state
        .panel
        .create_seller(&principal, &payload.username, &payload.password, payload.credits)
        .await?;
    Ok((StatusCode::CREATED, Json(seller)))
}

/// PATCH /sellers/{seller_id} - Set a seller's balance.
async fn set_seller_credits<S: PanelStore + 'static>(
    State(state): State<AppState<S>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(seller_id): Path<Uuid>,
    ApiJson(payload): ApiJson<UpdateSellerCreditsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let seller = state
        .panel
        .set_seller_credits(&principal, SellerId::from_uuid(seller_id), payload.credits)
        .await?;
    Ok(Json(seller))
}

/// DELETE /sellers/{seller_id} - Remove a seller and its end users.
///
/// Responds with the deletion summary and the refreshed seller list. The
/// list is left out if it cannot be read; the deletion has happened anyway.
async fn delete_seller<S: PanelStore + 'static>(
    State(state): State<AppState<S>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(seller_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let deletion = state
        .panel
        .delete_seller(&principal, SellerId::from_uuid(seller_id))
        .await?;

    let mut body = json!({ "deletion": deletion });
    match state.panel.list_sellers(&principal).await {
        Ok(sellers) => body["sellers"] = json!(sellers),
        Err(e) => warn!(seller_id = %seller_id, error = %e, "Seller deleted but list refresh failed"),
    }
    Ok(Json(body))
}
