//! Admin dashboard route.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};

use crate::{AppState, error::ApiError, middleware::auth::AuthPrincipal};
use reseller_core::PanelStore;

/// Creates the dashboard router.
pub fn routes<S: PanelStore + 'static>() -> Router<AppState<S>> {
    Router::new().route("/dashboard", get(admin_overview::<S>))
}

/// GET /dashboard - Seller count, system-wide end-user count and the
/// caller's total outstanding credits.
async fn admin_overview<S: PanelStore + 'static>(
    State(state): State<AppState<S>>,
    AuthPrincipal(principal): AuthPrincipal,
) -> Result<impl IntoResponse, ApiError> {
    let overview = state.panel.admin_overview(&principal).await?;
    Ok(Json(overview))
}
