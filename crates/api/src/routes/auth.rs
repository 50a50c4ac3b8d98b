//! Authentication routes: login, logout and the current principal.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tracing::{error, info};

use crate::{AppState, error::ApiError, extract::ApiJson, middleware::auth::AuthPrincipal};
use reseller_core::{PanelError, PanelStore, Principal, Role};
use reseller_shared::{
    AppError,
    auth::{LoginRequest, LoginResponse, PrincipalInfo},
};

/// Creates the public auth router.
pub fn routes<S: PanelStore + 'static>() -> Router<AppState<S>> {
    Router::new().route("/auth/login", post(login::<S>))
}

/// Creates the auth routes that need a valid token.
pub fn protected_routes<S: PanelStore + 'static>() -> Router<AppState<S>> {
    Router::new()
        .route("/auth/logout", post(logout))
        .route("/me", get(me::<S>))
}

pub(crate) fn principal_info(principal: &Principal) -> PrincipalInfo {
    PrincipalInfo {
        id: principal.id,
        username: principal.username.clone(),
        role: principal.role.as_str().to_string(),
        credits: principal.credits,
    }
}

/// POST /auth/login - Authenticate against the role's table and issue a token.
async fn login<S: PanelStore + 'static>(
    State(state): State<AppState<S>>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // An unknown role cannot match any table.
    let role: Role = payload
        .role
        .parse()
        .map_err(|_| PanelError::InvalidCredentials)?;

    let principal = state
        .panel
        .login(role, &payload.username, &payload.password)
        .await
        .inspect_err(|e| info!(role = %role, username = %payload.username, error = %e, "Login failed"))?;

    let access_token = state
        .jwt_service
        .generate_access_token(principal.id, &principal.username, role.as_str())
        .map_err(|e| {
            error!(error = %e, "Failed to generate access token");
            AppError::Internal("An error occurred during login".to_string())
        })?;

    let response = LoginResponse {
        principal: principal_info(&principal),
        access_token,
        expires_in: state.jwt_service.access_token_expires_in(),
    };

    Ok((StatusCode::OK, Json(response)))
}

/// POST /auth/logout - Sessions are stateless; the client discards its token.
async fn logout(AuthPrincipal(principal): AuthPrincipal) -> impl IntoResponse {
    info!(principal_id = %principal.id, role = %principal.role, "Logged out");
    (StatusCode::OK, Json(json!({ "message": "Logged out" })))
}

/// GET /me - The caller, with a seller's balance read fresh from storage.
async fn me<S: PanelStore + 'static>(
    State(state): State<AppState<S>>,
    AuthPrincipal(principal): AuthPrincipal,
) -> Result<impl IntoResponse, ApiError> {
    let principal = state.panel.refresh_principal(principal).await?;
    Ok(Json(principal_info(&principal)))
}
