//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};
use reseller_core::PanelStore;

pub mod auth;
pub mod dashboard;
pub mod end_users;
pub mod health;
pub mod sellers;

#[cfg(test)]
mod tests;

/// Creates the API router with public and protected routes.
pub fn api_routes_with_state<S: PanelStore + 'static>(state: &AppState<S>) -> Router<AppState<S>> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(dashboard::routes())
        .merge(sellers::routes())
        .merge(end_users::routes())
        .layer(middleware::from_fn_with_state(
            state.jwt_service.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}
