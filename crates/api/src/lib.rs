//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes under `/api/v1`
//! - Bearer-token authentication middleware
//! - JSON error responses for panel and application errors

pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use reseller_core::{Argon2Verifier, PanelStore, ScopedPanel};
use reseller_db::PanelRepository;
use reseller_shared::JwtService;

/// Application state shared across handlers.
///
/// Generic over the store so the same router runs against PostgreSQL in
/// production and an in-memory store in tests.
pub struct AppState<S> {
    /// Access-scoped panel operations.
    pub panel: Arc<ScopedPanel<S, Argon2Verifier>>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            panel: Arc::clone(&self.panel),
            jwt_service: Arc::clone(&self.jwt_service),
        }
    }
}

impl<S: PanelStore> AppState<S> {
    /// Wires the panel over a store.
    pub fn new(store: Arc<S>, verifier: Argon2Verifier, jwt_service: JwtService) -> Self {
        Self {
            panel: Arc::new(ScopedPanel::new(store, Arc::new(verifier))),
            jwt_service: Arc::new(jwt_service),
        }
    }
}

/// State backed by PostgreSQL.
pub type DbAppState = AppState<PanelRepository>;

/// Creates the main application router.
pub fn create_router<S: PanelStore + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(&state))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
