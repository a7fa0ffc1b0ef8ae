//! Route definitions for the auditbind HTTP API.
//!
//! All routes are mounted under `/api`. Authentication runs before audit
//! binding so the binding sees the resolved user.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, patch},
};

use auditbind_middleware::AuditlogLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(record_routes())
        .merge(entry_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(AuditlogLayer::new(state.binding.clone()))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::authenticate,
        ))
        .with_state(state)
}

/// Audited record CRUD
fn record_routes() -> Router<AppState> {
    Router::new().route(
        "/records/{app}/{model}/{pk}",
        get(handlers::records::get_record)
            .put(handlers::records::put_record)
            .delete(handlers::records::delete_record),
    )
}

/// Log entries and the review workflow
fn entry_routes() -> Router<AppState> {
    Router::new()
        .route("/entries", get(handlers::entries::list_entries))
        .route("/entries/{id}", get(handlers::entries::get_entry))
        .route(
            "/entries/{id}/changes",
            patch(handlers::entries::stage_changes),
        )
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
