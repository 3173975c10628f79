//! HTTP routes.
//!
//! Each concern gets its own router; [`router`] merges them and applies the
//! shared layers.

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod confirmation;
pub mod orders;
pub mod products;
pub mod shipments;
pub mod webhooks;

/// Build the complete application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(products::router())
        .merge(orders::router())
        .merge(shipments::router())
        .merge(webhooks::router())
        .merge(confirmation::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}
