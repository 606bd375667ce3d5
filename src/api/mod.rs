//! HTTP interface - axum router, shared state and error translation.

/// Translation of [`crate::errors::Error`] into HTTP responses
pub mod error;
/// Order endpoints
pub mod orders;

use axum::{Router, routing::post};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared data available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection for all database operations
    pub database: Arc<DatabaseConnection>,
}

impl AppState {
    /// Creates a new `AppState` sharing the given database connection.
    #[must_use]
    pub fn new(database: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self {
            database: database.into(),
        }
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/orders/{order_id}/add_item/",
            post(orders::add_item_to_order),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
