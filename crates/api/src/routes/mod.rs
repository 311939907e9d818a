pub mod booking;
pub mod contract;
pub mod customer;
pub mod facility;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /facilities                          facility directory
/// /customers                           customer directory
/// /bookings                            booking lifecycle
/// /contracts                           contract lifecycle
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/facilities", facility::router())
        .nest("/customers", customer::router())
        .nest("/bookings", booking::router())
        .nest("/contracts", contract::router())
}
