//! Route definitions for the `/contracts` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::contract;
use crate::state::AppState;

/// Routes mounted at `/contracts`.
///
/// ```text
/// GET    /                       -> list
/// GET    /{id}                   -> get_by_id
/// PATCH  /{id}                   -> patch
/// DELETE /{id}                   -> delete
/// POST   /{id}/send              -> send
/// POST   /{id}/sign              -> sign
/// POST   /{id}/cancel            -> cancel
/// GET    /booking/{booking_id}   -> get_by_booking
/// POST   /booking/{booking_id}   -> create_for_booking
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(contract::list))
        .route(
            "/{id}",
            get(contract::get_by_id)
                .patch(contract::patch)
                .delete(contract::delete),
        )
        .route("/{id}/send", post(contract::send))
        .route("/{id}/sign", post(contract::sign))
        .route("/{id}/cancel", post(contract::cancel))
        .route(
            "/booking/{booking_id}",
            get(contract::get_by_booking).post(contract::create_for_booking),
        )
}
