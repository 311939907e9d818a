//! Route definitions for the `/facilities` resource.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::facility;
use crate::state::AppState;

/// Routes mounted at `/facilities`.
///
/// ```text
/// GET    /              -> list
/// POST   /              -> create
/// GET    /active        -> list_active
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update
/// DELETE /{id}          -> delete
/// PATCH  /{id}/active   -> set_active
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(facility::list).post(facility::create))
        .route("/active", get(facility::list_active))
        .route(
            "/{id}",
            get(facility::get_by_id)
                .put(facility::update)
                .delete(facility::delete),
        )
        .route("/{id}/active", patch(facility::set_active))
}
