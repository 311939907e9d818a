//! Route definitions for the `/bookings` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::booking;
use crate::state::AppState;

/// Routes mounted at `/bookings`.
///
/// ```text
/// GET    /                  -> list (?customer_id=&facility_id=&from=&to=)
/// POST   /                  -> create
/// GET    /{id}              -> get_by_id
/// DELETE /{id}              -> cancel
/// POST   /{id}/confirm      -> confirm
/// POST   /{id}/reschedule   -> reschedule
/// POST   /{id}/complete     -> complete
/// POST   /{id}/cancel       -> cancel
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(booking::list).post(booking::create))
        .route("/{id}", get(booking::get_by_id).delete(booking::cancel))
        .route("/{id}/confirm", post(booking::confirm))
        .route("/{id}/reschedule", post(booking::reschedule))
        .route("/{id}/complete", post(booking::complete))
        .route("/{id}/cancel", post(booking::cancel))
}
