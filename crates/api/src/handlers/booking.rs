//! Handlers for the `/bookings` resource.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use kcv_core::types::DbId;
use kcv_db::models::booking::{
    Booking, BookingListParams, CancelBooking, CreateBooking, RescheduleBooking,
};

use crate::engine::booking::{self as engine, CreatedBooking};
use crate::error::AppResult;
use crate::handlers::optional_json;
use crate::state::AppState;

/// GET /api/v1/bookings?customer_id=&facility_id=&from=&to=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<BookingListParams>,
) -> AppResult<Json<Vec<Booking>>> {
    Ok(Json(engine::filter(&state.pool, &params).await?))
}

/// GET /api/v1/bookings/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Booking>> {
    Ok(Json(engine::get(&state.pool, id).await?))
}

/// POST /api/v1/bookings
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateBooking>,
) -> AppResult<(StatusCode, Json<CreatedBooking>)> {
    let created = engine::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// POST /api/v1/bookings/{id}/confirm
pub async fn confirm(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Booking>> {
    Ok(Json(engine::confirm(&state.pool, id).await?))
}

/// POST /api/v1/bookings/{id}/reschedule
pub async fn reschedule(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RescheduleBooking>,
) -> AppResult<Json<Booking>> {
    Ok(Json(engine::reschedule(&state.pool, id, &input).await?))
}

/// POST /api/v1/bookings/{id}/complete
pub async fn complete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Booking>> {
    Ok(Json(engine::complete(&state.pool, id).await?))
}

/// POST /api/v1/bookings/{id}/cancel and DELETE /api/v1/bookings/{id}
///
/// The body (`{ "reason": .. }`) is optional.
pub async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Bytes,
) -> AppResult<StatusCode> {
    let input: CancelBooking = optional_json(&body)?;
    engine::cancel(&state.pool, id, input.reason.as_deref()).await?;
    Ok(StatusCode::NO_CONTENT)
}
