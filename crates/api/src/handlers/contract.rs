//! Handlers for the `/contracts` resource.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use kcv_core::types::DbId;
use kcv_db::models::contract::{
    BookingContract, CancelContract, CreateContract, PatchContract, SignContract,
};

use crate::engine::contract as engine;
use crate::error::AppResult;
use crate::handlers::optional_json;
use crate::state::AppState;

/// GET /api/v1/contracts
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<BookingContract>>> {
    Ok(Json(engine::list(&state.pool).await?))
}

/// GET /api/v1/contracts/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<BookingContract>> {
    Ok(Json(engine::get(&state.pool, id).await?))
}

/// GET /api/v1/contracts/booking/{booking_id}
pub async fn get_by_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<DbId>,
) -> AppResult<Json<BookingContract>> {
    Ok(Json(engine::get_by_booking(&state.pool, booking_id).await?))
}

/// POST /api/v1/contracts/booking/{booking_id}
///
/// Manual creation, for bookings whose automatic contract failed. The body
/// (`terms`, `payment_due_date`) is optional.
pub async fn create_for_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<DbId>,
    body: Bytes,
) -> AppResult<(StatusCode, Json<BookingContract>)> {
    let input: CreateContract = optional_json(&body)?;
    let contract = engine::create_for_booking(&state.pool, booking_id, &input).await?;
    Ok((StatusCode::CREATED, Json(contract)))
}

/// PATCH /api/v1/contracts/{id}
pub async fn patch(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<PatchContract>,
) -> AppResult<Json<BookingContract>> {
    Ok(Json(engine::patch(&state.pool, id, &input).await?))
}

/// POST /api/v1/contracts/{id}/send
pub async fn send(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<BookingContract>> {
    Ok(Json(engine::mark_sent(&state.pool, id).await?))
}

/// POST /api/v1/contracts/{id}/sign
pub async fn sign(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Bytes,
) -> AppResult<Json<BookingContract>> {
    let input: SignContract = optional_json(&body)?;
    Ok(Json(engine::mark_signed(&state.pool, id, input.signed_at).await?))
}

/// POST /api/v1/contracts/{id}/cancel
pub async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Bytes,
) -> AppResult<Json<BookingContract>> {
    let input: CancelContract = optional_json(&body)?;
    Ok(Json(engine::cancel(&state.pool, id, input.reason.as_deref()).await?))
}

/// DELETE /api/v1/contracts/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    engine::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
