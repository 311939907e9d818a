//! Handlers for the `/facilities` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use kcv_core::types::DbId;
use kcv_db::models::facility::{CreateFacility, Facility, SetFacilityActive, UpdateFacility};

use crate::engine::facility as engine;
use crate::error::AppResult;
use crate::state::AppState;

/// GET /api/v1/facilities
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Facility>>> {
    Ok(Json(engine::list(&state.pool).await?))
}

/// GET /api/v1/facilities/active
pub async fn list_active(State(state): State<AppState>) -> AppResult<Json<Vec<Facility>>> {
    Ok(Json(engine::list_active(&state.pool).await?))
}

/// GET /api/v1/facilities/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Facility>> {
    Ok(Json(engine::get(&state.pool, id).await?))
}

/// POST /api/v1/facilities
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateFacility>,
) -> AppResult<(StatusCode, Json<Facility>)> {
    let facility = engine::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(facility)))
}

/// PUT /api/v1/facilities/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateFacility>,
) -> AppResult<Json<Facility>> {
    Ok(Json(engine::update(&state.pool, id, &input).await?))
}

/// PATCH /api/v1/facilities/{id}/active
pub async fn set_active(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetFacilityActive>,
) -> AppResult<Json<Facility>> {
    Ok(Json(engine::set_active(&state.pool, id, input.is_active).await?))
}

/// DELETE /api/v1/facilities/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    engine::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
