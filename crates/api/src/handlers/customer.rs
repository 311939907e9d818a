//! Handlers for the `/customers` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use kcv_core::types::DbId;
use kcv_db::models::customer::{
    CreateCustomer, Customer, CustomerWithStats, EmailLookupParams, UpdateCustomer,
};

use crate::engine::customer as engine;
use crate::error::AppResult;
use crate::state::AppState;

/// GET /api/v1/customers
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<CustomerWithStats>>> {
    Ok(Json(engine::list(&state.pool).await?))
}

/// GET /api/v1/customers/by-email?email=
pub async fn get_by_email(
    State(state): State<AppState>,
    Query(params): Query<EmailLookupParams>,
) -> AppResult<Json<CustomerWithStats>> {
    Ok(Json(engine::get_by_email(&state.pool, &params.email).await?))
}

/// GET /api/v1/customers/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<CustomerWithStats>> {
    Ok(Json(engine::get(&state.pool, id).await?))
}

/// POST /api/v1/customers
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateCustomer>,
) -> AppResult<(StatusCode, Json<Customer>)> {
    let customer = engine::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// PUT /api/v1/customers/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCustomer>,
) -> AppResult<Json<Customer>> {
    Ok(Json(engine::update(&state.pool, id, &input).await?))
}

/// DELETE /api/v1/customers/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    engine::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
