//! Facility directory operations.

use kcv_core::error::CoreError;
use kcv_core::facility::{validate_fields, FacilityFields};
use kcv_core::types::DbId;
use kcv_core::validation::trim_or_empty;
use kcv_db::models::facility::{CreateFacility, Facility, NewFacility};
use kcv_db::repositories::{BookingRepo, FacilityRepo};
use kcv_db::DbPool;

use crate::error::{AppError, AppResult};

pub(crate) fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Facility",
        id,
    })
}

/// Trim and validate the writable fields.
fn prepare(input: &CreateFacility) -> Result<NewFacility, CoreError> {
    let facility = NewFacility {
        name: input.name.trim().to_string(),
        description: trim_or_empty(input.description.as_deref()),
        address: input.address.trim().to_string(),
        postal_code: input.postal_code.trim().to_string(),
        city: input.city.trim().to_string(),
        max_capacity: input.max_capacity,
        price_per_day: input.price_per_day,
        is_active: input.is_active.unwrap_or(true),
    };
    validate_fields(&FacilityFields {
        name: &facility.name,
        address: &facility.address,
        postal_code: &facility.postal_code,
        city: &facility.city,
        max_capacity: facility.max_capacity,
        price_per_day: facility.price_per_day,
    })?;
    Ok(facility)
}

pub async fn list(pool: &DbPool) -> AppResult<Vec<Facility>> {
    Ok(FacilityRepo::list(pool).await?)
}

pub async fn list_active(pool: &DbPool) -> AppResult<Vec<Facility>> {
    Ok(FacilityRepo::list_active(pool).await?)
}

pub async fn get(pool: &DbPool, id: DbId) -> AppResult<Facility> {
    FacilityRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

pub async fn create(pool: &DbPool, input: &CreateFacility) -> AppResult<Facility> {
    let fields = prepare(input)?;
    let facility = FacilityRepo::create(pool, &fields).await?;
    tracing::info!(facility_id = facility.id, name = %facility.name, "Facility created");
    Ok(facility)
}

/// Replace all writable fields of a facility.
pub async fn update(pool: &DbPool, id: DbId, input: &CreateFacility) -> AppResult<Facility> {
    let fields = prepare(input)?;
    let facility = FacilityRepo::update(pool, id, &fields)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(facility_id = id, "Facility updated");
    Ok(facility)
}

pub async fn set_active(pool: &DbPool, id: DbId, is_active: bool) -> AppResult<Facility> {
    let facility = FacilityRepo::set_active(pool, id, is_active)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(facility_id = id, is_active, "Facility active flag changed");
    Ok(facility)
}

/// Delete a facility that no booking has ever referenced.
///
/// Referenced facilities must be deactivated instead. The
/// `fk_bookings_facility` restriction enforces the same rule in storage.
pub async fn delete(pool: &DbPool, id: DbId) -> AppResult<()> {
    if FacilityRepo::find_by_id(pool, id).await?.is_none() {
        return Err(not_found(id));
    }
    let bookings = BookingRepo::count_by_facility(pool, id).await?;
    if bookings > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Facility {id} has {bookings} booking(s) and cannot be deleted. Deactivate it instead."
        ))));
    }
    FacilityRepo::delete(pool, id).await?;
    tracing::info!(facility_id = id, "Facility deleted");
    Ok(())
}
