//! Facility entity model and DTOs.

use kcv_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `facilities` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Facility {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub max_capacity: i32,
    pub price_per_day: Decimal,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a facility.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFacility {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub max_capacity: i32,
    pub price_per_day: Decimal,
    /// Defaults to `true` if omitted.
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// DTO for replacing a facility (`PUT`). Same shape as [`CreateFacility`].
pub type UpdateFacility = CreateFacility;

/// Body of `PATCH /facilities/{id}/active`.
#[derive(Debug, Clone, Deserialize)]
pub struct SetFacilityActive {
    pub is_active: bool,
}

/// Trimmed facility fields ready to be written.
#[derive(Debug, Clone)]
pub struct NewFacility {
    pub name: String,
    pub description: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub max_capacity: i32,
    pub price_per_day: Decimal,
    pub is_active: bool,
}
