//! Facility directory rules.

use rust_decimal::Decimal;

use crate::error::CoreError;
use crate::validation::{ensure_required, ensure_storable_amount};

/// The writable fields of a facility, borrowed for validation.
#[derive(Debug, Clone, Copy)]
pub struct FacilityFields<'a> {
    pub name: &'a str,
    pub address: &'a str,
    pub postal_code: &'a str,
    pub city: &'a str,
    pub max_capacity: i32,
    pub price_per_day: Decimal,
}

/// Validate required fields and business constraints, in declaration order.
pub fn validate_fields(fields: &FacilityFields<'_>) -> Result<(), CoreError> {
    ensure_required(fields.name, "Facility name is required.")?;
    ensure_required(fields.address, "Address is required.")?;
    ensure_required(fields.postal_code, "Postal code is required.")?;
    ensure_required(fields.city, "City is required.")?;
    if fields.max_capacity <= 0 {
        return Err(CoreError::Validation(
            "Max capacity must be greater than zero.".to_string(),
        ));
    }
    ensure_storable_amount(fields.price_per_day, "Price per day")
}
