//! Customer entity model and DTOs.

use kcv_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `customers` table. `email` is always normalized.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Customer {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company_name: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A customer with booking counts, for read endpoints.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CustomerWithStats {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub customer: Customer,
    pub total_bookings: i64,
    pub active_bookings: i64,
}

/// DTO for creating a customer.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCustomer {
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

/// DTO for replacing a customer (`PUT`). Same shape as [`CreateCustomer`].
pub type UpdateCustomer = CreateCustomer;

/// Trimmed, normalized customer fields ready to be written.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company_name: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
}

/// Query parameters for `GET /customers/by-email`.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailLookupParams {
    pub email: String,
}
