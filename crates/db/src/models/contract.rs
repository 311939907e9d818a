//! Booking contract entity model and DTOs.

use kcv_core::dates::deserialize_optional_timestamp;
use kcv_core::status::ContractStatus;
use kcv_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `booking_contracts` table.
///
/// `customer_name`, `customer_email`, and `facility_name` are snapshots taken
/// when the contract was created.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BookingContract {
    pub id: DbId,
    pub booking_id: DbId,
    pub contract_number: String,
    pub version: i32,
    #[sqlx(rename = "status_id", try_from = "i16")]
    pub status: ContractStatus,
    pub terms: String,
    pub total_amount: Decimal,
    pub currency: String,
    pub payment_due_date: Option<Timestamp>,
    pub customer_name: String,
    pub customer_email: String,
    pub facility_name: String,
    pub last_updated: Option<Timestamp>,
    pub signed_at: Option<Timestamp>,
    pub cancelled_at: Option<Timestamp>,
    pub cancel_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Body of `POST /contracts/booking/{booking_id}` (manual creation).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateContract {
    #[serde(default)]
    pub terms: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub payment_due_date: Option<Timestamp>,
}

/// A fully derived Draft contract ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewContract {
    pub booking_id: DbId,
    pub contract_number: String,
    pub terms: String,
    pub total_amount: Decimal,
    pub currency: String,
    pub payment_due_date: Option<Timestamp>,
    pub customer_name: String,
    pub customer_email: String,
    pub facility_name: String,
}

/// DTO for `PATCH /contracts/{id}`. Only supplied fields change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatchContract {
    #[serde(default)]
    pub terms: Option<String>,
    #[serde(default)]
    pub total_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub payment_due_date: Option<Timestamp>,
}

/// Body of `POST /contracts/{id}/sign`. Defaults to now.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignContract {
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub signed_at: Option<Timestamp>,
}

/// Body of `POST /contracts/{id}/cancel`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CancelContract {
    #[serde(default)]
    pub reason: Option<String>,
}
