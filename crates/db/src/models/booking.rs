//! Booking entity model and DTOs.

use kcv_core::dates::{deserialize_optional_timestamp, deserialize_timestamp};
use kcv_core::status::BookingStatus;
use kcv_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `bookings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: DbId,
    pub customer_id: DbId,
    pub facility_id: DbId,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub number_of_participants: i32,
    pub notes: String,
    #[sqlx(rename = "status_id", try_from = "i16")]
    pub status: BookingStatus,
    pub total_price: Decimal,
    pub confirmed_at: Option<Timestamp>,
    pub cancelled_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for `POST /bookings`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBooking {
    pub customer_id: DbId,
    pub facility_id: DbId,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub start_date: Timestamp,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub end_date: Timestamp,
    pub number_of_participants: i32,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A validated, priced booking ready to be inserted as Pending.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub customer_id: DbId,
    pub facility_id: DbId,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub number_of_participants: i32,
    pub notes: String,
    pub total_price: Decimal,
}

/// DTO for `POST /bookings/{id}/reschedule`.
#[derive(Debug, Clone, Deserialize)]
pub struct RescheduleBooking {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub start_date: Timestamp,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub end_date: Timestamp,
}

/// DTO for booking cancellation. The body is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CancelBooking {
    #[serde(default)]
    pub reason: Option<String>,
}

/// Query parameters for `GET /bookings`.
///
/// Filters apply with precedence customer, facility, then date range (which
/// needs both bounds). With no usable filter every booking is returned.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingListParams {
    pub customer_id: Option<DbId>,
    pub facility_id: Option<DbId>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub from: Option<Timestamp>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub to: Option<Timestamp>,
}

/// Result of a write that must not collide with another active booking.
#[derive(Debug, Clone)]
pub enum Reservation {
    Reserved(Booking),
    /// An active booking already occupies part of the requested range.
    Conflict,
}
