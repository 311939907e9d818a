//! Availability and booking engine.
//!
//! Create and reschedule go through the repository's locked reservation
//! writes, so the overlap check and the write cannot interleave with another
//! request for the same facility.

use kcv_core::booking::{
    self as rules, check_cancel, check_confirm, check_reschedule, CancelAction, ConfirmAction,
};
use kcv_core::dates;
use kcv_core::error::CoreError;
use kcv_core::status::BookingStatus;
use kcv_core::types::DbId;
use kcv_core::validation::{ensure_valid_range, trim_or_empty};
use kcv_db::models::booking::{
    Booking, BookingListParams, CreateBooking, NewBooking, RescheduleBooking, Reservation,
};
use kcv_db::models::contract::CreateContract;
use kcv_db::repositories::{BookingRepo, CustomerRepo, FacilityRepo};
use kcv_db::DbPool;
use serde::Serialize;

use crate::engine::{contract, facility};
use crate::error::{AppError, AppResult};

pub(crate) fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Booking",
        id,
    })
}

fn changed_concurrently(id: DbId) -> AppError {
    AppError::Core(CoreError::concurrent_update("Booking", id))
}

/// Response of booking creation: the booking plus the outcome of the
/// automatic contract creation that follows it.
///
/// The booking is kept even when the contract could not be created; in that
/// case `contract_id` is `null` and `contract_error` says why.
#[derive(Debug, Serialize)]
pub struct CreatedBooking {
    #[serde(flatten)]
    pub booking: Booking,
    pub contract_id: Option<DbId>,
    pub contract_error: Option<String>,
}

/// Domain errors are shown as-is; anything else is reported generically.
fn public_message(err: &AppError) -> String {
    match err {
        AppError::Core(core) => core.to_string(),
        _ => "An internal error occurred".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

pub async fn get(pool: &DbPool, id: DbId) -> AppResult<Booking> {
    BookingRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// List bookings by the first usable filter: customer, facility, then the
/// inclusive date range (both bounds required). No filter lists everything.
pub async fn filter(pool: &DbPool, params: &BookingListParams) -> AppResult<Vec<Booking>> {
    let bookings = match params {
        BookingListParams {
            customer_id: Some(customer_id),
            ..
        } => BookingRepo::list_by_customer(pool, *customer_id).await?,
        BookingListParams {
            facility_id: Some(facility_id),
            ..
        } => BookingRepo::list_by_facility(pool, *facility_id).await?,
        BookingListParams {
            from: Some(from),
            to: Some(to),
            ..
        } => BookingRepo::list_in_range(pool, *from, *to).await?,
        _ => BookingRepo::list(pool).await?,
    };
    Ok(bookings)
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Create a Pending booking, then try to derive its Draft contract.
///
/// Checks, in order: participants, date range, customer, facility, facility
/// active, capacity, availability.
pub async fn create(pool: &DbPool, input: &CreateBooking) -> AppResult<CreatedBooking> {
    rules::validate_participants(input.number_of_participants)?;
    ensure_valid_range(input.start_date, input.end_date, dates::today())?;

    if !CustomerRepo::exists(pool, input.customer_id).await? {
        return Err(crate::engine::customer::not_found(input.customer_id));
    }
    let facility = FacilityRepo::find_by_id(pool, input.facility_id)
        .await?
        .ok_or_else(|| facility::not_found(input.facility_id))?;
    rules::validate_facility_bookable(facility.is_active)?;
    rules::validate_capacity(input.number_of_participants, facility.max_capacity)?;
    let total_price = rules::total_price(facility.price_per_day, input.start_date, input.end_date);
    rules::validate_total_price(total_price)?;

    let new_booking = NewBooking {
        customer_id: input.customer_id,
        facility_id: facility.id,
        start_date: input.start_date,
        end_date: input.end_date,
        number_of_participants: input.number_of_participants,
        notes: trim_or_empty(input.notes.as_deref()),
        total_price,
    };

    let booking = match BookingRepo::create_if_available(pool, &new_booking).await? {
        Reservation::Reserved(booking) => booking,
        Reservation::Conflict => {
            return Err(AppError::Core(rules::conflict_error(
                facility.id,
                input.start_date,
                input.end_date,
            )))
        }
    };
    tracing::info!(
        booking_id = booking.id,
        facility_id = booking.facility_id,
        customer_id = booking.customer_id,
        total_price = %booking.total_price,
        "Booking created",
    );

    // Best effort: the booking stands even if this fails.
    let (contract_id, contract_error) =
        match contract::create_for_booking(pool, booking.id, &CreateContract::default()).await {
            Ok(contract) => (Some(contract.id), None),
            Err(err) => {
                tracing::warn!(
                    booking_id = booking.id,
                    error = %err,
                    "Automatic contract creation failed",
                );
                (None, Some(public_message(&err)))
            }
        };

    Ok(CreatedBooking {
        booking,
        contract_id,
        contract_error,
    })
}

/// Confirm a booking. Confirming an already confirmed booking changes nothing.
pub async fn confirm(pool: &DbPool, id: DbId) -> AppResult<Booking> {
    let booking = get(pool, id).await?;
    match check_confirm(booking.status, booking.start_date, dates::today())? {
        ConfirmAction::AlreadyConfirmed => Ok(booking),
        ConfirmAction::Confirm => {
            if let Some(booking) = BookingRepo::mark_confirmed(pool, id).await? {
                tracing::info!(booking_id = id, "Booking confirmed");
                return Ok(booking);
            }
            // The status changed after it was read; decide again on the current row.
            let current = get(pool, id).await?;
            match check_confirm(current.status, current.start_date, dates::today())? {
                ConfirmAction::AlreadyConfirmed => Ok(current),
                ConfirmAction::Confirm => Err(changed_concurrently(id)),
            }
        }
    }
}

/// Move a Pending or Confirmed booking to a new range and reprice it at the
/// facility's current daily rate.
pub async fn reschedule(pool: &DbPool, id: DbId, input: &RescheduleBooking) -> AppResult<Booking> {
    ensure_valid_range(input.start_date, input.end_date, dates::today())?;
    let booking = get(pool, id).await?;
    check_reschedule(booking.status)?;

    let facility = FacilityRepo::find_by_id(pool, booking.facility_id)
        .await?
        .ok_or_else(|| facility::not_found(booking.facility_id))?;
    rules::validate_facility_bookable(facility.is_active)?;

    let price = rules::total_price(facility.price_per_day, input.start_date, input.end_date);
    rules::validate_total_price(price)?;

    let outcome = BookingRepo::reschedule_if_available(
        pool,
        &booking,
        input.start_date,
        input.end_date,
        price,
    )
    .await?;
    let Some(outcome) = outcome else {
        let current = get(pool, id).await?;
        check_reschedule(current.status)?;
        return Err(changed_concurrently(id));
    };
    match outcome {
        Reservation::Reserved(updated) => {
            tracing::info!(
                booking_id = id,
                total_price = %updated.total_price,
                "Booking rescheduled",
            );
            Ok(updated)
        }
        Reservation::Conflict => Err(AppError::Core(rules::conflict_error(
            facility.id,
            input.start_date,
            input.end_date,
        ))),
    }
}

/// Cancel a booking. Cancelling twice is a silent no-op.
pub async fn cancel(pool: &DbPool, id: DbId, reason: Option<&str>) -> AppResult<Booking> {
    let booking = get(pool, id).await?;
    match check_cancel(booking.status)? {
        CancelAction::NoOp => Ok(booking),
        CancelAction::Cancel => {
            let notes = rules::append_cancellation_note(&booking.notes, reason);
            if let Some(booking) = BookingRepo::mark_cancelled(pool, id, &notes).await? {
                tracing::info!(booking_id = id, "Booking cancelled");
                return Ok(booking);
            }
            let current = get(pool, id).await?;
            match check_cancel(current.status)? {
                CancelAction::NoOp => Ok(current),
                CancelAction::Cancel => Err(changed_concurrently(id)),
            }
        }
    }
}

/// Mark a confirmed booking as completed.
pub async fn complete(pool: &DbPool, id: DbId) -> AppResult<Booking> {
    let booking = get(pool, id).await?;
    booking.status.validate_transition(BookingStatus::Completed)?;
    if let Some(booking) = BookingRepo::mark_completed(pool, id).await? {
        tracing::info!(booking_id = id, "Booking completed");
        return Ok(booking);
    }
    let current = get(pool, id).await?;
    current.status.validate_transition(BookingStatus::Completed)?;
    Err(changed_concurrently(id))
}
