//! Contract engine: derives one contract per booking and drives it through
//! Draft -> Sent -> Signed, with Cancelled reachable from every state.
//!
//! Customer and facility details are copied into the contract once, at
//! creation, and never refreshed.

use chrono::{Datelike, Utc};
use kcv_core::contract::{self as rules, TermsContext};
use kcv_core::customer::display_name;
use kcv_core::error::CoreError;
use kcv_core::status::{BookingStatus, ContractStatus};
use kcv_core::types::{DbId, Timestamp};
use kcv_core::validation::non_blank;
use kcv_db::models::contract::{BookingContract, CreateContract, NewContract, PatchContract};
use kcv_db::repositories::contract_repo::ContractChanges;
use kcv_db::repositories::{ContractRepo, CustomerRepo, FacilityRepo};
use kcv_db::DbPool;

use crate::engine::{booking, customer, facility};
use crate::error::{AppError, AppResult};

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "BookingContract",
        id,
    })
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

pub async fn list(pool: &DbPool) -> AppResult<Vec<BookingContract>> {
    Ok(ContractRepo::list(pool).await?)
}

pub async fn get(pool: &DbPool, id: DbId) -> AppResult<BookingContract> {
    ContractRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

pub async fn get_by_booking(pool: &DbPool, booking_id: DbId) -> AppResult<BookingContract> {
    ContractRepo::find_by_booking_id(pool, booking_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFoundBy {
            entity: "BookingContract",
            key: "booking_id",
            value: booking_id.to_string(),
        }))
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

/// Create the Draft contract for a booking.
///
/// Used automatically after booking creation and manually when that failed.
/// Checks, in order: booking exists, booking not cancelled, no existing
/// contract, facility exists, customer exists.
pub async fn create_for_booking(
    pool: &DbPool,
    booking_id: DbId,
    input: &CreateContract,
) -> AppResult<BookingContract> {
    let booking = booking::get(pool, booking_id).await?;
    rules::check_create(booking.status)?;

    if ContractRepo::exists_for_booking(pool, booking_id).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "A contract already exists for booking {booking_id}."
        ))));
    }

    let facility = FacilityRepo::find_by_id(pool, booking.facility_id)
        .await?
        .ok_or_else(|| facility::not_found(booking.facility_id))?;
    let customer = CustomerRepo::find_by_id(pool, booking.customer_id)
        .await?
        .ok_or_else(|| customer::not_found(booking.customer_id))?;

    let terms = rules::resolve_terms(
        input.terms.as_deref(),
        &TermsContext {
            facility_name: &facility.name,
            start: booking.start_date,
            end: booking.end_date,
            participants: booking.number_of_participants,
            total_amount: booking.total_price,
        },
    );

    let new_contract = NewContract {
        booking_id,
        contract_number: rules::contract_number(Utc::now().year(), booking_id),
        terms,
        total_amount: booking.total_price,
        currency: rules::DEFAULT_CURRENCY.to_string(),
        payment_due_date: Some(
            input
                .payment_due_date
                .unwrap_or_else(|| rules::default_payment_due(booking.start_date)),
        ),
        customer_name: display_name(&customer.first_name, &customer.last_name),
        customer_email: customer.email.clone(),
        facility_name: facility.name.clone(),
    };

    let contract = ContractRepo::create(pool, &new_contract).await?;
    tracing::info!(
        contract_id = contract.id,
        booking_id,
        contract_number = %contract.contract_number,
        "Contract created",
    );
    Ok(contract)
}

// ---------------------------------------------------------------------------
// Edits
// ---------------------------------------------------------------------------

/// Apply the supplied fields to a Draft or Sent contract. Every successful
/// patch bumps the version, even when a single field changes.
pub async fn patch(pool: &DbPool, id: DbId, input: &PatchContract) -> AppResult<BookingContract> {
    let contract = get(pool, id).await?;
    rules::check_patch(contract.status)?;
    if let Some(amount) = input.total_amount {
        rules::validate_total_amount(amount)?;
    }

    let changes = ContractChanges {
        terms: non_blank(input.terms.as_deref()),
        total_amount: input.total_amount,
        payment_due_date: input.payment_due_date,
    };
    // The update re-checks the status; `None` means it was frozen meanwhile.
    let updated = ContractRepo::patch(pool, id, &changes)
        .await?
        .ok_or_else(|| AppError::Core(rules::frozen_error()))?;
    tracing::info!(contract_id = id, version = updated.version, "Contract patched");
    Ok(updated)
}

// ---------------------------------------------------------------------------
// Status transitions
// ---------------------------------------------------------------------------

/// Explain a guarded send/sign that matched no row by repeating `check` on
/// the current contract and booking.
async fn stale_write_error(
    pool: &DbPool,
    id: DbId,
    check: fn(BookingStatus, ContractStatus) -> Result<(), CoreError>,
) -> AppError {
    let contract = match get(pool, id).await {
        Ok(contract) => contract,
        Err(err) => return err,
    };
    let booking = match booking::get(pool, contract.booking_id).await {
        Ok(booking) => booking,
        Err(err) => return err,
    };
    match check(booking.status, contract.status) {
        Err(err) => AppError::Core(err),
        Ok(()) => AppError::Core(CoreError::concurrent_update("BookingContract", id)),
    }
}

pub async fn mark_sent(pool: &DbPool, id: DbId) -> AppResult<BookingContract> {
    let contract = get(pool, id).await?;
    let booking = booking::get(pool, contract.booking_id).await?;
    rules::check_send(booking.status, contract.status)?;

    let updated = match ContractRepo::mark_sent(pool, id).await? {
        Some(updated) => updated,
        None => return Err(stale_write_error(pool, id, rules::check_send).await),
    };
    tracing::info!(contract_id = id, "Contract sent");
    Ok(updated)
}

/// Sign a contract, stamping `signed_at` (now unless supplied).
pub async fn mark_signed(
    pool: &DbPool,
    id: DbId,
    signed_at: Option<Timestamp>,
) -> AppResult<BookingContract> {
    let contract = get(pool, id).await?;
    let booking = booking::get(pool, contract.booking_id).await?;
    rules::check_sign(booking.status, contract.status)?;

    let signed_at = signed_at.unwrap_or_else(Utc::now);
    let updated = match ContractRepo::mark_signed(pool, id, signed_at).await? {
        Some(updated) => updated,
        None => return Err(stale_write_error(pool, id, rules::check_sign).await),
    };
    tracing::info!(contract_id = id, "Contract signed");
    Ok(updated)
}

/// Cancel a contract from any state. Re-cancelling restamps the time and
/// reason.
pub async fn cancel(
    pool: &DbPool,
    id: DbId,
    reason: Option<&str>,
) -> AppResult<BookingContract> {
    let contract = get(pool, id).await?;
    contract
        .status
        .validate_transition(ContractStatus::Cancelled)?;

    let reason = non_blank(reason);
    let updated = ContractRepo::mark_cancelled(pool, id, reason.as_deref())
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(contract_id = id, "Contract cancelled");
    Ok(updated)
}

/// Delete a contract. Deleting a missing contract succeeds.
pub async fn delete(pool: &DbPool, id: DbId) -> AppResult<()> {
    if ContractRepo::delete(pool, id).await? {
        tracing::info!(contract_id = id, "Contract deleted");
    }
    Ok(())
}
