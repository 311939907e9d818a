//! Booking contract rules.
//!
//! A contract is derived from a booking once, then moves through
//! Draft -> Sent -> Signed, with Cancelled reachable from any state. Signing
//! straight from Draft is allowed. Signed and Cancelled contracts are frozen
//! for edits.

use chrono::Duration;
use rust_decimal::Decimal;

use crate::error::CoreError;
use crate::status::{BookingStatus, ContractStatus};
use crate::types::{DbId, Timestamp};
use crate::validation;

/// Company prefix of every contract number.
pub const CONTRACT_NUMBER_PREFIX: &str = "KCV";

/// Currency of every contract amount.
pub const DEFAULT_CURRENCY: &str = "SEK";

/// Version assigned to a freshly created contract.
pub const INITIAL_VERSION: i32 = 1;

/// Default payment deadline relative to the booking start.
pub const PAYMENT_DUE_DAYS_BEFORE_START: i64 = 7;

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

impl ContractStatus {
    /// Signed and Cancelled contracts reject edits to terms, amount, and due date.
    pub fn is_frozen(self) -> bool {
        matches!(self, ContractStatus::Signed | ContractStatus::Cancelled)
    }

    /// Returns the set of statuses this status may transition to.
    ///
    /// - `Draft`     -> `Sent`, `Signed`, `Cancelled`
    /// - `Sent`      -> `Sent` (re-send), `Signed`, `Cancelled`
    /// - `Signed`    -> `Cancelled`
    /// - `Cancelled` -> `Cancelled` (re-cancel is not guarded)
    pub fn valid_transitions(self) -> &'static [ContractStatus] {
        use ContractStatus::*;
        match self {
            Draft => &[Sent, Signed, Cancelled],
            Sent => &[Sent, Signed, Cancelled],
            Signed => &[Cancelled],
            Cancelled => &[Cancelled],
        }
    }

    pub fn can_transition(self, to: ContractStatus) -> bool {
        self.valid_transitions().contains(&to)
    }

    /// Statuses from which `to` is reachable. Status writes only touch rows
    /// still in one of these.
    pub fn sources_of(to: ContractStatus) -> Vec<ContractStatus> {
        ContractStatus::ALL
            .iter()
            .copied()
            .filter(|s| s.can_transition(to))
            .collect()
    }

    pub fn validate_transition(self, to: ContractStatus) -> Result<(), CoreError> {
        if self.can_transition(to) {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "Cannot transition contract from {self} to {to}."
            )))
        }
    }
}

/// A contract may only be created for a booking that is not cancelled.
pub fn check_create(booking_status: BookingStatus) -> Result<(), CoreError> {
    if booking_status == BookingStatus::Cancelled {
        return Err(CoreError::Validation(
            "Cannot create a contract for a cancelled booking.".to_string(),
        ));
    }
    Ok(())
}

pub fn check_patch(status: ContractStatus) -> Result<(), CoreError> {
    if status.is_frozen() {
        return Err(frozen_error());
    }
    Ok(())
}

pub fn frozen_error() -> CoreError {
    CoreError::Validation("Cannot modify a signed or cancelled contract.".to_string())
}

/// Checks for marking a contract as sent: the booking must be confirmed and
/// the contract must not be cancelled or already signed.
pub fn check_send(
    booking_status: BookingStatus,
    status: ContractStatus,
) -> Result<(), CoreError> {
    if booking_status != BookingStatus::Confirmed {
        return Err(CoreError::Validation(
            "Cannot send contract for unconfirmed booking. Confirm the booking first.".to_string(),
        ));
    }
    if status == ContractStatus::Cancelled {
        return Err(CoreError::Validation(
            "Cannot mark a cancelled contract as sent.".to_string(),
        ));
    }
    status.validate_transition(ContractStatus::Sent)
}

/// Checks for signing a contract. Draft contracts may be signed directly.
pub fn check_sign(
    booking_status: BookingStatus,
    status: ContractStatus,
) -> Result<(), CoreError> {
    if booking_status != BookingStatus::Confirmed {
        return Err(CoreError::Validation(
            "Cannot sign contract for unconfirmed booking. Confirm the booking first.".to_string(),
        ));
    }
    if status == ContractStatus::Cancelled {
        return Err(CoreError::Validation(
            "Cannot sign a cancelled contract.".to_string(),
        ));
    }
    status.validate_transition(ContractStatus::Signed)
}

// ---------------------------------------------------------------------------
// Derived fields
// ---------------------------------------------------------------------------

/// `KCV-<year>-<booking id zero-padded to 6 digits>`.
pub fn contract_number(year: i32, booking_id: DbId) -> String {
    format!("{CONTRACT_NUMBER_PREFIX}-{year}-{booking_id:06}")
}

pub fn default_payment_due(booking_start: Timestamp) -> Timestamp {
    booking_start - Duration::days(PAYMENT_DUE_DAYS_BEFORE_START)
}

pub fn validate_total_amount(amount: Decimal) -> Result<(), CoreError> {
    validation::ensure_storable_amount(amount, "Total amount")
}

/// Booking details rendered into the default terms.
#[derive(Debug, Clone)]
pub struct TermsContext<'a> {
    pub facility_name: &'a str,
    pub start: Timestamp,
    pub end: Timestamp,
    pub participants: i32,
    pub total_amount: Decimal,
}

/// Render the standard contract terms for a booking.
pub fn default_terms(ctx: &TermsContext<'_>) -> String {
    format!(
        "Booking Contract for {facility}\n\
         Dates: {start} to {end}\n\
         Participants: {participants}\n\
         Total Amount: {amount} {DEFAULT_CURRENCY}\n\
         \n\
         General terms:\n\
         - Payment due {PAYMENT_DUE_DAYS_BEFORE_START} days before start.\n\
         - Cancellation policy: 50% within 7 days, 100% within 48 hours.\n\
         - Damages and extra services will be invoiced separately.",
        facility = ctx.facility_name,
        start = ctx.start.format("%Y-%m-%d"),
        end = ctx.end.format("%Y-%m-%d"),
        participants = ctx.participants,
        amount = format_amount(ctx.total_amount),
    )
}

/// Use the caller's terms when they are not blank, otherwise the template.
pub fn resolve_terms(terms_override: Option<&str>, ctx: &TermsContext<'_>) -> String {
    validation::non_blank(terms_override).unwrap_or_else(|| default_terms(ctx))
}

/// At most two decimals, trailing zeros dropped (`2000`, `1250.5`).
pub fn format_amount(amount: Decimal) -> String {
    amount.round_dp(2).normalize().to_string()
}
