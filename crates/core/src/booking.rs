//! Booking rules: lifecycle transitions, availability overlap, and pricing.
//!
//! The engine in the API crate loads records and persists results; every
//! decision about whether a booking may be created, moved, confirmed, or
//! cancelled is made here.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::CoreError;
use crate::status::BookingStatus;
use crate::types::{DbId, Timestamp};
use crate::validation;

/// Statuses that occupy a facility. Cancelled and Completed bookings never
/// block new bookings.
pub const ACTIVE_STATUSES: &[BookingStatus] = &[BookingStatus::Pending, BookingStatus::Confirmed];

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

impl BookingStatus {
    /// Whether a booking in this status occupies its facility.
    pub fn is_active(self) -> bool {
        ACTIVE_STATUSES.contains(&self)
    }

    /// Returns the set of statuses this status may transition to.
    ///
    /// - `Pending`   -> `Confirmed`, `Cancelled`
    /// - `Confirmed` -> `Cancelled`, `Completed`
    /// - `Cancelled` and `Completed` are terminal.
    pub fn valid_transitions(self) -> &'static [BookingStatus] {
        use BookingStatus::*;
        match self {
            Pending => &[Confirmed, Cancelled],
            Confirmed => &[Cancelled, Completed],
            Cancelled | Completed => &[],
        }
    }

    pub fn can_transition(self, to: BookingStatus) -> bool {
        self.valid_transitions().contains(&to)
    }

    /// Statuses from which `to` is reachable. Status writes only touch rows
    /// still in one of these.
    pub fn sources_of(to: BookingStatus) -> Vec<BookingStatus> {
        BookingStatus::ALL
            .iter()
            .copied()
            .filter(|s| s.can_transition(to))
            .collect()
    }

    pub fn validate_transition(self, to: BookingStatus) -> Result<(), CoreError> {
        if self.can_transition(to) {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "Cannot transition booking from {self} to {to}."
            )))
        }
    }

    /// Whether the booking's dates may still be changed.
    pub fn is_reschedulable(self) -> bool {
        self.is_active()
    }
}

/// What a confirm request should do given the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    /// Move the booking to Confirmed and stamp the confirmation time.
    Confirm,
    /// Already confirmed: return the booking unchanged.
    AlreadyConfirmed,
}

/// Decide whether a booking may be confirmed.
///
/// Checks, in order: not cancelled, not starting in the past (today is fine),
/// and a legal transition from the current status.
pub fn check_confirm(
    status: BookingStatus,
    start: Timestamp,
    today: NaiveDate,
) -> Result<ConfirmAction, CoreError> {
    if status == BookingStatus::Cancelled {
        return Err(CoreError::Validation(
            "Cannot confirm a cancelled booking.".to_string(),
        ));
    }
    if validation::is_date_in_past(start, today) {
        return Err(CoreError::Validation(
            "Cannot confirm a booking that starts in the past.".to_string(),
        ));
    }
    if status == BookingStatus::Confirmed {
        return Ok(ConfirmAction::AlreadyConfirmed);
    }
    status.validate_transition(BookingStatus::Confirmed)?;
    Ok(ConfirmAction::Confirm)
}

/// What a cancel request should do given the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelAction {
    Cancel,
    /// Already cancelled: succeed without touching the record.
    NoOp,
}

pub fn check_cancel(status: BookingStatus) -> Result<CancelAction, CoreError> {
    if status == BookingStatus::Cancelled {
        return Ok(CancelAction::NoOp);
    }
    status.validate_transition(BookingStatus::Cancelled)?;
    Ok(CancelAction::Cancel)
}

pub fn check_reschedule(status: BookingStatus) -> Result<(), CoreError> {
    match status {
        BookingStatus::Cancelled => Err(CoreError::Validation(
            "Cannot reschedule a cancelled booking.".to_string(),
        )),
        s if !s.is_reschedulable() => Err(CoreError::Validation(format!(
            "Cannot reschedule a {} booking.",
            s.name().to_lowercase()
        ))),
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Request validation
// ---------------------------------------------------------------------------

pub fn validate_participants(participants: i32) -> Result<(), CoreError> {
    if participants <= 0 {
        return Err(CoreError::Validation(
            "Number of participants must be greater than zero.".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_capacity(participants: i32, max_capacity: i32) -> Result<(), CoreError> {
    if participants > max_capacity {
        return Err(CoreError::Validation(format!(
            "Participants exceed facility capacity ({max_capacity})."
        )));
    }
    Ok(())
}

pub fn validate_facility_bookable(is_active: bool) -> Result<(), CoreError> {
    if !is_active {
        return Err(CoreError::Validation(
            "Facility is not active and cannot be booked.".to_string(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Overlap
// ---------------------------------------------------------------------------

// The reservation queries in the db crate evaluate these same predicates in
// SQL; its integration tests check both agree.

/// Conflict test used to gate new bookings.
///
/// Half-open: ranges that only touch at a boundary do not conflict.
pub fn overlaps_strict(
    a_start: Timestamp,
    a_end: Timestamp,
    b_start: Timestamp,
    b_end: Timestamp,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// Discovery test used by date-range listings. Touching boundaries match.
pub fn overlaps_inclusive(
    a_start: Timestamp,
    a_end: Timestamp,
    b_start: Timestamp,
    b_end: Timestamp,
) -> bool {
    a_start <= b_end && a_end >= b_start
}

/// Build the conflict error for a facility that is already taken.
pub fn conflict_error(facility_id: DbId, start: Timestamp, end: Timestamp) -> CoreError {
    CoreError::Conflict(format!(
        "Booking conflict for facility {facility_id} between {} and {}.",
        start.format("%Y-%m-%d %H:%M"),
        end.format("%Y-%m-%d %H:%M"),
    ))
}

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

/// Whole calendar days between the two dates, never less than one.
pub fn billable_days(start: Timestamp, end: Timestamp) -> i64 {
    (end.date_naive() - start.date_naive()).num_days().max(1)
}

pub fn total_price(price_per_day: Decimal, start: Timestamp, end: Timestamp) -> Decimal {
    price_per_day * Decimal::from(billable_days(start, end))
}

/// A computed price must still fit the booking's money column.
pub fn validate_total_price(price: Decimal) -> Result<(), CoreError> {
    validation::ensure_storable_amount(price, "Total price")
}

// ---------------------------------------------------------------------------
// Notes
// ---------------------------------------------------------------------------

/// Append a cancellation note to the existing notes. Blank reasons add nothing.
pub fn append_cancellation_note(notes: &str, reason: Option<&str>) -> String {
    match validation::non_blank(reason) {
        Some(reason) => format!("{notes} Cancellation reason: {reason}"),
        None => notes.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone, Utc};

    fn at(y: i32, m: u32, d: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn active_statuses_are_pending_and_confirmed() {
        assert!(BookingStatus::Pending.is_active());
        assert!(BookingStatus::Confirmed.is_active());
        assert!(!BookingStatus::Cancelled.is_active());
        assert!(!BookingStatus::Completed.is_active());
    }

    #[test]
    fn terminal_statuses_have_no_transitions() {
        assert!(BookingStatus::Cancelled.valid_transitions().is_empty());
        assert!(BookingStatus::Completed.valid_transitions().is_empty());
    }

    #[test]
    fn completion_requires_confirmation() {
        assert!(BookingStatus::Confirmed.can_transition(BookingStatus::Completed));
        assert!(!BookingStatus::Pending.can_transition(BookingStatus::Completed));
        assert_matches!(
            BookingStatus::Pending.validate_transition(BookingStatus::Completed),
            Err(CoreError::Validation(msg)) if msg.contains("Pending to Completed")
        );
    }

    #[test]
    fn confirm_pending_booking() {
        assert_eq!(
            check_confirm(BookingStatus::Pending, at(2025, 6, 3), today()).unwrap(),
            ConfirmAction::Confirm
        );
    }

    #[test]
    fn confirm_today_is_allowed() {
        let later_today = at(2025, 6, 1) + Duration::hours(15);
        assert!(check_confirm(BookingStatus::Pending, later_today, today()).is_ok());
    }

    #[test]
    fn confirm_rejects_cancelled_before_checking_dates() {
        let err = check_confirm(BookingStatus::Cancelled, at(2024, 1, 1), today()).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("cancelled"));
    }

    #[test]
    fn confirm_rejects_past_start() {
        let err = check_confirm(BookingStatus::Pending, at(2025, 5, 31), today()).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("past"));
    }

    #[test]
    fn confirm_is_idempotent() {
        assert_eq!(
            check_confirm(BookingStatus::Confirmed, at(2025, 6, 3), today()).unwrap(),
            ConfirmAction::AlreadyConfirmed
        );
    }

    #[test]
    fn confirm_rejects_completed() {
        assert!(check_confirm(BookingStatus::Completed, at(2025, 6, 3), today()).is_err());
    }

    #[test]
    fn cancel_twice_is_a_no_op() {
        assert_eq!(check_cancel(BookingStatus::Pending).unwrap(), CancelAction::Cancel);
        assert_eq!(check_cancel(BookingStatus::Confirmed).unwrap(), CancelAction::Cancel);
        assert_eq!(check_cancel(BookingStatus::Cancelled).unwrap(), CancelAction::NoOp);
        assert!(check_cancel(BookingStatus::Completed).is_err());
    }

    #[test]
    fn reschedule_only_active_bookings() {
        assert!(check_reschedule(BookingStatus::Pending).is_ok());
        assert!(check_reschedule(BookingStatus::Confirmed).is_ok());
        assert_matches!(
            check_reschedule(BookingStatus::Cancelled),
            Err(CoreError::Validation(msg)) if msg == "Cannot reschedule a cancelled booking."
        );
        assert_matches!(
            check_reschedule(BookingStatus::Completed),
            Err(CoreError::Validation(msg)) if msg.contains("completed")
        );
    }

    #[test]
    fn participants_and_capacity() {
        assert!(validate_participants(0).is_err());
        assert!(validate_participants(-3).is_err());
        assert!(validate_participants(1).is_ok());
        assert!(validate_capacity(50, 50).is_ok());
        assert_matches!(
            validate_capacity(51, 50),
            Err(CoreError::Validation(msg)) if msg.contains("(50)")
        );
    }

    #[test]
    fn inactive_facility_cannot_be_booked() {
        assert!(validate_facility_bookable(true).is_ok());
        assert!(validate_facility_bookable(false).is_err());
    }

    #[test]
    fn strict_overlap_detects_intersection() {
        let (a1, a2) = (at(2025, 6, 1), at(2025, 6, 3));
        assert!(overlaps_strict(a1, a2, at(2025, 6, 2), at(2025, 6, 4)));
        assert!(overlaps_strict(a1, a2, at(2025, 5, 30), at(2025, 6, 5)));
        assert!(overlaps_strict(a1, a2, a1, a2));
    }

    #[test]
    fn strict_overlap_ignores_touching_boundaries() {
        let (a1, a2) = (at(2025, 6, 1), at(2025, 6, 3));
        assert!(!overlaps_strict(a1, a2, a2, at(2025, 6, 5)));
        assert!(!overlaps_strict(a1, a2, at(2025, 5, 28), a1));
    }

    #[test]
    fn inclusive_overlap_matches_touching_boundaries() {
        let (b1, b2) = (at(2025, 6, 1), at(2025, 6, 3));
        // A query starting exactly where B ends still finds B.
        assert!(overlaps_inclusive(b1, b2, b2, at(2025, 6, 10)));
        assert!(!overlaps_strict(b1, b2, b2, at(2025, 6, 10)));
        assert!(!overlaps_inclusive(b1, b2, at(2025, 6, 4), at(2025, 6, 10)));
    }

    #[test]
    fn same_day_booking_bills_one_day() {
        let start = at(2025, 6, 1) + Duration::hours(9);
        let end = at(2025, 6, 1) + Duration::hours(17);
        assert_eq!(billable_days(start, end), 1);
        assert_eq!(total_price(Decimal::from(1000), start, end), Decimal::from(1000));
    }

    #[test]
    fn price_is_rate_times_days() {
        let price = total_price(Decimal::new(125050, 2), at(2025, 6, 1), at(2025, 6, 3));
        assert_eq!(price, Decimal::new(250100, 2));
    }

    #[test]
    fn days_ignore_time_of_day() {
        // 23:00 -> 01:00 next day crosses one calendar boundary.
        let start = at(2025, 6, 1) + Duration::hours(23);
        let end = at(2025, 6, 2) + Duration::hours(1);
        assert_eq!(billable_days(start, end), 1);
    }

    #[test]
    fn long_expensive_booking_exceeds_money_column() {
        let price = total_price(Decimal::from(9_999_999), at(2025, 6, 1), at(2030, 11, 22));
        assert_matches!(
            validate_total_price(price),
            Err(CoreError::Validation(msg)) if msg.starts_with("Total price cannot exceed")
        );
        assert!(validate_total_price(Decimal::from(2000)).is_ok());
    }

    #[test]
    fn guarded_write_sources() {
        use BookingStatus::*;
        assert_eq!(BookingStatus::sources_of(Confirmed), vec![Pending]);
        assert_eq!(BookingStatus::sources_of(Cancelled), vec![Pending, Confirmed]);
        assert_eq!(BookingStatus::sources_of(Completed), vec![Confirmed]);
    }

    #[test]
    fn conflict_error_names_facility_and_range() {
        let err = conflict_error(7, at(2025, 6, 1), at(2025, 6, 3));
        assert_matches!(
            err,
            CoreError::Conflict(msg)
                if msg == "Booking conflict for facility 7 between 2025-06-01 00:00 and 2025-06-03 00:00."
        );
    }

    #[test]
    fn cancellation_note_preserves_prior_notes() {
        assert_eq!(
            append_cancellation_note("Projector needed.", Some("  budget cut ")),
            "Projector needed. Cancellation reason: budget cut"
        );
        assert_eq!(append_cancellation_note("Keep me", None), "Keep me");
        assert_eq!(append_cancellation_note("Keep me", Some("   ")), "Keep me");
    }
}
