//! Input validation shared by every directory and engine.
//!
//! Each `ensure_*` function fails fast with [`CoreError::Validation`] on the
//! first violated rule; the `is_*` predicates are the underlying checks.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Maximum accepted email length (RFC 5321 path limit).
pub const MAX_EMAIL_LENGTH: usize = 254;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").expect("valid regex")
});

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

/// Whether `date` falls on a calendar day before `today`.
///
/// Only the date component is compared, so any time today is not in the past.
pub fn is_date_in_past(date: Timestamp, today: NaiveDate) -> bool {
    date.date_naive() < today
}

/// A range is valid when it starts today or later and ends strictly after it starts.
pub fn is_valid_range(start: Timestamp, end: Timestamp, today: NaiveDate) -> bool {
    start.date_naive() >= today && end > start
}

pub fn ensure_valid_range(
    start: Timestamp,
    end: Timestamp,
    today: NaiveDate,
) -> Result<(), CoreError> {
    if is_valid_range(start, end, today) {
        Ok(())
    } else {
        Err(CoreError::Validation(
            "Invalid date range: start must be today or later and end must be after start."
                .to_string(),
        ))
    }
}

// ---------------------------------------------------------------------------
// Strings
// ---------------------------------------------------------------------------

pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && email.len() <= MAX_EMAIL_LENGTH && EMAIL_RE.is_match(email)
}

/// Reject blank (empty or whitespace-only) required fields.
pub fn ensure_required(value: &str, message: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        Err(CoreError::Validation(message.to_string()))
    } else {
        Ok(())
    }
}

/// Trim an optional string, mapping `None` to the empty string.
pub fn trim_or_empty(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

/// Trim an optional string, mapping blank input to `None`.
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Money
// ---------------------------------------------------------------------------

/// Largest value a `NUMERIC(12,2)` money column holds.
pub fn max_amount() -> Decimal {
    Decimal::new(999_999_999_999, 2)
}

/// Reject amounts a money column cannot store. `label` opens the message.
///
/// The upper bound is checked after rounding to cents the way PostgreSQL
/// does, so `9999999999.995` is rejected.
pub fn ensure_storable_amount(amount: Decimal, label: &str) -> Result<(), CoreError> {
    if amount < Decimal::ZERO {
        return Err(CoreError::Validation(format!("{label} cannot be negative.")));
    }
    let stored = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if stored > max_amount() {
        return Err(CoreError::Validation(format!(
            "{label} cannot exceed {}.",
            max_amount()
        )));
    }
    Ok(())
}
