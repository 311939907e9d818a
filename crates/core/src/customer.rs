//! Customer directory rules: email normalization and required fields.

use crate::error::CoreError;
use crate::types::DbId;
use crate::validation;

/// Emails are stored and compared trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// `"first last"`, trimmed. Used for validation and contract snapshots.
pub fn display_name(first_name: &str, last_name: &str) -> String {
    format!("{} {}", first_name.trim(), last_name.trim())
        .trim()
        .to_string()
}

/// A customer needs a non-blank name and a well-formed email.
pub fn validate_customer(first_name: &str, last_name: &str, email: &str) -> Result<(), CoreError> {
    validation::ensure_required(&display_name(first_name, last_name), "Customer name is required.")?;
    validation::ensure_required(email, "Customer email is required.")?;
    if !validation::is_valid_email(email) {
        return Err(CoreError::Validation(
            "Invalid customer email address.".to_string(),
        ));
    }
    Ok(())
}

pub fn duplicate_email_error(email: &str, existing_id: DbId) -> CoreError {
    CoreError::Conflict(format!(
        "A customer with email '{email}' already exists (id={existing_id})."
    ))
}
