use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Lookup by a non-primary key (e.g. a customer by email, a contract by booking).
    #[error("Entity not found: {entity} with {key} {value}")]
    NotFoundBy {
        entity: &'static str,
        key: &'static str,
        value: String,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl CoreError {
    /// The record left the state a guarded write expected between the read
    /// and the write, and the current state does not explain the outcome.
    pub fn concurrent_update(entity: &'static str, id: DbId) -> Self {
        CoreError::Conflict(format!(
            "{entity} {id} was modified by another request. Please retry."
        ))
    }
}
