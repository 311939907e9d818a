//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` request DTOs for creates, updates, and lifecycle actions
//! - Where the engine computes fields, a `New*` insert struct

pub mod booking;
pub mod contract;
pub mod customer;
pub mod facility;
