//! Domain rules for the conference-centre reservation service.
//!
//! This crate has zero internal dependencies. Everything here is pure:
//! callers pass in "today" and the current records, and get back either a
//! value or a [`error::CoreError`].

pub mod booking;
pub mod contract;
pub mod customer;
pub mod dates;
pub mod error;
pub mod facility;
pub mod status;
pub mod types;
pub mod validation;
