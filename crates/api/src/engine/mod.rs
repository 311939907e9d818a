//! Domain orchestration over the repositories.
//!
//! Handlers stay thin: they extract the request and call one engine function.
//! Each engine function runs its precondition checks in a fixed order and
//! fails fast on the first violation.
//!
//! - [`facility`]: facility directory.
//! - [`customer`]: customer directory with email uniqueness.
//! - [`booking`]: the availability and booking engine.
//! - [`contract`]: contract derivation and lifecycle.

pub mod booking;
pub mod contract;
pub mod customer;
pub mod facility;
