//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that accept
//! `&PgPool` as the first argument. Writes that must be checked against other
//! rows (booking reservations) open their own transaction.

pub mod booking_repo;
pub mod contract_repo;
pub mod customer_repo;
pub mod facility_repo;

pub use booking_repo::BookingRepo;
pub use contract_repo::ContractRepo;
pub use customer_repo::CustomerRepo;
pub use facility_repo::FacilityRepo;
