//! Repository for the `booking_contracts` table.

use sqlx::PgPool;
use kcv_core::contract::INITIAL_VERSION;
use kcv_core::status::{BookingStatus, ContractStatus, StatusId};
use kcv_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;

use crate::models::contract::{BookingContract, NewContract};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, booking_id, contract_number, version, status_id, terms, \
                       total_amount, currency, payment_due_date, customer_name, \
                       customer_email, facility_name, last_updated, signed_at, \
                       cancelled_at, cancel_reason, created_at, updated_at";

/// Edits applied by [`ContractRepo::patch`]. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ContractChanges {
    pub terms: Option<String>,
    pub total_amount: Option<Decimal>,
    pub payment_due_date: Option<Timestamp>,
}

/// Guard shared by send and sign; `$4` is the Confirmed booking status id.
const BOOKING_CONFIRMED: &str = "EXISTS (
    SELECT 1 FROM bookings b
    WHERE b.id = booking_contracts.booking_id AND b.status_id = $4
    FOR SHARE
)";

fn sources(to: ContractStatus) -> Vec<StatusId> {
    ContractStatus::sources_of(to).iter().map(|s| s.id()).collect()
}

fn editable_status_ids() -> Vec<StatusId> {
    ContractStatus::ALL
        .iter()
        .filter(|s| !s.is_frozen())
        .map(|s| s.id())
        .collect()
}

/// Provides CRUD and lifecycle writes for booking contracts.
pub struct ContractRepo;

impl ContractRepo {
    /// Insert a Draft contract at the initial version.
    pub async fn create(
        pool: &PgPool,
        input: &NewContract,
    ) -> Result<BookingContract, sqlx::Error> {
        let query = format!(
            "INSERT INTO booking_contracts
                (booking_id, contract_number, version, status_id, terms, total_amount,
                 currency, payment_due_date, customer_name, customer_email, facility_name)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BookingContract>(&query)
            .bind(input.booking_id)
            .bind(&input.contract_number)
            .bind(INITIAL_VERSION)
            .bind(ContractStatus::Draft.id())
            .bind(&input.terms)
            .bind(input.total_amount)
            .bind(&input.currency)
            .bind(input.payment_due_date)
            .bind(&input.customer_name)
            .bind(&input.customer_email)
            .bind(&input.facility_name)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<BookingContract>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM booking_contracts WHERE id = $1");
        sqlx::query_as::<_, BookingContract>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_booking_id(
        pool: &PgPool,
        booking_id: DbId,
    ) -> Result<Option<BookingContract>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM booking_contracts WHERE booking_id = $1");
        sqlx::query_as::<_, BookingContract>(&query)
            .bind(booking_id)
            .fetch_optional(pool)
            .await
    }

    /// List all contracts, most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<BookingContract>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM booking_contracts ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, BookingContract>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn exists_for_booking(pool: &PgPool, booking_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM booking_contracts WHERE booking_id = $1)",
        )
        .bind(booking_id)
        .fetch_one(pool)
        .await
    }

    /// Apply `changes`, bump the version, and stamp `last_updated`.
    ///
    /// Only Draft and Sent contracts are touched; returns `None` if the
    /// contract is missing or frozen.
    pub async fn patch(
        pool: &PgPool,
        id: DbId,
        changes: &ContractChanges,
    ) -> Result<Option<BookingContract>, sqlx::Error> {
        let query = format!(
            "UPDATE booking_contracts SET
                terms = COALESCE($2, terms),
                total_amount = COALESCE($3, total_amount),
                payment_due_date = COALESCE($4, payment_due_date),
                version = version + 1,
                last_updated = NOW()
             WHERE id = $1 AND status_id = ANY($5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BookingContract>(&query)
            .bind(id)
            .bind(&changes.terms)
            .bind(changes.total_amount)
            .bind(changes.payment_due_date)
            .bind(editable_status_ids())
            .fetch_optional(pool)
            .await
    }

    // Send and sign apply only while the contract's status can reach the
    // target and its booking is Confirmed; the booking row is share locked
    // for the write. `None` means a condition failed or the contract is
    // missing.

    pub async fn mark_sent(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<BookingContract>, sqlx::Error> {
        let query = format!(
            "UPDATE booking_contracts SET status_id = $2, last_updated = NOW()
             WHERE id = $1 AND status_id = ANY($3) AND {BOOKING_CONFIRMED}
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BookingContract>(&query)
            .bind(id)
            .bind(ContractStatus::Sent.id())
            .bind(sources(ContractStatus::Sent))
            .bind(BookingStatus::Confirmed.id())
            .fetch_optional(pool)
            .await
    }

    pub async fn mark_signed(
        pool: &PgPool,
        id: DbId,
        signed_at: Timestamp,
    ) -> Result<Option<BookingContract>, sqlx::Error> {
        let query = format!(
            "UPDATE booking_contracts SET status_id = $2, signed_at = $5, last_updated = NOW()
             WHERE id = $1 AND status_id = ANY($3) AND {BOOKING_CONFIRMED}
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BookingContract>(&query)
            .bind(id)
            .bind(ContractStatus::Signed.id())
            .bind(sources(ContractStatus::Signed))
            .bind(BookingStatus::Confirmed.id())
            .bind(signed_at)
            .fetch_optional(pool)
            .await
    }

    pub async fn mark_cancelled(
        pool: &PgPool,
        id: DbId,
        reason: Option<&str>,
    ) -> Result<Option<BookingContract>, sqlx::Error> {
        let query = format!(
            "UPDATE booking_contracts SET
                status_id = $2, cancelled_at = NOW(), cancel_reason = $3, last_updated = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BookingContract>(&query)
            .bind(id)
            .bind(ContractStatus::Cancelled.id())
            .bind(reason)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a contract. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM booking_contracts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
