//! Repository for the `bookings` table.
//!
//! Reservation writes (`create_if_available`, `reschedule_if_available`) run
//! the overlap check and the write in one transaction that holds the
//! facility row lock, so two requests for the same facility cannot both pass
//! the check. The `ex_bookings_facility_active_range` exclusion constraint
//! backs this up at the storage level.

use sqlx::{PgExecutor, PgPool};
use kcv_core::booking::ACTIVE_STATUSES;
use kcv_core::status::{BookingStatus, StatusId};
use kcv_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;

use crate::models::booking::{Booking, NewBooking, Reservation};
use crate::repositories::FacilityRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, customer_id, facility_id, start_date, end_date, \
                       number_of_participants, notes, status_id, total_price, \
                       confirmed_at, cancelled_at, created_at, updated_at";

fn status_ids(statuses: &[BookingStatus]) -> Vec<StatusId> {
    statuses.iter().map(|s| s.id()).collect()
}

fn sources(to: BookingStatus) -> Vec<StatusId> {
    status_ids(&BookingStatus::sources_of(to))
}

/// Provides booking queries and lifecycle writes.
pub struct BookingRepo;

impl BookingRepo {
    // -----------------------------------------------------------------------
    // Reservation writes
    // -----------------------------------------------------------------------

    /// Insert a Pending booking unless an active booking on the same facility
    /// overlaps `[start_date, end_date)`.
    ///
    /// Returns `RowNotFound` if the facility disappeared since validation.
    pub async fn create_if_available(
        pool: &PgPool,
        input: &NewBooking,
    ) -> Result<Reservation, sqlx::Error> {
        let mut tx = pool.begin().await?;

        FacilityRepo::find_by_id_for_update(&mut *tx, input.facility_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        if Self::has_overlap(
            &mut *tx,
            input.facility_id,
            input.start_date,
            input.end_date,
            ACTIVE_STATUSES,
        )
        .await?
        {
            tracing::debug!(facility_id = input.facility_id, "Reservation rejected: range taken");
            return Ok(Reservation::Conflict);
        }

        let query = format!(
            "INSERT INTO bookings
                (customer_id, facility_id, start_date, end_date,
                 number_of_participants, notes, status_id, total_price)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        let booking = sqlx::query_as::<_, Booking>(&query)
            .bind(input.customer_id)
            .bind(input.facility_id)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.number_of_participants)
            .bind(&input.notes)
            .bind(BookingStatus::Pending.id())
            .bind(input.total_price)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Reservation::Reserved(booking))
    }

    /// Move a booking to a new range and price unless another active booking
    /// on its facility overlaps the new range. The booking itself is ignored
    /// by the overlap check.
    ///
    /// Returns `None` if the booking is missing or no longer active; the
    /// caller re-reads it to find out which.
    pub async fn reschedule_if_available(
        pool: &PgPool,
        booking: &Booking,
        start_date: Timestamp,
        end_date: Timestamp,
        total_price: Decimal,
    ) -> Result<Option<Reservation>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        FacilityRepo::find_by_id_for_update(&mut *tx, booking.facility_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        if Self::has_overlap_excluding(
            &mut *tx,
            booking.id,
            booking.facility_id,
            start_date,
            end_date,
            ACTIVE_STATUSES,
        )
        .await?
        {
            tracing::debug!(
                booking_id = booking.id,
                facility_id = booking.facility_id,
                "Reschedule rejected: range taken",
            );
            return Ok(Some(Reservation::Conflict));
        }

        let query = format!(
            "UPDATE bookings SET start_date = $2, end_date = $3, total_price = $4
             WHERE id = $1 AND status_id = ANY($5)
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Booking>(&query)
            .bind(booking.id)
            .bind(start_date)
            .bind(end_date)
            .bind(total_price)
            .bind(status_ids(ACTIVE_STATUSES))
            .fetch_optional(&mut *tx)
            .await?;

        match updated {
            Some(updated) => {
                tx.commit().await?;
                Ok(Some(Reservation::Reserved(updated)))
            }
            None => {
                tracing::debug!(booking_id = booking.id, "Reschedule skipped: booking not active");
                Ok(None)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Overlap predicates
    // -----------------------------------------------------------------------

    /// Strict half-open overlap with any booking in `statuses` on the facility.
    pub async fn has_overlap<'e>(
        executor: impl PgExecutor<'e>,
        facility_id: DbId,
        start_date: Timestamp,
        end_date: Timestamp,
        statuses: &[BookingStatus],
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM bookings
                WHERE facility_id = $1
                  AND status_id = ANY($2)
                  AND start_date < $4
                  AND end_date > $3
            )",
        )
        .bind(facility_id)
        .bind(status_ids(statuses))
        .bind(start_date)
        .bind(end_date)
        .fetch_one(executor)
        .await
    }

    /// Same as [`Self::has_overlap`], ignoring the booking `exclude_id`.
    pub async fn has_overlap_excluding<'e>(
        executor: impl PgExecutor<'e>,
        exclude_id: DbId,
        facility_id: DbId,
        start_date: Timestamp,
        end_date: Timestamp,
        statuses: &[BookingStatus],
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM bookings
                WHERE facility_id = $1
                  AND id <> $5
                  AND status_id = ANY($2)
                  AND start_date < $4
                  AND end_date > $3
            )",
        )
        .bind(facility_id)
        .bind(status_ids(statuses))
        .bind(start_date)
        .bind(end_date)
        .bind(exclude_id)
        .fetch_one(executor)
        .await
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all bookings, most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Booking>(&query).fetch_all(pool).await
    }

    /// A customer's bookings, latest start first.
    pub async fn list_by_customer(
        pool: &PgPool,
        customer_id: DbId,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings WHERE customer_id = $1
             ORDER BY start_date DESC, id DESC"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(customer_id)
            .fetch_all(pool)
            .await
    }

    /// A facility's bookings, earliest start first.
    pub async fn list_by_facility(
        pool: &PgPool,
        facility_id: DbId,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings WHERE facility_id = $1
             ORDER BY start_date ASC, id ASC"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(facility_id)
            .fetch_all(pool)
            .await
    }

    /// Bookings touching `[from, to]`, boundaries included, earliest start first.
    ///
    /// Deliberately looser than the reservation check: a booking ending
    /// exactly at `from` is listed.
    pub async fn list_in_range(
        pool: &PgPool,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings WHERE start_date <= $2 AND end_date >= $1
             ORDER BY start_date ASC, id ASC"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }

    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM bookings WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Number of bookings of any status referencing a facility.
    pub async fn count_by_facility(pool: &PgPool, facility_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bookings WHERE facility_id = $1")
            .bind(facility_id)
            .fetch_one(pool)
            .await
    }

    /// Number of Pending or Confirmed bookings held by a customer.
    pub async fn count_active_by_customer(
        pool: &PgPool,
        customer_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM bookings WHERE customer_id = $1 AND status_id = ANY($2)",
        )
        .bind(customer_id)
        .bind(status_ids(ACTIVE_STATUSES))
        .fetch_one(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Status writes
    // -----------------------------------------------------------------------

    // Each write applies only while the row is still in a status the target
    // is reachable from. `None` means the booking is missing or has moved on.

    pub async fn mark_confirmed(pool: &PgPool, id: DbId) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            "UPDATE bookings SET status_id = $2, confirmed_at = NOW()
             WHERE id = $1 AND status_id = ANY($3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .bind(BookingStatus::Confirmed.id())
            .bind(sources(BookingStatus::Confirmed))
            .fetch_optional(pool)
            .await
    }

    /// Cancel a booking, replacing its notes with `notes`.
    pub async fn mark_cancelled(
        pool: &PgPool,
        id: DbId,
        notes: &str,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            "UPDATE bookings SET status_id = $2, cancelled_at = NOW(), notes = $3
             WHERE id = $1 AND status_id = ANY($4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .bind(BookingStatus::Cancelled.id())
            .bind(notes)
            .bind(sources(BookingStatus::Cancelled))
            .fetch_optional(pool)
            .await
    }

    pub async fn mark_completed(pool: &PgPool, id: DbId) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            "UPDATE bookings SET status_id = $2
             WHERE id = $1 AND status_id = ANY($3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .bind(BookingStatus::Completed.id())
            .bind(sources(BookingStatus::Completed))
            .fetch_optional(pool)
            .await
    }
}
