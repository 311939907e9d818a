//! Repository for the `facilities` table.

use sqlx::{PgExecutor, PgPool};
use kcv_core::types::DbId;

use crate::models::facility::{Facility, NewFacility};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, address, postal_code, city, \
                       max_capacity, price_per_day, is_active, created_at, updated_at";

/// Provides CRUD operations for facilities.
pub struct FacilityRepo;

impl FacilityRepo {
    /// Insert a new facility, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewFacility) -> Result<Facility, sqlx::Error> {
        let query = format!(
            "INSERT INTO facilities
                (name, description, address, postal_code, city, max_capacity, price_per_day, is_active)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Facility>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.address)
            .bind(&input.postal_code)
            .bind(&input.city)
            .bind(input.max_capacity)
            .bind(input.price_per_day)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Facility>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM facilities WHERE id = $1");
        sqlx::query_as::<_, Facility>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a facility and hold a row lock on it until the surrounding
    /// transaction ends. Booking writers for one facility serialize here.
    pub async fn find_by_id_for_update<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Facility>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM facilities WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Facility>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List all facilities ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Facility>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM facilities ORDER BY name, id");
        sqlx::query_as::<_, Facility>(&query).fetch_all(pool).await
    }

    /// List only bookable facilities, ordered by name.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Facility>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM facilities WHERE is_active = TRUE ORDER BY name, id");
        sqlx::query_as::<_, Facility>(&query).fetch_all(pool).await
    }

    /// Replace every writable field. Returns `None` if the facility does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &NewFacility,
    ) -> Result<Option<Facility>, sqlx::Error> {
        let query = format!(
            "UPDATE facilities SET
                name = $2,
                description = $3,
                address = $4,
                postal_code = $5,
                city = $6,
                max_capacity = $7,
                price_per_day = $8,
                is_active = $9
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Facility>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.address)
            .bind(&input.postal_code)
            .bind(&input.city)
            .bind(input.max_capacity)
            .bind(input.price_per_day)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_active(
        pool: &PgPool,
        id: DbId,
        is_active: bool,
    ) -> Result<Option<Facility>, sqlx::Error> {
        let query =
            format!("UPDATE facilities SET is_active = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Facility>(&query)
            .bind(id)
            .bind(is_active)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a facility by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM facilities WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
