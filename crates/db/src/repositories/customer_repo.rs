//! Repository for the `customers` table.

use sqlx::PgPool;
use kcv_core::booking::ACTIVE_STATUSES;
use kcv_core::status::StatusId;
use kcv_core::types::DbId;

use crate::models::customer::{Customer, CustomerWithStats, NewCustomer};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, first_name, last_name, email, phone, company_name, \
                       address, postal_code, city, created_at, updated_at";

/// Customer columns plus booking counts. `$1` must be bound to the active
/// status ids.
const STATS_SELECT: &str = "SELECT c.id, c.first_name, c.last_name, c.email, c.phone, \
        c.company_name, c.address, c.postal_code, c.city, c.created_at, c.updated_at, \
        (SELECT COUNT(*) FROM bookings b WHERE b.customer_id = c.id) AS total_bookings, \
        (SELECT COUNT(*) FROM bookings b \
            WHERE b.customer_id = c.id AND b.status_id = ANY($1)) AS active_bookings \
     FROM customers c";

fn active_status_ids() -> Vec<StatusId> {
    ACTIVE_STATUSES.iter().map(|s| s.id()).collect()
}

/// Provides CRUD operations for customers.
pub struct CustomerRepo;

impl CustomerRepo {
    /// Insert a new customer. `input.email` must already be normalized.
    pub async fn create(pool: &PgPool, input: &NewCustomer) -> Result<Customer, sqlx::Error> {
        let query = format!(
            "INSERT INTO customers
                (first_name, last_name, email, phone, company_name, address, postal_code, city)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.company_name)
            .bind(&input.address)
            .bind(&input.postal_code)
            .bind(&input.city)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM customers WHERE id = $1");
        sqlx::query_as::<_, Customer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Look up by normalized email.
    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM customers WHERE email = $1");
        sqlx::query_as::<_, Customer>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_with_stats(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CustomerWithStats>, sqlx::Error> {
        let query = format!("{STATS_SELECT} WHERE c.id = $2");
        sqlx::query_as::<_, CustomerWithStats>(&query)
            .bind(active_status_ids())
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_with_stats_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<CustomerWithStats>, sqlx::Error> {
        let query = format!("{STATS_SELECT} WHERE c.email = $2");
        sqlx::query_as::<_, CustomerWithStats>(&query)
            .bind(active_status_ids())
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List all customers with booking counts, ordered by name.
    pub async fn list_with_stats(pool: &PgPool) -> Result<Vec<CustomerWithStats>, sqlx::Error> {
        let query = format!("{STATS_SELECT} ORDER BY c.last_name, c.first_name, c.id");
        sqlx::query_as::<_, CustomerWithStats>(&query)
            .bind(active_status_ids())
            .fetch_all(pool)
            .await
    }

    /// Replace every writable field. Returns `None` if the customer does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &NewCustomer,
    ) -> Result<Option<Customer>, sqlx::Error> {
        let query = format!(
            "UPDATE customers SET
                first_name = $2,
                last_name = $3,
                email = $4,
                phone = $5,
                company_name = $6,
                address = $7,
                postal_code = $8,
                city = $9
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.company_name)
            .bind(&input.address)
            .bind(&input.postal_code)
            .bind(&input.city)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM customers WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Permanently delete a customer. Their bookings and contracts cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
