//! Customer directory operations.
//!
//! Emails are normalized before every lookup and write, so uniqueness is
//! case-insensitive. The `uq_customers_email` constraint backs up the
//! duplicate check.

use kcv_core::customer::{duplicate_email_error, normalize_email, validate_customer};
use kcv_core::error::CoreError;
use kcv_core::types::DbId;
use kcv_core::validation::trim_or_empty;
use kcv_db::models::customer::{CreateCustomer, Customer, CustomerWithStats, NewCustomer};
use kcv_db::repositories::{BookingRepo, CustomerRepo};
use kcv_db::DbPool;

use crate::error::{AppError, AppResult};

pub(crate) fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Customer",
        id,
    })
}

fn prepare(input: &CreateCustomer) -> Result<NewCustomer, CoreError> {
    validate_customer(&input.first_name, &input.last_name, &input.email)?;
    Ok(NewCustomer {
        first_name: input.first_name.trim().to_string(),
        last_name: input.last_name.trim().to_string(),
        email: normalize_email(&input.email),
        phone: trim_or_empty(input.phone.as_deref()),
        company_name: trim_or_empty(input.company_name.as_deref()),
        address: trim_or_empty(input.address.as_deref()),
        postal_code: trim_or_empty(input.postal_code.as_deref()),
        city: trim_or_empty(input.city.as_deref()),
    })
}

/// Fail with a conflict if `email` belongs to a customer other than `own_id`.
async fn ensure_email_free(pool: &DbPool, email: &str, own_id: Option<DbId>) -> AppResult<()> {
    match CustomerRepo::find_by_email(pool, email).await? {
        Some(existing) if Some(existing.id) != own_id => {
            Err(AppError::Core(duplicate_email_error(email, existing.id)))
        }
        _ => Ok(()),
    }
}

pub async fn list(pool: &DbPool) -> AppResult<Vec<CustomerWithStats>> {
    Ok(CustomerRepo::list_with_stats(pool).await?)
}

pub async fn get(pool: &DbPool, id: DbId) -> AppResult<CustomerWithStats> {
    CustomerRepo::find_with_stats(pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

pub async fn get_by_email(pool: &DbPool, email: &str) -> AppResult<CustomerWithStats> {
    let email = normalize_email(email);
    CustomerRepo::find_with_stats_by_email(pool, &email)
        .await?
        .ok_or(AppError::Core(CoreError::NotFoundBy {
            entity: "Customer",
            key: "email",
            value: email,
        }))
}

pub async fn create(pool: &DbPool, input: &CreateCustomer) -> AppResult<Customer> {
    let fields = prepare(input)?;
    ensure_email_free(pool, &fields.email, None).await?;
    let customer = CustomerRepo::create(pool, &fields).await?;
    tracing::info!(customer_id = customer.id, "Customer created");
    Ok(customer)
}

/// Replace all writable fields. Keeping one's own email is allowed.
pub async fn update(pool: &DbPool, id: DbId, input: &CreateCustomer) -> AppResult<Customer> {
    let fields = prepare(input)?;
    if !CustomerRepo::exists(pool, id).await? {
        return Err(not_found(id));
    }
    ensure_email_free(pool, &fields.email, Some(id)).await?;
    let customer = CustomerRepo::update(pool, id, &fields)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(customer_id = id, "Customer updated");
    Ok(customer)
}

/// Delete a customer without Pending or Confirmed bookings.
///
/// Past bookings and their contracts are removed with the customer.
pub async fn delete(pool: &DbPool, id: DbId) -> AppResult<()> {
    if !CustomerRepo::exists(pool, id).await? {
        return Err(not_found(id));
    }
    let active = BookingRepo::count_active_by_customer(pool, id).await?;
    if active > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Customer {id} has {active} active booking(s) and cannot be deleted."
        ))));
    }
    CustomerRepo::delete(pool, id).await?;
    tracing::info!(customer_id = id, "Customer deleted");
    Ok(())
}
