//! Lifecycle writes racing an uncommitted status change on the same booking.
//!
//! Each test holds a transaction that moves the booking to Cancelled, starts
//! an engine operation that reads the old state, then commits. The guarded
//! write must not overwrite the cancellation.

mod common;

use std::time::Duration;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use common::{body_json, build_test_app, create_booking, create_customer, create_facility, post_empty};
use kcv_api::engine;
use kcv_api::error::AppError;
use kcv_core::error::CoreError;
use kcv_core::status::{BookingStatus, ContractStatus};
use kcv_db::repositories::{BookingRepo, ContractRepo};
use sqlx::{PgPool, Postgres, Transaction};

/// Returns `(booking_id, contract_id)` for a fresh Pending booking.
async fn pending_booking(pool: &PgPool) -> (i64, i64) {
    let customer = create_customer(pool, "Alice", "alice@example.com").await;
    let facility = create_facility(pool, "Hall A", 50, 1000).await;
    let response = create_booking(
        pool,
        customer["id"].as_i64().unwrap(),
        facility["id"].as_i64().unwrap(),
        10,
        12,
        10,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    (json["id"].as_i64().unwrap(), json["contract_id"].as_i64().unwrap())
}

/// Cancel the booking inside a transaction that the caller commits later.
async fn cancel_uncommitted(pool: &PgPool, booking_id: i64) -> Transaction<'static, Postgres> {
    let mut tx = pool.begin().await.unwrap();
    sqlx::query("UPDATE bookings SET status_id = $2, cancelled_at = NOW() WHERE id = $1")
        .bind(booking_id)
        .bind(BookingStatus::Cancelled.id())
        .execute(&mut *tx)
        .await
        .unwrap();
    tx
}

/// Give the spawned operation time to read and reach its blocked write.
async fn let_it_block() {
    tokio::time::sleep(Duration::from_millis(300)).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_confirm_does_not_revive_a_booking_cancelled_meanwhile(pool: PgPool) {
    let (booking_id, _) = pending_booking(&pool).await;

    let tx = cancel_uncommitted(&pool, booking_id).await;
    let confirm = tokio::spawn({
        let pool = pool.clone();
        async move { engine::booking::confirm(&pool, booking_id).await }
    });
    let_it_block().await;
    tx.commit().await.unwrap();

    assert_matches!(
        confirm.await.unwrap(),
        Err(AppError::Core(CoreError::Validation(msg))) if msg == "Cannot confirm a cancelled booking."
    );
    let stored = BookingRepo::find_by_id(&pool, booking_id).await.unwrap().unwrap();
    assert_eq!(stored.status, BookingStatus::Cancelled);
    assert!(stored.confirmed_at.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reschedule_does_not_move_a_booking_cancelled_meanwhile(pool: PgPool) {
    let (booking_id, _) = pending_booking(&pool).await;
    let input: kcv_db::models::booking::RescheduleBooking = serde_json::from_value(
        serde_json::json!({ "start_date": common::date(20), "end_date": common::date(21) }),
    )
    .unwrap();

    let tx = cancel_uncommitted(&pool, booking_id).await;
    let reschedule = tokio::spawn({
        let pool = pool.clone();
        async move { engine::booking::reschedule(&pool, booking_id, &input).await }
    });
    let_it_block().await;
    tx.commit().await.unwrap();

    assert_matches!(
        reschedule.await.unwrap(),
        Err(AppError::Core(CoreError::Validation(msg))) if msg == "Cannot reschedule a cancelled booking."
    );
    let stored = BookingRepo::find_by_id(&pool, booking_id).await.unwrap().unwrap();
    assert_eq!(stored.status, BookingStatus::Cancelled);
    assert_eq!(stored.end_date.date_naive().to_string(), common::date(12));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sign_fails_when_booking_is_cancelled_meanwhile(pool: PgPool) {
    let (booking_id, contract_id) = pending_booking(&pool).await;
    let response = post_empty(
        build_test_app(pool.clone()),
        &format!("/api/v1/bookings/{booking_id}/confirm"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let tx = cancel_uncommitted(&pool, booking_id).await;
    let sign = tokio::spawn({
        let pool = pool.clone();
        async move { engine::contract::mark_signed(&pool, contract_id, None).await }
    });
    let_it_block().await;
    tx.commit().await.unwrap();

    assert_matches!(
        sign.await.unwrap(),
        Err(AppError::Core(CoreError::Validation(msg))) if msg.contains("unconfirmed booking")
    );
    let stored = ContractRepo::find_by_id(&pool, contract_id).await.unwrap().unwrap();
    assert_eq!(stored.status, ContractStatus::Draft);
    assert!(stored.signed_at.is_none());
}
