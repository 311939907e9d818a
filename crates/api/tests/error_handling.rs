//! `AppError` to HTTP response mapping. Calls `IntoResponse` directly, no
//! server or database involved.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use kcv_api::error::AppError;
use kcv_core::error::CoreError;

async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn not_found_by_id_names_entity_and_id() {
    let (status, json) = error_to_response(AppError::Core(CoreError::NotFound {
        entity: "Facility",
        id: 42,
    }))
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Facility with id 42 not found");
}

#[tokio::test]
async fn not_found_by_key_names_the_lookup() {
    let (status, json) = error_to_response(AppError::Core(CoreError::NotFoundBy {
        entity: "Customer",
        key: "email",
        value: "nobody@example.com".into(),
    }))
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Customer with email nobody@example.com not found");
}

#[tokio::test]
async fn validation_error_returns_400_with_message() {
    let (status, json) = error_to_response(AppError::Core(CoreError::Validation(
        "End date must be after start date.".into(),
    )))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "End date must be after start date.");
}

#[tokio::test]
async fn conflict_error_returns_409() {
    let (status, json) = error_to_response(AppError::Core(CoreError::Conflict(
        "Facility is already booked for the selected dates.".into(),
    )))
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
}

#[tokio::test]
async fn bad_request_returns_400() {
    let (status, json) = error_to_response(AppError::BadRequest("malformed body".into())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "malformed body");
}

#[tokio::test]
async fn concurrent_update_returns_409() {
    let (status, json) =
        error_to_response(AppError::Core(CoreError::concurrent_update("Booking", 7))).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "Booking 7 was modified by another request. Please retry.");
}

#[tokio::test]
async fn unclassified_database_errors_are_sanitized() {
    for err in [
        sqlx::Error::PoolTimedOut,
        sqlx::Error::Protocol("password authentication failed for user kcv".into()),
    ] {
        let (status, json) = error_to_response(AppError::Database(err)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["code"], "INTERNAL_ERROR");
        assert_eq!(json["error"], "An internal error occurred");
    }
}

#[tokio::test]
async fn row_not_found_returns_404() {
    let (status, json) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}
