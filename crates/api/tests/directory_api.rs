//! HTTP-level integration tests for the facility and customer directories.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_booking, create_customer, create_facility, delete, get,
    patch_json, post_json, put_json,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Facilities
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_facility_defaults_to_active(pool: PgPool) {
    let json = create_facility(&pool, "  Hall A  ", 50, 1000).await;
    assert_eq!(json["name"], "Hall A");
    assert_eq!(json["is_active"], true);
    assert_eq!(json["description"], "");
    assert_eq!(json["price_per_day"].as_f64(), Some(1000.0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_facility_rejects_invalid_fields(pool: PgPool) {
    let base = serde_json::json!({
        "name": "Hall",
        "address": "Storgatan 1",
        "postal_code": "111 22",
        "city": "Stockholm",
        "max_capacity": 10,
        "price_per_day": 100,
    });

    for (field, value, message) in [
        ("name", serde_json::json!("  "), "Facility name is required."),
        ("max_capacity", serde_json::json!(0), "Max capacity must be greater than zero."),
        ("price_per_day", serde_json::json!(-1), "Price per day cannot be negative."),
        (
            "price_per_day",
            serde_json::json!(100_000_000_000_i64),
            "Price per day cannot exceed 9999999999.99.",
        ),
    ] {
        let mut body = base.clone();
        body[field] = value;
        let response = post_json(build_test_app(pool.clone()), "/api/v1/facilities", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "field {field}");
        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["error"], message);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deactivated_facility_is_hidden_from_active_list(pool: PgPool) {
    let a = create_facility(&pool, "Hall A", 50, 1000).await;
    create_facility(&pool, "Hall B", 20, 500).await;
    let id = a["id"].as_i64().unwrap();

    let response = patch_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/facilities/{id}/active"),
        serde_json::json!({ "is_active": false }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["is_active"], false);

    let active = body_json(get(build_test_app(pool.clone()), "/api/v1/facilities/active").await).await;
    let names: Vec<&str> = active
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Hall B"]);

    let all = body_json(get(build_test_app(pool), "/api/v1/facilities").await).await;
    assert_eq!(all.as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_facility_replaces_fields(pool: PgPool) {
    let facility = create_facility(&pool, "Hall A", 50, 1000).await;
    let id = facility["id"].as_i64().unwrap();

    let response = put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/facilities/{id}"),
        serde_json::json!({
            "name": "Hall A2",
            "description": "Renovated",
            "address": "Storgatan 2",
            "postal_code": "111 23",
            "city": "Uppsala",
            "max_capacity": 80,
            "price_per_day": 1500.5,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Hall A2");
    assert_eq!(json["city"], "Uppsala");
    assert_eq!(json["max_capacity"], 80);
    assert_eq!(json["price_per_day"].as_f64(), Some(1500.5));

    let missing = put_json(
        build_test_app(pool),
        "/api/v1/facilities/999999",
        serde_json::json!({
            "name": "X", "address": "Y", "postal_code": "Z", "city": "W",
            "max_capacity": 1, "price_per_day": 1,
        }),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_facility(pool: PgPool) {
    let unused = create_facility(&pool, "Unused", 10, 100).await;
    let used = create_facility(&pool, "Used", 10, 100).await;
    let customer = create_customer(&pool, "Alice", "alice@example.com").await;
    let response = create_booking(
        &pool,
        customer["id"].as_i64().unwrap(),
        used["id"].as_i64().unwrap(),
        10,
        11,
        5,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let unused_id = unused["id"].as_i64().unwrap();
    let response = delete(build_test_app(pool.clone()), &format!("/api/v1/facilities/{unused_id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = get(build_test_app(pool.clone()), &format!("/api/v1/facilities/{unused_id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let used_id = used["id"].as_i64().unwrap();
    let response = delete(build_test_app(pool), &format!("/api/v1/facilities/{used_id}")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Customers
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_customer_normalizes_email(pool: PgPool) {
    let json = create_customer(&pool, "Foo", "  Foo@Bar.com ").await;
    assert_eq!(json["email"], "foo@bar.com");
    assert_eq!(json["phone"], "");
    assert!(json["id"].is_number());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_differing_in_case_conflicts(pool: PgPool) {
    let first = create_customer(&pool, "Foo", "Foo@Bar.com").await;
    let first_id = first["id"].as_i64().unwrap();

    let response = post_json(
        build_test_app(pool),
        "/api/v1/customers",
        serde_json::json!({ "first_name": "Other", "email": "foo@bar.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
    assert_eq!(
        json["error"],
        format!("A customer with email 'foo@bar.com' already exists (id={first_id}).")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_customer_validation(pool: PgPool) {
    for (body, message) in [
        (
            serde_json::json!({ "first_name": " ", "last_name": "", "email": "a@b.se" }),
            "Customer name is required.",
        ),
        (
            serde_json::json!({ "first_name": "A", "email": "   " }),
            "Customer email is required.",
        ),
        (
            serde_json::json!({ "first_name": "A", "email": "not-an-email" }),
            "Invalid customer email address.",
        ),
    ] {
        let response = post_json(build_test_app(pool.clone()), "/api/v1/customers", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], message);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_customer_keeps_own_email_but_not_others(pool: PgPool) {
    let alice = create_customer(&pool, "Alice", "alice@example.com").await;
    create_customer(&pool, "Bob", "bob@example.com").await;
    let id = alice["id"].as_i64().unwrap();

    let response = put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/customers/{id}"),
        serde_json::json!({
            "first_name": "Alicia",
            "last_name": "Test",
            "email": "ALICE@example.com",
            "city": " Malmö ",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["first_name"], "Alicia");
    assert_eq!(json["city"], "Malmö");

    let response = put_json(
        build_test_app(pool),
        &format!("/api/v1/customers/{id}"),
        serde_json::json!({ "first_name": "Alicia", "email": "bob@example.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_customer_by_email_and_stats(pool: PgPool) {
    let alice = create_customer(&pool, "Alice", "alice@example.com").await;
    let facility = create_facility(&pool, "Hall A", 50, 1000).await;
    create_booking(
        &pool,
        alice["id"].as_i64().unwrap(),
        facility["id"].as_i64().unwrap(),
        10,
        12,
        5,
    )
    .await;

    let response = get(
        build_test_app(pool.clone()),
        "/api/v1/customers/by-email?email=Alice%40Example.com",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"], alice["id"]);
    assert_eq!(json["total_bookings"], 1);
    assert_eq!(json["active_bookings"], 1);

    let response = get(
        build_test_app(pool),
        "/api/v1/customers/by-email?email=nobody%40example.com",
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_customer_blocked_by_active_booking(pool: PgPool) {
    let alice = create_customer(&pool, "Alice", "alice@example.com").await;
    let facility = create_facility(&pool, "Hall A", 50, 1000).await;
    let booking = body_json(
        create_booking(
            &pool,
            alice["id"].as_i64().unwrap(),
            facility["id"].as_i64().unwrap(),
            10,
            12,
            5,
        )
        .await,
    )
    .await;
    let customer_id = alice["id"].as_i64().unwrap();
    let booking_id = booking["id"].as_i64().unwrap();

    let response = delete(build_test_app(pool.clone()), &format!("/api/v1/customers/{customer_id}")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = delete(build_test_app(pool.clone()), &format!("/api/v1/bookings/{booking_id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete(build_test_app(pool.clone()), &format!("/api/v1/customers/{customer_id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(build_test_app(pool), &format!("/api/v1/customers/{customer_id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
