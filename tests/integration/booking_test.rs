//! Integration tests for pista bookings and their payments.

mod helpers;

use axum::http::StatusCode;
use chrono::Duration;
use serde_json::{Value, json};

use courtside_entity::user::UserRole;
use helpers::{TestApp, TestUser, day_at, plus_minutes, test_config};

async fn book(app: &TestApp, who: &TestUser, pista: &Value, day: u64, hour: u32, minutes: i64) -> helpers::TestResponse {
    let start = day_at(day, hour);
    app.post(
        "/api/bookings",
        json!({
            "pista_id": pista["id"],
            "start_time": start,
            "end_time": plus_minutes(start, minutes),
            "notes": null,
        }),
        &who.token,
    )
    .await
}

#[tokio::test]
async fn price_snapshot_survives_a_price_change() {
    let app = TestApp::new().await;
    let manager = app.user(UserRole::Manager).await;
    let client = app.user(UserRole::Client).await;
    let pista = app.pista(&manager, 2000).await;

    let booking = book(&app, &client, &pista, 2, 10, 60).await;
    assert_eq!(booking.status, StatusCode::CREATED);
    assert_eq!(booking.data()["price_snapshot_cents"], 2000);
    assert_eq!(booking.data()["status"], "PENDING");
    assert_eq!(booking.data()["payment_status"], "UNPAID");

    let patched = app
        .send(
            "PATCH",
            &format!("/api/pistas/{}", pista["id"].as_str().unwrap()),
            Some(json!({ "base_price_cents": 3000 })),
            Some(&manager.token),
            None,
        )
        .await;
    assert_eq!(patched.status, StatusCode::OK);
    assert_eq!(patched.data()["base_price_cents"], 3000);

    let id = booking.data()["id"].as_str().unwrap();
    let fetched = app.get(&format!("/api/bookings/{id}"), &client.token).await;
    assert_eq!(fetched.data()["price_snapshot_cents"], 2000);

    // 90 minutes at the new hourly price.
    let later = book(&app, &client, &pista, 2, 14, 90).await;
    assert_eq!(later.data()["price_snapshot_cents"], 4500);
}

#[tokio::test]
async fn overlaps_conflict_until_cancelled() {
    let app = TestApp::new().await;
    let manager = app.user(UserRole::Manager).await;
    let ana = app.user(UserRole::Client).await;
    let ben = app.user(UserRole::Client).await;
    let pista = app.pista(&manager, 1500).await;

    let first = book(&app, &ana, &pista, 3, 10, 120).await;
    assert_eq!(first.status, StatusCode::CREATED);

    let clash = book(&app, &ben, &pista, 3, 11, 60).await;
    assert_eq!(clash.status, StatusCode::CONFLICT);
    assert_eq!(clash.error_code(), "BOOKING_CONFLICT");

    // Back-to-back is fine.
    let touching = book(&app, &ben, &pista, 3, 12, 60).await;
    assert_eq!(touching.status, StatusCode::CREATED);

    let id = first.data()["id"].as_str().unwrap();
    let cancelled = app
        .post_empty(&format!("/api/bookings/{id}/cancel"), &ana.token)
        .await;
    assert_eq!(cancelled.status, StatusCode::OK);
    assert_eq!(cancelled.data()["status"], "CANCELLED");

    let retry = book(&app, &ben, &pista, 3, 11, 60).await;
    assert_eq!(retry.status, StatusCode::CREATED);

    let again = app
        .post_empty(&format!("/api/bookings/{id}/cancel"), &ana.token)
        .await;
    assert_eq!(again.status, StatusCode::CONFLICT);
    assert_eq!(again.error_code(), "INVALID_STATE");
}

#[tokio::test]
async fn rescheduling_never_conflicts_with_itself() {
    let app = TestApp::new().await;
    let manager = app.user(UserRole::Manager).await;
    let client = app.user(UserRole::Client).await;
    let pista = app.pista(&manager, 1000).await;

    let booking = book(&app, &client, &pista, 4, 10, 60).await;
    let id = booking.data()["id"].as_str().unwrap();
    let start = day_at(4, 10) + Duration::minutes(30);

    let moved = app
        .put(
            &format!("/api/bookings/{id}"),
            json!({
                "start_time": start,
                "end_time": plus_minutes(start, 60),
                "notes": "bring balls",
            }),
            &client.token,
        )
        .await;
    assert_eq!(moved.status, StatusCode::OK, "{:?}", moved.body);
    assert_eq!(moved.data()["notes"], "bring balls");
}

#[tokio::test]
async fn scheduling_rules_are_enforced() {
    let app = TestApp::new().await;
    let manager = app.user(UserRole::Manager).await;
    let client = app.user(UserRole::Client).await;
    let pista = app.pista(&manager, 1000).await;

    let inverted = app
        .post(
            "/api/bookings",
            json!({
                "pista_id": pista["id"],
                "start_time": day_at(2, 12),
                "end_time": day_at(2, 11),
            }),
            &client.token,
        )
        .await;
    assert_eq!(inverted.status, StatusCode::BAD_REQUEST);
    assert_eq!(inverted.error_code(), "INVALID_INTERVAL");

    let too_early = book(&app, &client, &pista, 2, 7, 60).await;
    assert_eq!(too_early.status, StatusCode::BAD_REQUEST);

    let too_short = book(&app, &client, &pista, 2, 10, 30).await;
    assert_eq!(too_short.status, StatusCode::BAD_REQUEST);

    let past = app
        .post(
            "/api/bookings",
            json!({
                "pista_id": pista["id"],
                "start_time": day_at(0, 10) - Duration::days(2),
                "end_time": day_at(0, 11) - Duration::days(2),
            }),
            &client.token,
        )
        .await;
    assert_eq!(past.status, StatusCode::BAD_REQUEST);

    let id = pista["id"].as_str().unwrap();
    let off = app.delete(&format!("/api/pistas/{id}"), &manager.token).await;
    assert_eq!(off.data()["is_active"], false);
    let inactive = book(&app, &client, &pista, 2, 10, 60).await;
    assert_eq!(inactive.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bookings_are_private_to_owner_and_staff() {
    let app = TestApp::new().await;
    let manager = app.user(UserRole::Manager).await;
    let owner = app.user(UserRole::Client).await;
    let other = app.user(UserRole::Client).await;
    let pista = app.pista(&manager, 1000).await;

    let booking = book(&app, &owner, &pista, 2, 16, 60).await;
    let id = booking.data()["id"].as_str().unwrap();

    let peek = app.get(&format!("/api/bookings/{id}"), &other.token).await;
    assert_eq!(peek.status, StatusCode::FORBIDDEN);
    assert_eq!(
        peek.body["message"],
        "You do not have permission to perform this action"
    );

    assert_eq!(
        app.get(&format!("/api/bookings/{id}"), &manager.token).await.status,
        StatusCode::OK
    );
    assert_eq!(app.get("/api/bookings", &other.token).await.status, StatusCode::FORBIDDEN);

    let mine = app.get("/api/bookings/mine", &owner.token).await;
    assert_eq!(mine.data()["total_items"], 1);

    let confirmed = app
        .post_empty(&format!("/api/bookings/{id}/confirm"), &manager.token)
        .await;
    assert_eq!(confirmed.data()["status"], "CONFIRMED");

    let deleted = app.delete(&format!("/api/bookings/{id}"), &manager.token).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(
        app.get(&format!("/api/bookings/{id}"), &owner.token).await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn paying_confirms_and_refunding_is_one_shot() {
    let app = TestApp::new().await;
    let manager = app.user(UserRole::Manager).await;
    let client = app.user(UserRole::Client).await;
    let pista = app.pista(&manager, 2400).await;

    let booking = book(&app, &client, &pista, 5, 18, 60).await;
    let id = booking.data()["id"].as_str().unwrap();

    let paid = app.post_empty(&format!("/api/bookings/{id}/pay"), &client.token).await;
    assert_eq!(paid.status, StatusCode::CREATED);
    let payment = paid.data().clone();
    assert_eq!(payment["amount_cents"], 2400);
    assert_eq!(payment["status"], "COMPLETED");
    assert_eq!(payment["provider"], "MOCK");
    assert_eq!(payment["target"]["type"], "booking");
    assert!(payment["payment_intent_id"].as_str().unwrap().starts_with("pi_mock_"));

    let now = app.get(&format!("/api/bookings/{id}"), &client.token).await;
    assert_eq!(now.data()["status"], "CONFIRMED");
    assert_eq!(now.data()["payment_status"], "PAID");

    let twice = app.post_empty(&format!("/api/bookings/{id}/pay"), &client.token).await;
    assert_eq!(twice.status, StatusCode::CONFLICT);

    let mine = app.get("/api/payments/mine", &client.token).await;
    assert_eq!(mine.data()["total_items"], 1);

    let payment_id = payment["id"].as_str().unwrap();
    let by_client = app
        .post_empty(&format!("/api/payments/{payment_id}/refund"), &client.token)
        .await;
    assert_eq!(by_client.status, StatusCode::FORBIDDEN);

    let refunded = app
        .post_empty(&format!("/api/payments/{payment_id}/refund"), &manager.token)
        .await;
    assert_eq!(refunded.status, StatusCode::OK);
    assert_eq!(refunded.data()["status"], "REFUNDED");
    let after = app.get(&format!("/api/bookings/{id}"), &client.token).await;
    assert_eq!(after.data()["payment_status"], "REFUNDED");

    let again = app
        .post_empty(&format!("/api/payments/{payment_id}/refund"), &manager.token)
        .await;
    assert_eq!(again.status, StatusCode::CONFLICT);
    assert_eq!(again.error_code(), "ALREADY_REFUNDED");
}

#[tokio::test]
async fn declined_charge_leaves_the_booking_pending() {
    let mut config = test_config();
    config.payments.mock_decline = true;
    let app = TestApp::with_config(config).await;
    let manager = app.user(UserRole::Manager).await;
    let client = app.user(UserRole::Client).await;
    let pista = app.pista(&manager, 1800).await;

    let booking = book(&app, &client, &pista, 2, 20, 60).await;
    let id = booking.data()["id"].as_str().unwrap();

    let declined = app.post_empty(&format!("/api/bookings/{id}/pay"), &client.token).await;
    assert_eq!(declined.status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(declined.error_code(), "PAYMENT_DECLINED");

    let still = app.get(&format!("/api/bookings/{id}"), &client.token).await;
    assert_eq!(still.data()["status"], "PENDING");
    assert_eq!(still.data()["payment_status"], "UNPAID");

    // The attempt is on record.
    let all = app.get("/api/payments", &manager.token).await;
    assert_eq!(all.data()["items"][0]["status"], "FAILED");
}

#[tokio::test]
async fn sweep_completes_finished_confirmed_bookings() {
    let app = TestApp::new().await;
    let manager = app.user(UserRole::Manager).await;
    let client = app.user(UserRole::Client).await;
    let pista = app.pista(&manager, 1000).await;

    let paid = book(&app, &client, &pista, 2, 10, 60).await;
    let paid_id = paid.data()["id"].as_str().unwrap().to_string();
    app.post_empty(&format!("/api/bookings/{paid_id}/pay"), &client.token)
        .await;
    let unpaid = book(&app, &client, &pista, 2, 12, 60).await;
    let unpaid_id = unpaid.data()["id"].as_str().unwrap().to_string();

    let report = app
        .services
        .sweep
        .run(day_at(2, 0) + Duration::days(1))
        .await
        .unwrap();
    assert_eq!(report.bookings_completed, 1);
    assert_eq!(report.bookings_cancelled, 1);

    let done = app.get(&format!("/api/bookings/{paid_id}"), &client.token).await;
    assert_eq!(done.data()["status"], "COMPLETED");
    let dropped = app.get(&format!("/api/bookings/{unpaid_id}"), &client.token).await;
    assert_eq!(dropped.data()["status"], "CANCELLED");
}
