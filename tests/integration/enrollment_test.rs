//! Integration tests for classes and enrollment.

mod helpers;

use axum::http::StatusCode;
use serde_json::{Value, json};

use courtside_entity::user::UserRole;
use helpers::{TestApp, TestUser, day_at, plus_minutes};

async fn schedule(
    app: &TestApp,
    monitor: &TestUser,
    pista: &Value,
    hour: u32,
    capacity: i32,
    price_cents: i64,
) -> helpers::TestResponse {
    let start = day_at(3, hour);
    app.post(
        "/api/classes",
        json!({
            "pista_id": pista["id"],
            "title": "Padel Basics",
            "description": "Grip and footwork",
            "start_time": start,
            "end_time": plus_minutes(start, 60),
            "max_capacity": capacity,
            "price_cents": price_cents,
        }),
        &monitor.token,
    )
    .await
}

fn id_of(resp: &helpers::TestResponse) -> String {
    resp.data()["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn monitor_schedules_a_class() {
    let app = TestApp::new().await;
    let manager = app.user(UserRole::Manager).await;
    let monitor = app.user(UserRole::Monitor).await;
    let client = app.user(UserRole::Client).await;
    let pista = app.pista(&manager, 1000).await;

    let class = schedule(&app, &monitor, &pista, 17, 6, 900).await;
    assert_eq!(class.status, StatusCode::CREATED, "{:?}", class.body);
    assert_eq!(class.data()["status"], "OPEN");
    assert_eq!(class.data()["instructor_id"], monitor.id.to_string());
    assert!(class.data()["slug"].as_str().unwrap().starts_with("padel-basics"));

    let denied = schedule(&app, &client, &pista, 19, 6, 900).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let oversized = schedule(&app, &monitor, &pista, 19, 50, 900).await;
    assert_eq!(oversized.status, StatusCode::BAD_REQUEST);

    let listed = app.get("/api/classes", &client.token).await;
    assert_eq!(listed.data()["total_items"], 1);

    let detail = app
        .get(&format!("/api/classes/{}", id_of(&class)), &client.token)
        .await;
    assert_eq!(detail.data()["enrolled_count"], 0);
    assert_eq!(detail.data()["title"], "Padel Basics");
}

#[tokio::test]
async fn classes_and_bookings_share_the_pista() {
    let app = TestApp::new().await;
    let manager = app.user(UserRole::Manager).await;
    let monitor = app.user(UserRole::Monitor).await;
    let client = app.user(UserRole::Client).await;
    let pista = app.pista(&manager, 1000).await;

    let class = schedule(&app, &monitor, &pista, 10, 4, 0).await;
    assert_eq!(class.status, StatusCode::CREATED);

    let start = day_at(3, 10);
    let booking = app
        .post(
            "/api/bookings",
            json!({
                "pista_id": pista["id"],
                "start_time": start,
                "end_time": plus_minutes(start, 60),
            }),
            &client.token,
        )
        .await;
    assert_eq!(booking.status, StatusCode::CONFLICT);
    assert_eq!(booking.error_code(), "CLASS_CONFLICT");

    let later = day_at(3, 12);
    let booked = app
        .post(
            "/api/bookings",
            json!({
                "pista_id": pista["id"],
                "start_time": later,
                "end_time": plus_minutes(later, 60),
            }),
            &client.token,
        )
        .await;
    assert_eq!(booked.status, StatusCode::CREATED);

    let clash = schedule(&app, &monitor, &pista, 12, 4, 0).await;
    assert_eq!(clash.status, StatusCode::CONFLICT);
    assert_eq!(clash.error_code(), "BOOKING_CONFLICT");

    // A cancelled class frees its slot.
    let cancelled = app
        .post_empty(&format!("/api/classes/{}/cancel", id_of(&class)), &monitor.token)
        .await;
    assert_eq!(cancelled.data()["status"], "CANCELLED");
    let retry = app
        .post(
            "/api/bookings",
            json!({
                "pista_id": pista["id"],
                "start_time": start,
                "end_time": plus_minutes(start, 60),
            }),
            &client.token,
        )
        .await;
    assert_eq!(retry.status, StatusCode::CREATED);
}

#[tokio::test]
async fn only_the_instructor_or_a_manager_edits_a_class() {
    let app = TestApp::new().await;
    let manager = app.user(UserRole::Manager).await;
    let owner = app.user(UserRole::Monitor).await;
    let other = app.user(UserRole::Monitor).await;
    let pista = app.pista(&manager, 1000).await;

    let class = schedule(&app, &owner, &pista, 15, 4, 500).await;
    let path = format!("/api/classes/{}", id_of(&class));
    let start = day_at(3, 16);
    let body = json!({
        "title": "Padel Advanced",
        "description": null,
        "start_time": start,
        "end_time": plus_minutes(start, 90),
        "max_capacity": 8,
        "price_cents": 700,
    });

    let denied = app.put(&path, body.clone(), &other.token).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let moved = app.put(&path, body, &owner.token).await;
    assert_eq!(moved.status, StatusCode::OK, "{:?}", moved.body);
    assert_eq!(moved.data()["title"], "Padel Advanced");
    assert_eq!(moved.data()["max_capacity"], 8);

    let stopped = app
        .post_empty(&format!("{path}/cancel"), &manager.token)
        .await;
    assert_eq!(stopped.status, StatusCode::OK);
    let twice = app.post_empty(&format!("{path}/cancel"), &manager.token).await;
    assert_eq!(twice.error_code(), "INVALID_STATE");
}

#[tokio::test]
async fn capacity_is_never_exceeded() {
    let app = TestApp::new().await;
    let manager = app.user(UserRole::Manager).await;
    let monitor = app.user(UserRole::Monitor).await;
    let ana = app.user(UserRole::Client).await;
    let ben = app.user(UserRole::Client).await;
    let pista = app.pista(&manager, 1000).await;

    let class = schedule(&app, &monitor, &pista, 18, 1, 800).await;
    let enrollments = format!("/api/classes/{}/enrollments", id_of(&class));

    let seat = app.post_empty(&enrollments, &ana.token).await;
    assert_eq!(seat.status, StatusCode::CREATED, "{:?}", seat.body);
    assert_eq!(seat.data()["status"], "CONFIRMED");

    let dup = app.post_empty(&enrollments, &ana.token).await;
    assert_eq!(dup.status, StatusCode::CONFLICT);
    assert_eq!(dup.error_code(), "ALREADY_ENROLLED");

    let full = app.post_empty(&enrollments, &ben.token).await;
    assert_eq!(full.status, StatusCode::CONFLICT);
    assert_eq!(full.error_code(), "CLASS_FULL");

    let left = app.delete(&enrollments, &ana.token).await;
    assert_eq!(left.status, StatusCode::OK);
    let gone = app.delete(&enrollments, &ana.token).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);

    let taken = app.post_empty(&enrollments, &ben.token).await;
    assert_eq!(taken.status, StatusCode::CREATED);

    let detail = app
        .get(&format!("/api/classes/{}", id_of(&class)), &ana.token)
        .await;
    assert_eq!(detail.data()["enrolled_count"], 1);
}

#[tokio::test]
async fn staff_enroll_students_by_slug() {
    let app = TestApp::new().await;
    let manager = app.user(UserRole::Manager).await;
    let monitor = app.user(UserRole::Monitor).await;
    let student = app.user(UserRole::Client).await;
    let stranger = app.user(UserRole::Client).await;
    let pista = app.pista(&manager, 1000).await;

    let class = schedule(&app, &monitor, &pista, 11, 4, 0).await;
    let enrollments = format!("/api/classes/{}/enrollments", id_of(&class));

    let by_staff = app
        .post_empty(
            &format!("{enrollments}?user_slug={}", student.slug),
            &monitor.token,
        )
        .await;
    assert_eq!(by_staff.status, StatusCode::CREATED);
    assert_eq!(by_staff.data()["user_id"], student.id.to_string());

    let by_client = app
        .post_empty(
            &format!("{enrollments}?user_slug={}", student.slug),
            &stranger.token,
        )
        .await;
    assert_eq!(by_client.status, StatusCode::FORBIDDEN);

    let unknown = app
        .post_empty(&format!("{enrollments}?user_slug=nobody-here"), &monitor.token)
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);

    let roster = app.get(&enrollments, &monitor.token).await;
    assert_eq!(roster.data().as_array().unwrap().len(), 1);
    assert_eq!(app.get(&enrollments, &student.token).await.status, StatusCode::FORBIDDEN);

    let enrollment_id = id_of(&by_staff);
    let own = app
        .get(&format!("/api/enrollments/{enrollment_id}"), &student.token)
        .await;
    assert_eq!(own.status, StatusCode::OK);
    let peek = app
        .get(&format!("/api/enrollments/{enrollment_id}"), &stranger.token)
        .await;
    assert_eq!(peek.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn started_classes_refuse_enrollment() {
    let app = TestApp::new().await;
    let manager = app.user(UserRole::Manager).await;
    let monitor = app.user(UserRole::Monitor).await;
    let client = app.user(UserRole::Client).await;
    let pista = app.pista(&manager, 1000).await;

    let class = schedule(&app, &monitor, &pista, 9, 4, 0).await;
    let id = id_of(&class);
    let started = app
        .post_empty(&format!("/api/classes/{id}/start"), &monitor.token)
        .await;
    assert_eq!(started.data()["status"], "IN_PROGRESS");

    let late = app
        .post_empty(&format!("/api/classes/{id}/enrollments"), &client.token)
        .await;
    assert_eq!(late.status, StatusCode::CONFLICT);
    assert_eq!(late.error_code(), "CLASS_NOT_OPEN");
}

#[tokio::test]
async fn students_pay_for_their_seat() {
    let app = TestApp::new().await;
    let manager = app.user(UserRole::Manager).await;
    let monitor = app.user(UserRole::Monitor).await;
    let client = app.user(UserRole::Client).await;
    let other = app.user(UserRole::Client).await;
    let pista = app.pista(&manager, 1000).await;

    let class = schedule(&app, &monitor, &pista, 20, 4, 1250).await;
    let seat = app
        .post_empty(&format!("/api/classes/{}/enrollments", id_of(&class)), &client.token)
        .await;
    let pay = format!("/api/enrollments/{}/pay", id_of(&seat));

    assert_eq!(app.post_empty(&pay, &other.token).await.status, StatusCode::FORBIDDEN);

    let paid = app.post_empty(&pay, &client.token).await;
    assert_eq!(paid.status, StatusCode::CREATED, "{:?}", paid.body);
    assert_eq!(paid.data()["amount_cents"], 1250);
    assert_eq!(paid.data()["target"]["type"], "enrollment");
    assert_eq!(paid.data()["target"]["id"], id_of(&seat));
}
