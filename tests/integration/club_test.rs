//! Integration tests for clubs, memberships and renewals.

mod helpers;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;

use courtside_entity::user::UserRole;
use helpers::{TestApp, TestUser};

async fn club(app: &TestApp, owner: &TestUser, max_members: i32, fee_cents: i64) -> String {
    let resp = app
        .post(
            "/api/clubs",
            json!({
                "name": "Smash Brothers",
                "description": "Weekly doubles",
                "max_members": max_members,
                "monthly_fee_cents": fee_cents,
            }),
            &owner.token,
        )
        .await;
    assert_eq!(resp.status, StatusCode::CREATED, "{:?}", resp.body);
    resp.data()["id"].as_str().unwrap().to_string()
}

async fn join(app: &TestApp, club_id: &str, member: &TestUser) -> helpers::TestResponse {
    app.post_empty(&format!("/api/clubs/{club_id}/members"), &member.token)
        .await
}

#[tokio::test]
async fn club_owners_run_their_own_clubs() {
    let app = TestApp::new().await;
    let owner = app.user(UserRole::Club).await;
    let rival = app.user(UserRole::Club).await;
    let client = app.user(UserRole::Client).await;

    let denied = app
        .post(
            "/api/clubs",
            json!({ "name": "Nope", "description": null, "max_members": 5, "monthly_fee_cents": 0 }),
            &client.token,
        )
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let id = club(&app, &owner, 10, 3000).await;
    let path = format!("/api/clubs/{id}");

    let fetched = app.get(&path, &client.token).await;
    assert!(fetched.data()["slug"].as_str().unwrap().starts_with("smash-brothers-"));
    assert_eq!(fetched.data()["member_count"], 0);

    let hijack = app
        .send("PATCH", &path, Some(json!({ "name": "Mine now" })), Some(&rival.token), None)
        .await;
    assert_eq!(hijack.status, StatusCode::FORBIDDEN);

    let renamed = app
        .send(
            "PATCH",
            &path,
            Some(json!({ "name": "Smash Sisters", "monthly_fee_cents": 3500 })),
            Some(&owner.token),
            None,
        )
        .await;
    assert_eq!(renamed.status, StatusCode::OK, "{:?}", renamed.body);
    assert_eq!(renamed.data()["name"], "Smash Sisters");
    assert_eq!(renamed.data()["monthly_fee_cents"], 3500);

    let listed = app.get("/api/clubs", &client.token).await;
    assert_eq!(listed.data()["total_items"], 1);

    let gone = app.delete(&path, &owner.token).await;
    assert_eq!(gone.status, StatusCode::OK);
    assert_eq!(app.get(&path, &client.token).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn membership_respects_capacity_and_uniqueness() {
    let app = TestApp::new().await;
    let owner = app.user(UserRole::Club).await;
    let ana = app.user(UserRole::Client).await;
    let ben = app.user(UserRole::Client).await;
    let id = club(&app, &owner, 1, 2000).await;

    let joined = join(&app, &id, &ana).await;
    assert_eq!(joined.status, StatusCode::CREATED, "{:?}", joined.body);
    assert_eq!(joined.data()["status"], "ACTIVE");
    assert_eq!(joined.data()["billing_status"], "UP_TO_DATE");
    assert!(joined.data()["next_billing_date"].is_string());

    let again = join(&app, &id, &ana).await;
    assert_eq!(again.status, StatusCode::CONFLICT);
    assert_eq!(again.error_code(), "ALREADY_MEMBER");

    let full = join(&app, &id, &ben).await;
    assert_eq!(full.status, StatusCode::CONFLICT);
    assert_eq!(full.error_code(), "CLUB_FULL");

    // Staff cannot join as members.
    assert_eq!(join(&app, &id, &owner).await.status, StatusCode::FORBIDDEN);

    let members = app
        .get(&format!("/api/clubs/{id}/members"), &owner.token)
        .await;
    assert_eq!(members.data().as_array().unwrap().len(), 1);
    assert_eq!(
        app.get(&format!("/api/clubs/{id}/members"), &ana.token).await.status,
        StatusCode::FORBIDDEN
    );

    let blocked = app.delete(&format!("/api/clubs/{id}"), &owner.token).await;
    assert_eq!(blocked.status, StatusCode::CONFLICT);
    assert_eq!(blocked.error_code(), "CLUB_HAS_MEMBERS");
}

#[tokio::test]
async fn owners_add_clients_by_slug() {
    let app = TestApp::new().await;
    let owner = app.user(UserRole::Club).await;
    let monitor = app.user(UserRole::Monitor).await;
    let client = app.user(UserRole::Client).await;
    let id = club(&app, &owner, 5, 0).await;
    let members = format!("/api/clubs/{id}/members");

    let added = app
        .post_empty(&format!("{members}?user_slug={}", client.slug), &owner.token)
        .await;
    assert_eq!(added.status, StatusCode::CREATED);
    assert_eq!(added.data()["user_id"], client.id.to_string());

    let not_a_client = app
        .post_empty(&format!("{members}?user_slug={}", monitor.slug), &owner.token)
        .await;
    assert_eq!(not_a_client.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn membership_state_transitions() {
    let app = TestApp::new().await;
    let owner = app.user(UserRole::Club).await;
    let ana = app.user(UserRole::Client).await;
    let ben = app.user(UserRole::Client).await;
    let id = club(&app, &owner, 1, 2000).await;

    let membership = join(&app, &id, &ana).await;
    let m = format!(
        "/api/memberships/{}",
        membership.data()["id"].as_str().unwrap()
    );

    assert_eq!(app.get(&m, &ana.token).await.status, StatusCode::OK);
    assert_eq!(app.get(&m, &ben.token).await.status, StatusCode::FORBIDDEN);

    let suspended = app.post_empty(&format!("{m}/suspend"), &owner.token).await;
    assert_eq!(suspended.data()["status"], "SUSPENDED");
    let twice = app.post_empty(&format!("{m}/suspend"), &owner.token).await;
    assert_eq!(twice.error_code(), "INVALID_STATE");

    // The suspended seat is free, so the club fills up again.
    assert_eq!(join(&app, &id, &ben).await.status, StatusCode::CREATED);
    let reactivate = app.post_empty(&format!("{m}/activate"), &owner.token).await;
    assert_eq!(reactivate.status, StatusCode::CONFLICT);
    assert_eq!(reactivate.error_code(), "CLUB_FULL");

    let billing = app
        .put(
            &format!("{m}/billing"),
            json!({ "next_billing_date": Utc::now() + Duration::days(10) }),
            &owner.token,
        )
        .await;
    assert_eq!(billing.error_code(), "INVALID_STATE");

    let cancelled = app.post_empty(&format!("{m}/cancel"), &ana.token).await;
    assert_eq!(cancelled.status, StatusCode::OK);
    assert_eq!(cancelled.data()["status"], "CANCELLED");
    assert!(cancelled.data()["end_date"].is_string());
    let again = app.post_empty(&format!("{m}/cancel"), &ana.token).await;
    assert_eq!(again.error_code(), "INVALID_STATE");
}

#[tokio::test]
async fn renewal_charges_the_monthly_fee() {
    let app = TestApp::new().await;
    let owner = app.user(UserRole::Club).await;
    let member = app.user(UserRole::Client).await;
    let id = club(&app, &owner, 10, 2500).await;

    let membership = join(&app, &id, &member).await;
    let m = format!(
        "/api/memberships/{}",
        membership.data()["id"].as_str().unwrap()
    );
    let target = Utc::now() + Duration::days(3);

    let moved = app
        .put(
            &format!("{m}/billing"),
            json!({ "next_billing_date": target }),
            &owner.token,
        )
        .await;
    assert_eq!(moved.status, StatusCode::OK, "{:?}", moved.body);

    let renewed = app.post_empty(&format!("{m}/renew"), &member.token).await;
    assert_eq!(renewed.status, StatusCode::OK, "{:?}", renewed.body);
    assert_eq!(renewed.data()["billing_status"], "UP_TO_DATE");
    assert!(renewed.data()["last_payment_id"].is_string());

    let payments = app.get("/api/payments/mine", &member.token).await;
    assert_eq!(payments.data()["total_items"], 1);
    assert_eq!(payments.data()["items"][0]["amount_cents"], 2500);
    assert_eq!(payments.data()["items"][0]["target"]["type"], "membership");

    app.gateway.set_decline(true);
    let declined = app.post_empty(&format!("{m}/renew"), &member.token).await;
    assert_eq!(declined.status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(declined.error_code(), "PAYMENT_DECLINED");

    let after = app.get(&m, &member.token).await;
    assert_eq!(after.data()["billing_status"], "PAST_DUE");
    assert_eq!(after.data()["status"], "ACTIVE");
}
