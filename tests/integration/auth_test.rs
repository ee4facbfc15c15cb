//! Integration tests for registration, login, and refresh-session handling.

mod helpers;

use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use serde_json::json;
use tracing::Level;
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use courtside_entity::user::UserRole;
use helpers::{PASSWORD, TestApp};

#[tokio::test]
async fn register_creates_a_client_without_leaking_the_hash() {
    let app = TestApp::new().await;

    let resp = app
        .send(
            "POST",
            "/api/auth/register",
            Some(json!({
                "email": "Ana.Lopez@Example.com",
                "password": PASSWORD,
                "full_name": "Ana Lopez",
                "phone": "+34 600 000 000",
            })),
            None,
            None,
        )
        .await;

    assert_eq!(resp.status, StatusCode::CREATED);
    let user = resp.data();
    assert_eq!(user["email"], "ana.lopez@example.com");
    assert_eq!(user["role"], "client");
    assert!(user["slug"].as_str().unwrap().starts_with("ana-lopez-"));
    assert!(user.get("password_hash").is_none());
}

#[tokio::test]
async fn register_rejects_duplicates_and_weak_input() {
    let app = TestApp::new().await;
    let body = json!({
        "email": "dup@example.com",
        "password": PASSWORD,
        "full_name": "First",
    });
    let first = app.send("POST", "/api/auth/register", Some(body.clone()), None, None).await;
    assert_eq!(first.status, StatusCode::CREATED);

    let dup = app.send("POST", "/api/auth/register", Some(body), None, None).await;
    assert_eq!(dup.status, StatusCode::CONFLICT);
    assert_eq!(dup.error_code(), "EMAIL_TAKEN");

    let short = app
        .send(
            "POST",
            "/api/auth/register",
            Some(json!({ "email": "short@example.com", "password": "abc", "full_name": "Short" })),
            None,
            None,
        )
        .await;
    assert_eq!(short.status, StatusCode::BAD_REQUEST);

    let bad_email = app
        .send(
            "POST",
            "/api/auth/register",
            Some(json!({ "email": "nope", "password": PASSWORD, "full_name": "Nope" })),
            None,
            None,
        )
        .await;
    assert_eq!(bad_email.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_email.error_code(), "VALIDATION");
}

#[tokio::test]
async fn login_sets_a_strict_http_only_refresh_cookie() {
    let app = TestApp::new().await;
    let client = app.user(UserRole::Client).await;

    let resp = app.login(&client.email, "laptop").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.data()["token_type"], "Bearer");
    assert_eq!(resp.data()["device_id"], "laptop");
    assert!(resp.data()["refresh_expires_at"].is_string());
    assert!(resp.data().get("refresh_token").is_none());

    let cookie = resp.set_cookie.unwrap();
    assert!(cookie.starts_with("refresh_token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Strict"));
    assert!(cookie.contains("Path=/api/auth"));
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = TestApp::new().await;
    let client = app.user(UserRole::Client).await;

    let resp = app
        .send(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": client.email, "password": "not-the-password" })),
            None,
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admins_get_no_refresh_session() {
    let app = TestApp::new().await;
    let admin = app.user(UserRole::Admin).await;

    let resp = app.login(&admin.email, "console").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.data()["refresh_expires_at"].is_null());
    // Any stale cookie is cleared instead.
    assert_eq!(resp.cookie_pair().as_deref(), Some("refresh_token="));
}

#[tokio::test]
async fn rotation_detects_reuse_and_kills_the_family() {
    let app = TestApp::new().await;
    let client = app.user(UserRole::Client).await;
    let t1 = client.refresh_cookie.clone().unwrap();

    let rotated = app.send("POST", "/api/auth/refresh", None, None, Some(&t1)).await;
    assert_eq!(rotated.status, StatusCode::OK);
    let t2 = rotated.cookie_pair().unwrap();
    assert_ne!(t1, t2);
    let new_access = rotated.data()["access_token"].as_str().unwrap().to_string();
    assert_eq!(app.get("/api/auth/me", &new_access).await.status, StatusCode::OK);

    // Replaying the old token is reuse: rejected, and the cookie is cleared.
    let replay = app.send("POST", "/api/auth/refresh", None, None, Some(&t1)).await;
    assert_eq!(replay.status, StatusCode::UNAUTHORIZED);
    assert_eq!(replay.error_code(), "SESSION_INVALID");
    assert_eq!(replay.cookie_pair().as_deref(), Some("refresh_token="));

    // The legitimate successor died with the family.
    let after = app.send("POST", "/api/auth/refresh", None, None, Some(&t2)).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_without_cookie_is_rejected() {
    let app = TestApp::new().await;
    let resp = app.send("POST", "/api/auth/refresh", None, None, None).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.error_code(), "SESSION_INVALID");
}

#[tokio::test]
async fn logout_all_invalidates_refresh_and_stale_access_tokens() {
    let app = TestApp::new().await;
    let client = app.user(UserRole::Client).await;
    let phone = app.login(&client.email, "phone").await;
    let phone_cookie = phone.cookie_pair().unwrap();

    let sessions = app.get("/api/auth/sessions", &client.token).await;
    assert_eq!(sessions.status, StatusCode::OK);
    let list = sessions.data().as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list.iter().filter(|s| s["current"] == true).count(), 1);

    let out = app.post_empty("/api/auth/logout-all", &client.token).await;
    assert_eq!(out.status, StatusCode::OK);
    assert_eq!(out.data()["revoked_sessions"], 2);

    assert_eq!(
        app.get("/api/auth/me", &client.token).await.status,
        StatusCode::UNAUTHORIZED
    );
    let refresh = app
        .send("POST", "/api/auth/refresh", None, None, Some(&phone_cookie))
        .await;
    assert_eq!(refresh.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_ends_only_the_current_device() {
    let app = TestApp::new().await;
    let client = app.user(UserRole::Client).await;
    let tablet = app.login(&client.email, "tablet").await;
    let tablet_cookie = tablet.cookie_pair().unwrap();

    let out = app.post_empty("/api/auth/logout", &client.token).await;
    assert_eq!(out.status, StatusCode::OK);
    assert_eq!(out.cookie_pair().as_deref(), Some("refresh_token="));

    let dead = app
        .send("POST", "/api/auth/refresh", None, None, client.refresh_cookie.as_deref())
        .await;
    assert_eq!(dead.status, StatusCode::UNAUTHORIZED);

    let alive = app
        .send("POST", "/api/auth/refresh", None, None, Some(&tablet_cookie))
        .await;
    assert_eq!(alive.status, StatusCode::OK);
}

#[tokio::test]
async fn profile_update_is_visible_on_me() {
    let app = TestApp::new().await;
    let client = app.user(UserRole::Client).await;

    let updated = app
        .put(
            "/api/profile/me",
            json!({ "full_name": "  Renamed Player ", "phone": "+34 600 000 000" }),
            &client.token,
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.data()["full_name"], "Renamed Player");

    let me = app.get("/api/profile/me", &client.token).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.data()["phone"], "+34 600 000 000");

    let blank = app
        .put("/api/profile/me", json!({ "full_name": "" }), &client.token)
        .await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn password_change_revokes_sessions_and_swaps_credentials() {
    let app = TestApp::new().await;
    let client = app.user(UserRole::Client).await;
    let old_cookie = client.refresh_cookie.clone().unwrap();

    let wrong = app
        .post(
            "/api/profile/change-password",
            json!({ "current_password": "not-my-password", "new_password": "fresh-password-77" }),
            &client.token,
        )
        .await;
    assert_eq!(wrong.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.get("/api/auth/me", &client.token).await.status, StatusCode::OK);

    let changed = app
        .post(
            "/api/profile/change-password",
            json!({ "current_password": PASSWORD, "new_password": "fresh-password-77" }),
            &client.token,
        )
        .await;
    assert_eq!(changed.status, StatusCode::OK);
    assert_eq!(changed.data()["revoked_sessions"], 1);
    assert_eq!(changed.cookie_pair().as_deref(), Some("refresh_token="));

    let stale_refresh = app
        .send("POST", "/api/auth/refresh", None, None, Some(&old_cookie))
        .await;
    assert_eq!(stale_refresh.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        app.get("/api/auth/me", &client.token).await.status,
        StatusCode::UNAUTHORIZED
    );

    let old_login = app.login(&client.email, "laptop").await;
    assert_eq!(old_login.status, StatusCode::UNAUTHORIZED);
    let new_login = app
        .send(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": client.email, "password": "fresh-password-77" })),
            None,
            None,
        )
        .await;
    assert_eq!(new_login.status, StatusCode::OK);
}

#[tokio::test]
async fn missing_bearer_token_is_unauthorized() {
    let app = TestApp::new().await;
    let resp = app.send("GET", "/api/auth/me", None, None, None).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.body["success"], false);
}

#[tokio::test]
async fn admin_user_management() {
    let app = TestApp::new().await;
    let admin = app.user(UserRole::Admin).await;
    let client = app.user(UserRole::Client).await;

    let denied = app.get("/api/users", &client.token).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let listed = app.get("/api/users?page=1&per_page=10", &admin.token).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.data()["total_items"], 2);

    let roles = app.get("/api/roles", &client.token).await;
    assert_eq!(roles.data().as_array().unwrap().len(), 5);

    // A role change logs the user out everywhere.
    let changed = app
        .put(
            &format!("/api/users/{}/role", client.id),
            json!({ "role": "monitor" }),
            &admin.token,
        )
        .await;
    assert_eq!(changed.status, StatusCode::OK);
    assert_eq!(changed.data()["role"], "monitor");
    assert_eq!(
        app.get("/api/auth/me", &client.token).await.status,
        StatusCode::UNAUTHORIZED
    );

    let deactivated = app
        .put(
            &format!("/api/users/{}/active", client.id),
            json!({ "is_active": false }),
            &admin.token,
        )
        .await;
    assert_eq!(deactivated.status, StatusCode::OK);
    assert_eq!(
        app.login(&client.email, "again").await.status,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn health_reports_memory_store() {
    let app = TestApp::new().await;
    let resp = app.send("GET", "/api/health", None, None, None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.data()["store"], "memory");
}

/// Records every event's level, message and `reason` field.
#[derive(Clone, Default)]
struct RecordedEvents(Arc<Mutex<Vec<(Level, String, String)>>>);

#[derive(Default)]
struct EventFields {
    message: String,
    reason: String,
}

impl Visit for EventFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "reason" {
            self.reason = value.to_string();
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }
}

impl<S: tracing::Subscriber> Layer<S> for RecordedEvents {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = EventFields::default();
        event.record(&mut fields);
        self.0
            .lock()
            .unwrap()
            .push((*event.metadata().level(), fields.message, fields.reason));
    }
}

#[tokio::test]
async fn refresh_rejection_is_logged_with_its_reason() {
    let events = RecordedEvents::default();
    let _guard = tracing::subscriber::set_default(tracing_subscriber::registry().with(events.clone()));

    let app = TestApp::new().await;
    let client = app.user(UserRole::Client).await;
    let cookie = client.refresh_cookie.clone().unwrap();
    let out = app.post_empty("/api/auth/logout-all", &client.token).await;
    assert_eq!(out.status, StatusCode::OK);

    let resp = app.send("POST", "/api/auth/refresh", None, None, Some(&cookie)).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);

    let recorded = events.0.lock().unwrap();
    let rejection = recorded
        .iter()
        .find(|(_, message, _)| message == "Refresh rejected")
        .expect("refresh rejection was not logged");
    assert!(rejection.0 <= Level::INFO, "logged at {}", rejection.0);
    assert_eq!(rejection.2, "revoked");
}
