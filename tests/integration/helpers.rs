//! Shared helpers for the HTTP integration tests.
//!
//! Every `TestApp` owns a fresh in-memory store set, so tests never share
//! state and need no database.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::{DateTime, Days, Duration, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use courtside_api::AppState;
use courtside_auth::session::LogAlertSink;
use courtside_core::config::AppConfig;
use courtside_database::StoreSet;
use courtside_database::store::UserStore;
use courtside_entity::user::{CreateUser, UserRole};
use courtside_service::{MockGateway, ServiceRegistry};

pub const PASSWORD: &str = "correct-horse-battery";

/// Test application context
pub struct TestApp {
    pub router: Router,
    pub services: ServiceRegistry,
    pub gateway: Arc<MockGateway>,
    password_hash: String,
}

/// A logged-in account.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub slug: String,
    pub email: String,
    pub token: String,
    /// `name=value` pair from `Set-Cookie`, when the role refreshes.
    pub refresh_cookie: Option<String>,
}

#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub set_cookie: Option<String>,
}

impl TestResponse {
    /// The `data` payload of a success envelope.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// The machine code of an error envelope.
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }

    /// `name=value` of the refresh cookie that was set, if any.
    pub fn cookie_pair(&self) -> Option<String> {
        self.set_cookie
            .as_deref()
            .and_then(|c| c.split(';').next())
            .map(str::to_string)
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.jwt_secret = "integration-test-secret-with-enough-entropy".into();
    config.worker.enabled = false;
    config
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: AppConfig) -> Self {
        let gateway = Arc::new(MockGateway::new(config.payments.mock_decline));
        let services = ServiceRegistry::build(
            &config,
            StoreSet::in_memory(),
            gateway.clone(),
            Arc::new(LogAlertSink),
        );
        let password_hash = services
            .password_hasher
            .hash_password(PASSWORD)
            .expect("hash test password");
        let router = courtside_api::build_router(AppState::new(services.clone()));

        Self {
            router,
            services,
            gateway,
            password_hash,
        }
    }

    /// Send a request; `auth` is a bearer token, `cookie` a raw Cookie header.
    pub async fn send(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        auth: Option<&str>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header("x-forwarded-for", "198.51.100.7");
        if let Some(token) = auth {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            body,
            set_cookie,
        }
    }

    pub async fn get(&self, path: &str, token: &str) -> TestResponse {
        self.send("GET", path, None, Some(token), None).await
    }

    pub async fn post(&self, path: &str, body: Value, token: &str) -> TestResponse {
        self.send("POST", path, Some(body), Some(token), None).await
    }

    pub async fn post_empty(&self, path: &str, token: &str) -> TestResponse {
        self.send("POST", path, None, Some(token), None).await
    }

    pub async fn put(&self, path: &str, body: Value, token: &str) -> TestResponse {
        self.send("PUT", path, Some(body), Some(token), None).await
    }

    pub async fn delete(&self, path: &str, token: &str) -> TestResponse {
        self.send("DELETE", path, None, Some(token), None).await
    }

    pub async fn login(&self, email: &str, device_id: &str) -> TestResponse {
        self.send(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": email, "password": PASSWORD, "device_id": device_id })),
            None,
            None,
        )
        .await
    }

    /// Insert a user with `role` straight into the store and log them in.
    pub async fn user(&self, role: UserRole) -> TestUser {
        let tag = Uuid::new_v4().simple().to_string();
        let email = format!("{role}-{tag}@courtside.test");
        let user = self
            .services
            .stores
            .users
            .create(&CreateUser {
                slug: format!("{role}-{tag}"),
                email: email.clone(),
                password_hash: self.password_hash.clone(),
                full_name: format!("Test {role}"),
                phone: None,
                role,
            })
            .await
            .unwrap();

        let login = self.login(&email, "test-device").await;
        assert_eq!(login.status, StatusCode::OK, "login failed: {:?}", login.body);

        TestUser {
            id: user.id,
            slug: user.slug,
            email,
            token: login.data()["access_token"].as_str().unwrap().to_string(),
            refresh_cookie: login.cookie_pair(),
        }
    }

    /// A pista created through the API by `staff`.
    pub async fn pista(&self, staff: &TestUser, base_price_cents: i64) -> Value {
        let resp = self
            .post(
                "/api/pistas",
                json!({
                    "name": "Central",
                    "court_type": "padel",
                    "surface": "glass",
                    "location_info": null,
                    "base_price_cents": base_price_cents,
                }),
                &staff.token,
            )
            .await;
        assert_eq!(resp.status, StatusCode::CREATED, "{:?}", resp.body);
        resp.data().clone()
    }
}

/// `days` from today at `hour:00` UTC; inside default opening hours.
pub fn day_at(days: u64, hour: u32) -> DateTime<Utc> {
    (Utc::now().date_naive() + Days::new(days))
        .and_hms_opt(hour, 0, 0)
        .unwrap()
        .and_utc()
}

pub fn plus_minutes(t: DateTime<Utc>, minutes: i64) -> DateTime<Utc> {
    t + Duration::minutes(minutes)
}
