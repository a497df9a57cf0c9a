#![allow(dead_code)]

use std::sync::Arc;

use acelab_api::{router, AppContext};
use acelab_core::GrantRepository;
use acelab_domain::{Config, DatabaseConfig, GoogleConfig, OAuthGrant, ServerConfig, UserId};
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::MockServer;

const TEST_KEY: &str = "test_key_64_chars_long_aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

pub const FRONTEND_URL: &str = "https://tutors.example.com";
pub const TUTOR: i64 = 42;
pub const TUTOR_EMAIL: &str = "tutor@example.com";
pub const MEET_LINK: &str = "https://meet.google.com/abc-defg-hij";
pub const EVENTS_PATH: &str = "/calendar/v3/calendars/primary/events";

/// Full application over a temporary database, with every Google endpoint
/// pointed at `google`.
pub struct TestApp {
    pub ctx: Arc<AppContext>,
    pub google: MockServer,
    router: Router,
    _temp_dir: TempDir,
}

/// Status, headers-of-interest and JSON body (Null when empty).
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: Value,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_state_secret(Some("state-signing-key")).await
    }

    pub async fn with_state_secret(state_secret: Option<&str>) -> Self {
        let google = MockServer::start().await;
        let temp_dir = TempDir::new().expect("failed to create temporary test directory");

        let mut google_config = GoogleConfig::new(
            "client-123",
            "client-secret",
            "http://localhost:8080/api/google/callback",
        )
        .with_base_url(&google.uri());
        google_config.state_secret = state_secret.map(str::to_string);
        google_config.request_timeout_secs = 5;

        let config = Config {
            database: DatabaseConfig {
                path: temp_dir.path().join("acelab.db").to_string_lossy().to_string(),
                pool_size: 4,
                encryption_key: Some(TEST_KEY.to_string()),
            },
            google: google_config,
            server: ServerConfig {
                bind_address: "127.0.0.1:0".to_string(),
                frontend_url: FRONTEND_URL.to_string(),
            },
        };

        let ctx = Arc::new(AppContext::new(config).expect("context should initialise"));
        let router = router(Arc::clone(&ctx));

        Self { ctx, google, router, _temp_dir: temp_dir }
    }

    /// Store a grant for `user` expiring `expires_in` from now.
    pub async fn connect(&self, user: i64, expires_in: Duration) {
        let grant = OAuthGrant::new(
            UserId(user),
            Some(TUTOR_EMAIL.to_string()),
            "ya29.stored".to_string(),
            Some("1//stored-refresh".to_string()),
            Utc::now() + expires_in,
        );
        self.ctx.grants.upsert_grant(grant).await.expect("grant should be stored");
    }

    pub async fn seed_lesson(&self, course_id: i64, tutor: i64, title: &str) -> i64 {
        self.ctx.lessons.insert_lesson(course_id, tutor, title).await.expect("lesson seeded")
    }

    pub async fn enroll(&self, course_id: i64, email: &str) {
        self.ctx.lessons.enroll_student(course_id, email).await.expect("student enrolled");
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        user: Option<i64>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header("x-user-id", user.to_string());
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request should build");

        let response = self.router.clone().oneshot(request).await.expect("router responds");
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body readable");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse { status, location, body }
    }

    pub async fn get(&self, uri: &str, user: Option<i64>) -> TestResponse {
        self.send(Method::GET, uri, user, None).await
    }

    pub async fn post(&self, uri: &str, user: Option<i64>, body: Option<Value>) -> TestResponse {
        self.send(Method::POST, uri, user, body).await
    }

    pub async fn delete(&self, uri: &str, user: Option<i64>) -> TestResponse {
        self.send(Method::DELETE, uri, user, None).await
    }
}
