#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use acelab_domain::GoogleConfig;
use acelab_infra::database::DbManager;
use acelab_infra::http::HttpClient;
use tempfile::TempDir;

pub const TEST_DB_KEY: &str = "test_key_64_chars_long_aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

/// Temporary migrated database that keeps its directory alive for the
/// duration of a test.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    _temp_dir: TempDir,
}

impl TestDatabase {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let db_path = temp_dir.path().join("acelab-test.db");

        let manager =
            DbManager::new(&db_path, 4, Some(TEST_DB_KEY)).expect("db manager should be created");
        manager.run_migrations().expect("schema migrations should apply");

        Self { manager: Arc::new(manager), _temp_dir: temp_dir }
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

/// Google settings with every endpoint pointed at `base_url`.
pub fn google_config(base_url: &str) -> GoogleConfig {
    GoogleConfig::new("client-123", "client-secret", "http://localhost:8080/api/google/callback")
        .with_base_url(base_url)
}

/// HTTP client with fast backoff for retry tests.
pub fn http_client() -> HttpClient {
    HttpClient::builder()
        .timeout(Duration::from_secs(5))
        .base_backoff(Duration::from_millis(5))
        .build()
        .expect("http client should build")
}
