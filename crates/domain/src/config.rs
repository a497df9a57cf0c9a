//! Configuration management

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_APPLICATION_NAME, GOOGLE_AUTHORIZATION_ENDPOINT, GOOGLE_CALENDAR_API_BASE,
    GOOGLE_SCOPES, GOOGLE_TOKEN_ENDPOINT, GOOGLE_USERINFO_ENDPOINT, PRIMARY_CALENDAR_ID,
};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub google: GoogleConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
    #[serde(skip_serializing)]
    pub encryption_key: Option<String>,
}

/// Google OAuth client and API configuration
///
/// Endpoints default to Google's production hosts and are overridable so
/// tests can point them at a mock server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    pub client_id: String,
    #[serde(skip_serializing, default)]
    pub client_secret: String,
    pub redirect_uri: String,
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
    #[serde(default = "default_application_name")]
    pub application_name: String,
    /// HMAC key for OAuth state tokens; plain base64 state when absent.
    #[serde(skip_serializing, default)]
    pub state_secret: Option<String>,
    #[serde(default = "default_authorization_endpoint")]
    pub authorization_endpoint: String,
    #[serde(default = "default_token_endpoint")]
    pub token_endpoint: String,
    #[serde(default = "default_userinfo_endpoint")]
    pub userinfo_endpoint: String,
    #[serde(default = "default_calendar_api_base")]
    pub calendar_api_base: String,
    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
    pub frontend_url: String,
}

impl GoogleConfig {
    /// Google defaults for the given client credentials.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            scopes: default_scopes(),
            application_name: default_application_name(),
            state_secret: None,
            authorization_endpoint: default_authorization_endpoint(),
            token_endpoint: default_token_endpoint(),
            userinfo_endpoint: default_userinfo_endpoint(),
            calendar_api_base: default_calendar_api_base(),
            calendar_id: default_calendar_id(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }

    /// Point every Google endpoint at `base_url` (test servers).
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        self.authorization_endpoint = format!("{base}/o/oauth2/v2/auth");
        self.token_endpoint = format!("{base}/token");
        self.userinfo_endpoint = format!("{base}/oauth2/v2/userinfo");
        self.calendar_api_base = format!("{base}/calendar/v3");
        self
    }
}

fn default_scopes() -> Vec<String> {
    GOOGLE_SCOPES.iter().map(|scope| (*scope).to_string()).collect()
}

fn default_application_name() -> String {
    DEFAULT_APPLICATION_NAME.to_string()
}

fn default_authorization_endpoint() -> String {
    GOOGLE_AUTHORIZATION_ENDPOINT.to_string()
}

fn default_token_endpoint() -> String {
    GOOGLE_TOKEN_ENDPOINT.to_string()
}

fn default_userinfo_endpoint() -> String {
    GOOGLE_USERINFO_ENDPOINT.to_string()
}

fn default_calendar_api_base() -> String {
    GOOGLE_CALENDAR_API_BASE.to_string()
}

fn default_calendar_id() -> String {
    PRIMARY_CALENDAR_ID.to_string()
}

const fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                path: "acelab.db".to_string(),
                pool_size: 8,
                encryption_key: None,
            },
            google: GoogleConfig::new(
                "",
                "",
                "http://localhost:8080/api/google/callback",
            ),
            server: ServerConfig::default(),
        }
    }
}
