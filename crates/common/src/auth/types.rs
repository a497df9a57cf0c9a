//! OAuth 2.0 types and structures
//!
//! Token sets, token endpoint responses, and client configuration for the
//! server-side authorization code flow.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Lifetime assumed when the provider omits `expires_in`.
pub const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

/// OAuth 2.0 access and refresh tokens with metadata
///
/// `expires_at` is computed from `expires_in` at the moment the set is built,
/// so it reflects when the response was received.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,

    /// Google only issues a refresh token on first consent (or with
    /// `prompt=consent`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    pub token_type: String,

    /// Access token lifetime in seconds
    pub expires_in: i64,

    pub expires_at: DateTime<Utc>,

    /// Granted scopes (space-separated)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl TokenSet {
    /// Create a new `TokenSet` expiring `expires_in` seconds from now.
    #[must_use]
    pub fn new(
        access_token: String,
        refresh_token: Option<String>,
        expires_in: i64,
        scope: Option<String>,
    ) -> Self {
        Self::issued_at(Utc::now(), access_token, refresh_token, expires_in, scope)
    }

    /// Same as [`TokenSet::new`] with an explicit issue time.
    #[must_use]
    pub fn issued_at(
        now: DateTime<Utc>,
        access_token: String,
        refresh_token: Option<String>,
        expires_in: i64,
        scope: Option<String>,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in,
            expires_at: expiry_after(now, expires_in),
            scope,
        }
    }

    /// Whether `expires_at` is in the past.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// `now + expires_in`, saturating at chrono's maximum for absurd lifetimes.
fn expiry_after(now: DateTime<Utc>, expires_in: i64) -> DateTime<Utc> {
    TimeDelta::try_seconds(expires_in.max(0))
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSet")
            .field("access_token", &"***")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "***"))
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("expires_at", &self.expires_at)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Token endpoint response (RFC 6749 §5.1)
#[derive(Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: i64,
    #[serde(default)]
    pub scope: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

const fn default_expires_in() -> i64 {
    DEFAULT_EXPIRES_IN_SECS
}

impl From<TokenResponse> for TokenSet {
    fn from(response: TokenResponse) -> Self {
        let mut set = Self::new(
            response.access_token,
            response.refresh_token.filter(|token| !token.is_empty()),
            response.expires_in,
            response.scope,
        );
        set.token_type = response.token_type;
        set
    }
}

/// OAuth client configuration for a confidential (server-side) client
#[derive(Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub scopes: Vec<String>,
    /// Appended verbatim to the authorization URL (e.g. `access_type`).
    pub extra_authorize_params: Vec<(String, String)>,
}

impl OAuthConfig {
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        redirect_uri: impl Into<String>,
        authorization_endpoint: impl Into<String>,
        token_endpoint: impl Into<String>,
        scopes: Vec<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: None,
            redirect_uri: redirect_uri.into(),
            authorization_endpoint: authorization_endpoint.into(),
            token_endpoint: token_endpoint.into(),
            scopes,
            extra_authorize_params: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
        let secret = secret.into();
        self.client_secret = (!secret.is_empty()).then_some(secret);
        self
    }

    #[must_use]
    pub fn with_authorize_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_authorize_params.push((key.into(), value.into()));
        self
    }

    /// Get scopes as space-separated string
    #[must_use]
    pub fn scope_string(&self) -> String {
        self.scopes.join(" ")
    }
}

impl fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "***"))
            .field("redirect_uri", &self.redirect_uri)
            .field("authorization_endpoint", &self.authorization_endpoint)
            .field("token_endpoint", &self.token_endpoint)
            .field("scopes", &self.scopes)
            .finish_non_exhaustive()
    }
}

/// OAuth error response from authorization server
///
/// Standard OAuth 2.0 error response format (RFC 6749 §5.2).
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthError {
    pub error: String,
    pub error_description: Option<String>,
}

impl fmt::Display for OAuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_description {
            Some(desc) => write!(f, "{}: {}", self.error, desc),
            None => write!(f, "{}", self.error),
        }
    }
}

impl std::error::Error for OAuthError {}

#[cfg(test)]
mod tests {
    //! Unit tests for auth::types.
    use super::*;

    #[test]
    fn test_token_set_expiry_from_expires_in() {
        let now = Utc::now();
        let set = TokenSet::issued_at(now, "a".into(), None, 3599, None);
        assert_eq!(set.expires_at, now + TimeDelta::seconds(3599));
        assert!(!set.is_expired());
        assert_eq!(set.token_type, "Bearer");
    }

    #[test]
    fn test_negative_expires_in_is_already_expired() {
        let set = TokenSet::new("a".into(), None, -10, None);
        assert!(set.is_expired());
    }

    #[test]
    fn test_huge_expires_in_saturates() {
        for expires_in in [9_300_000_000_000_000, i64::MAX] {
            let set = TokenSet::new("a".into(), None, expires_in, None);
            assert_eq!(set.expires_at, DateTime::<Utc>::MAX_UTC);
            assert!(!set.is_expired());
        }

        let response: TokenResponse =
            serde_json::from_str(r#"{"access_token":"a","expires_in":9223372036854775807}"#)
                .unwrap();
        assert_eq!(TokenSet::from(response).expires_at, DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn test_token_response_defaults() {
        let response: TokenResponse =
            serde_json::from_str(r#"{"access_token":"ya29.abc"}"#).unwrap();
        let set = TokenSet::from(response);
        assert_eq!(set.expires_in, DEFAULT_EXPIRES_IN_SECS);
        assert!(set.refresh_token.is_none());
    }

    #[test]
    fn test_empty_refresh_token_is_dropped() {
        let response: TokenResponse = serde_json::from_str(
            r#"{"access_token":"ya29.abc","refresh_token":"","expires_in":60}"#,
        )
        .unwrap();
        assert!(TokenSet::from(response).refresh_token.is_none());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let set = TokenSet::new("ya29.secret".into(), Some("1//secret".into()), 60, None);
        assert!(!format!("{set:?}").contains("secret"));

        let config = OAuthConfig::new("id", "http://cb", "http://auth", "http://token", vec![])
            .with_client_secret("shh-secret");
        assert!(!format!("{config:?}").contains("shh-secret"));
    }

    #[test]
    fn test_empty_client_secret_is_none() {
        let config =
            OAuthConfig::new("id", "http://cb", "http://auth", "http://token", vec![])
                .with_client_secret("");
        assert!(config.client_secret.is_none());
    }

    #[test]
    fn test_oauth_error_display() {
        let error = OAuthError {
            error: "invalid_grant".to_string(),
            error_description: Some("Bad Request".to_string()),
        };
        assert_eq!(error.to_string(), "invalid_grant: Bad Request");
    }
}
