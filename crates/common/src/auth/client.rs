//! OAuth 2.0 client for the authorization code flow
//!
//! Handles the server-side (confidential client) flow:
//! - Authorization URL building
//! - Authorization code exchange
//! - Token refresh

use std::time::Duration;

use reqwest::Client;

use super::types::{OAuthConfig, OAuthError, TokenResponse, TokenSet};
use crate::error::{ErrorClassification, ErrorSeverity};

/// Error type for OAuth client operations
#[derive(Debug)]
pub enum OAuthClientError {
    /// HTTP request failed
    RequestFailed(reqwest::Error),

    /// OAuth server returned a structured error body
    OAuthError { status: u16, error: OAuthError },

    /// Non-success response without a parsable OAuth error body
    UnexpectedStatus { status: u16, body: String },

    /// Failed to parse response
    ParseError(String),

    /// No refresh token available
    NoRefreshToken,

    /// Invalid configuration
    ConfigError(String),
}

impl std::fmt::Display for OAuthClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RequestFailed(e) => write!(f, "HTTP request failed: {e}"),
            Self::OAuthError { status, error } => write!(f, "OAuth error ({status}): {error}"),
            Self::UnexpectedStatus { status, body } => {
                write!(f, "Unexpected token endpoint response ({status}): {body}")
            }
            Self::ParseError(msg) => write!(f, "Parse error: {msg}"),
            Self::NoRefreshToken => write!(f, "No refresh token available"),
            Self::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for OAuthClientError {}

impl From<reqwest::Error> for OAuthClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::RequestFailed(err)
    }
}

impl ErrorClassification for OAuthClientError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::RequestFailed(e) => e.is_timeout() || e.is_connect(),
            Self::OAuthError { status, .. } | Self::UnexpectedStatus { status, .. } => {
                *status >= 500
            }
            Self::ParseError(_) | Self::NoRefreshToken | Self::ConfigError(_) => false,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NoRefreshToken | Self::OAuthError { .. } => ErrorSeverity::Warning,
            Self::ConfigError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }
}

/// OAuth 2.0 client
///
/// Works against any RFC 6749 token endpoint; Google is the one in use.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    config: OAuthConfig,
    client: Client,
}

impl OAuthClient {
    /// Create a client with its own `reqwest::Client` and request timeout.
    ///
    /// # Errors
    /// Returns `ConfigError` if the HTTP client cannot be built.
    pub fn new(config: OAuthConfig, timeout: Duration) -> Result<Self, OAuthClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OAuthClientError::ConfigError(e.to_string()))?;
        Ok(Self { config, client })
    }

    /// Create a client sharing an existing `reqwest::Client`.
    #[must_use]
    pub fn with_http_client(config: OAuthConfig, client: Client) -> Self {
        Self { config, client }
    }

    /// Build the consent URL the user's browser is sent to.
    ///
    /// # Examples
    /// ```ignore
    /// use acelab_common::auth::{OAuthClient, OAuthConfig};
    ///
    /// let config = OAuthConfig::new(
    ///     "client",
    ///     "http://localhost/cb",
    ///     "https://accounts.example.com/auth",
    ///     "https://accounts.example.com/token",
    ///     vec!["email".to_string()],
    /// )
    /// .with_authorize_param("access_type", "offline");
    /// let client = OAuthClient::with_http_client(config, reqwest::Client::new());
    /// let url = client.authorization_url("abc");
    /// assert!(url.contains("access_type=offline"));
    /// ```
    #[must_use]
    pub fn authorization_url(&self, state: &str) -> String {
        let mut params = vec![
            ("response_type", "code".to_string()),
            ("client_id", self.config.client_id.clone()),
            ("redirect_uri", self.config.redirect_uri.clone()),
            ("scope", self.config.scope_string()),
            ("state", state.to_string()),
        ];
        params.extend(
            self.config.extra_authorize_params.iter().map(|(k, v)| (k.as_str(), v.clone())),
        );

        let query_string = params
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{}", self.config.authorization_endpoint, query_string)
    }

    /// Exchange an authorization code for tokens.
    ///
    /// # Errors
    /// Returns `OAuthError` when the provider rejects the code, or a
    /// transport/parse error.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenSet, OAuthClientError> {
        if code.is_empty() {
            return Err(OAuthClientError::ConfigError("authorization code is empty".into()));
        }

        let mut params = vec![
            ("grant_type", "authorization_code".to_string()),
            ("client_id", self.config.client_id.clone()),
            ("code", code.to_string()),
            ("redirect_uri", self.config.redirect_uri.clone()),
        ];
        if let Some(secret) = &self.config.client_secret {
            params.push(("client_secret", secret.clone()));
        }

        self.post_token(&params).await
    }

    /// Refresh access token using refresh token
    ///
    /// The returned set usually has no refresh token; callers keep the old
    /// one.
    ///
    /// # Errors
    /// Returns `NoRefreshToken` for an empty token, otherwise as
    /// [`OAuthClient::exchange_code`].
    pub async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenSet, OAuthClientError> {
        if refresh_token.is_empty() {
            return Err(OAuthClientError::NoRefreshToken);
        }

        let mut params = vec![
            ("grant_type", "refresh_token".to_string()),
            ("client_id", self.config.client_id.clone()),
            ("refresh_token", refresh_token.to_string()),
        ];
        if let Some(secret) = &self.config.client_secret {
            params.push(("client_secret", secret.clone()));
        }

        self.post_token(&params).await
    }

    async fn post_token(&self, params: &[(&str, String)]) -> Result<TokenSet, OAuthClientError> {
        let response = self.client.post(&self.config.token_endpoint).form(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match serde_json::from_str::<OAuthError>(&body) {
                Ok(error) => OAuthClientError::OAuthError { status: status.as_u16(), error },
                Err(_) => OAuthClientError::UnexpectedStatus { status: status.as_u16(), body },
            });
        }

        let token_response: TokenResponse =
            response.json().await.map_err(|e| OAuthClientError::ParseError(e.to_string()))?;

        Ok(token_response.into())
    }

    /// Get the configured redirect URI
    #[must_use]
    pub fn redirect_uri(&self) -> &str {
        &self.config.redirect_uri
    }

    /// Get a reference to the OAuth configuration
    #[must_use]
    pub const fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// The underlying HTTP client, for provider calls that share its timeout.
    #[must_use]
    pub const fn http(&self) -> &Client {
        &self.client
    }
}
