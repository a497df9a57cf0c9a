//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Acelab
///
/// The first five variants are the provisioner's user-facing taxonomy; the
/// rest classify infrastructure failures.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum AcelabError {
    /// OAuth state token could not be decoded, verified, or lacked a user id.
    #[error("Invalid OAuth state: {0}")]
    InvalidState(String),

    /// The provider rejected the authorization code.
    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    /// The user has no stored grant.
    #[error("Google account not connected: {0}")]
    NotConnected(String),

    /// The grant expired and cannot be refreshed without user consent.
    #[error("Re-authentication required: {0}")]
    ReauthRequired(String),

    /// Generic calendar/userinfo API failure.
    #[error("Provider API error: {0}")]
    ProviderApi(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Security error: {0}")]
    Security(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AcelabError {
    /// Whether the user must (re)connect their Google account to proceed.
    #[must_use]
    pub fn needs_auth(&self) -> bool {
        matches!(self, Self::NotConnected(_) | Self::ReauthRequired(_))
    }
}

/// Result type alias for Acelab operations
pub type Result<T> = std::result::Result<T, AcelabError>;
