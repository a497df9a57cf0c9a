//! OAuth grant types
//!
//! A grant is the stored Google token pair that lets the server act on a
//! tutor's calendar. One row per user.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Internal user identifier (matches the platform's integer user ids).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl UserId {
    /// Raw integer id.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Delegated Google credentials for one user
///
/// Token fields are never serialized and are redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct OAuthGrant {
    pub user_id: UserId,
    /// Google account email, shown to the tutor and added as organizer attendee.
    pub google_email: Option<String>,
    #[serde(skip_serializing)]
    pub access_token: String,
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OAuthGrant {
    /// Build a grant from a fresh token response.
    pub fn new(
        user_id: UserId,
        google_email: Option<String>,
        access_token: String,
        refresh_token: Option<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            google_email,
            access_token,
            refresh_token,
            expires_at,
            created_at: now,
            updated_at: now,
        }
    }

    /// Expired once `expires_at` is in the past.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Expiry check against an explicit clock.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// A refresh token that is present and non-empty.
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref().filter(|token| !token.is_empty())
    }

    /// Dashboard view of this grant's token.
    #[must_use]
    pub fn token_status(&self) -> TokenStatus {
        TokenStatus {
            connected: true,
            expires_at: self.expires_at,
            is_expired: self.is_expired(),
        }
    }
}

impl fmt::Debug for OAuthGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthGrant")
            .field("user_id", &self.user_id)
            .field("google_email", &self.google_email)
            .field("access_token", &"***")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "***"))
            .field("expires_at", &self.expires_at)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Token health as reported to the tutor dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenStatus {
    pub connected: bool,
    pub expires_at: DateTime<Utc>,
    pub is_expired: bool,
}

/// Connection summary for the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    pub connected: bool,
    pub google_email: Option<String>,
    pub status: Option<TokenStatus>,
}

impl ConnectionStatus {
    /// Status for a user with no stored grant.
    #[must_use]
    pub fn disconnected() -> Self {
        Self { connected: false, google_email: None, status: None }
    }
}

impl From<&OAuthGrant> for ConnectionStatus {
    fn from(grant: &OAuthGrant) -> Self {
        Self {
            connected: true,
            google_email: grant.google_email.clone(),
            status: Some(grant.token_status()),
        }
    }
}
