//! Port interfaces for meeting provisioning
//!
//! These traits define the boundaries between the provisioner and the
//! storage and provider implementations in `acelab-infra`.

use acelab_common::auth::TokenSet;
use acelab_domain::{CreatedCalendarEvent, NewCalendarEvent, OAuthGrant, Result, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Persistence for per-user OAuth grants (at most one per user)
#[async_trait]
pub trait GrantRepository: Send + Sync {
    /// The user's grant, if they ever connected.
    async fn find_grant(&self, user_id: UserId) -> Result<Option<OAuthGrant>>;

    /// Insert or overwrite the user's grant; returns the stored row.
    async fn upsert_grant(&self, grant: OAuthGrant) -> Result<OAuthGrant>;

    /// Store a refreshed access token. The refresh token is left untouched.
    async fn update_access_token(
        &self,
        user_id: UserId,
        access_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Returns whether a row was removed.
    async fn delete_grant(&self, user_id: UserId) -> Result<bool>;
}

/// OAuth provider operations
///
/// Implementations map a rejected authorization code to
/// `AcelabError::TokenExchange` and userinfo failures to
/// `AcelabError::ProviderApi`.
#[async_trait]
pub trait OAuthProvider: Send + Sync {
    /// Consent URL carrying `state`.
    fn authorization_url(&self, state: &str) -> String;

    /// Trade an authorization code for tokens.
    async fn exchange_code(&self, code: &str) -> Result<TokenSet>;

    /// New access token for a stored refresh token.
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<TokenSet>;

    /// Email of the account that granted access.
    async fn fetch_user_email(&self, access_token: &str) -> Result<String>;
}

/// Calendar operations on the organizer's calendar
#[async_trait]
pub trait CalendarApi: Send + Sync {
    /// Insert an event with a conference request.
    async fn insert_event(
        &self,
        access_token: &str,
        event: &NewCalendarEvent,
    ) -> Result<CreatedCalendarEvent>;

    /// Delete an event; a missing event is a provider error.
    async fn delete_event(&self, access_token: &str, event_id: &str) -> Result<()>;
}
