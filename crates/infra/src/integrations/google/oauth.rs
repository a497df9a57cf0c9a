//! Google OAuth 2.0 web-server flow
//!
//! Wraps the shared [`OAuthClient`] with Google's endpoints and maps its
//! errors onto the provisioner taxonomy: a rejected code is
//! `TokenExchange`, a rejected refresh is `Auth`, and transport failures
//! are `Network`.

use acelab_common::auth::{OAuthClient, OAuthClientError, OAuthConfig, TokenSet};
use acelab_common::ErrorClassification;
use acelab_core::OAuthProvider;
use acelab_domain::{AcelabError, GoogleConfig, Result};
use async_trait::async_trait;
use reqwest::Method;
use tracing::{debug, instrument, warn};

use super::types::UserInfo;
use crate::http::HttpClient;

/// Google implementation of `OAuthProvider`
pub struct GoogleOAuthProvider {
    client: OAuthClient,
    http: HttpClient,
    userinfo_endpoint: String,
}

impl GoogleOAuthProvider {
    pub fn new(config: &GoogleConfig, http: HttpClient) -> Self {
        let client = OAuthClient::with_http_client(oauth_config(config), http.inner().clone());
        Self { client, http, userinfo_endpoint: config.userinfo_endpoint.clone() }
    }
}

/// OAuth settings for Google: offline access with forced consent so a
/// refresh token is issued on every connect.
pub fn oauth_config(config: &GoogleConfig) -> OAuthConfig {
    OAuthConfig::new(
        config.client_id.clone(),
        config.redirect_uri.clone(),
        config.authorization_endpoint.clone(),
        config.token_endpoint.clone(),
        config.scopes.clone(),
    )
    .with_client_secret(config.client_secret.clone())
    .with_authorize_param("access_type", "offline")
    .with_authorize_param("prompt", "consent")
}

#[async_trait]
impl OAuthProvider for GoogleOAuthProvider {
    fn authorization_url(&self, state: &str) -> String {
        self.client.authorization_url(state)
    }

    #[instrument(skip(self, code))]
    async fn exchange_code(&self, code: &str) -> Result<TokenSet> {
        self.client.exchange_code(code).await.map_err(|err| {
            warn!(error = %err, "Google code exchange failed");
            classify(err, AcelabError::TokenExchange)
        })
    }

    #[instrument(skip(self, refresh_token))]
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<TokenSet> {
        self.client
            .refresh_access_token(refresh_token)
            .await
            .map_err(|err| classify(err, AcelabError::Auth))
    }

    #[instrument(skip(self, access_token))]
    async fn fetch_user_email(&self, access_token: &str) -> Result<String> {
        let request =
            self.http.request(Method::GET, &self.userinfo_endpoint).bearer_auth(access_token);
        let response = self
            .http
            .send(request)
            .await
            .map_err(|err| AcelabError::ProviderApi(format!("Google userinfo request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AcelabError::ProviderApi(format!(
                "Google userinfo error ({status}): {body}"
            )));
        }

        let info: UserInfo = response.json().await.map_err(|err| {
            AcelabError::ProviderApi(format!("Failed to parse Google userinfo response: {err}"))
        })?;
        debug!("fetched Google account email");

        info.email
            .filter(|email| !email.is_empty())
            .ok_or_else(|| AcelabError::ProviderApi("Google userinfo response has no email".into()))
    }
}

/// Transport failures and 5xx are `Network`; everything else is a
/// rejection reported through `rejected`.
fn classify(err: OAuthClientError, rejected: fn(String) -> AcelabError) -> AcelabError {
    if err.is_retryable() {
        AcelabError::Network(err.to_string())
    } else {
        rejected(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorization_url_requests_offline_consent() {
        let config = GoogleConfig::new("client-1", "secret", "http://localhost:8080/api/google/callback");
        let provider = GoogleOAuthProvider::new(&config, HttpClient::new().unwrap());

        let url = provider.authorization_url("c3RhdGU=");
        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("client_id=client-1"));
        assert!(url.contains("access_type=offline"));
        assert!(url.contains("prompt=consent"));
        assert!(url.contains("state=c3RhdGU%3D"));
        assert!(url.contains("calendar.events"));
    }

    #[test]
    fn no_refresh_token_is_a_rejection() {
        let mapped = classify(OAuthClientError::NoRefreshToken, AcelabError::Auth);
        assert!(matches!(mapped, AcelabError::Auth(_)));
    }
}
