//! Google account connection routes

use std::sync::Arc;
use std::time::Instant;

use acelab_domain::constants::{OAUTH_FAILURE_REDIRECT_PATH, OAUTH_SUCCESS_REDIRECT_PATH};
use acelab_domain::{AcelabError, ConnectionStatus};
use axum::extract::{Query, State};
use axum::response::{Json, Redirect};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::utils::logging::log_request_outcome;
use crate::AppContext;

#[derive(Debug, Serialize)]
pub struct ConnectResponse {
    pub auth_url: String,
}

/// Query Google appends to the redirect URI.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set instead of `code` when the user denies consent.
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DisconnectResponse {
    pub success: bool,
    pub message: &'static str,
}

/// `GET /api/google/connect`
pub async fn connect(
    State(ctx): State<Arc<AppContext>>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<ConnectResponse>, ApiError> {
    let start = Instant::now();
    let result = ctx.provisioner.get_authorization_url(user_id);
    log_request_outcome("google::connect", start.elapsed(), result.as_ref().err());

    Ok(Json(ConnectResponse { auth_url: result? }))
}

/// `GET /api/google/callback`
///
/// Unauthenticated; the user is recovered from `state`. Always redirects
/// back to the frontend.
pub async fn callback(
    State(ctx): State<Arc<AppContext>>,
    Query(params): Query<CallbackParams>,
) -> Redirect {
    let start = Instant::now();
    let frontend = ctx.config.server.frontend_url.trim_end_matches('/');

    let result = match (params.code.as_deref(), params.state.as_deref()) {
        (Some(code), Some(state)) if !code.is_empty() && !state.is_empty() => {
            ctx.provisioner.complete_authorization(code, state).await.map(|_| ())
        }
        _ => Err(AcelabError::InvalidInput(match params.error {
            Some(reason) => format!("authorization denied: {reason}"),
            None => "missing code or state".to_string(),
        })),
    };
    log_request_outcome("google::callback", start.elapsed(), result.as_ref().err());

    match result {
        Ok(()) => Redirect::to(&format!("{frontend}{OAUTH_SUCCESS_REDIRECT_PATH}")),
        Err(err) => {
            error!(error = %err, "Google OAuth callback error");
            Redirect::to(&format!("{frontend}{OAUTH_FAILURE_REDIRECT_PATH}"))
        }
    }
}

/// `GET /api/google/status`
pub async fn status(
    State(ctx): State<Arc<AppContext>>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<ConnectionStatus>, ApiError> {
    let start = Instant::now();
    let result = ctx.provisioner.get_connection(user_id).await;
    log_request_outcome("google::status", start.elapsed(), result.as_ref().err());

    Ok(Json(result?))
}

/// `POST /api/google/disconnect`
///
/// Storage failures are reported as `success: false` rather than an error
/// status.
pub async fn disconnect(
    State(ctx): State<Arc<AppContext>>,
    CurrentUser(user_id): CurrentUser,
) -> Json<DisconnectResponse> {
    let start = Instant::now();
    let result = ctx.provisioner.disconnect(user_id).await;
    log_request_outcome("google::disconnect", start.elapsed(), result.as_ref().err());

    let success = result.unwrap_or(false);
    Json(DisconnectResponse {
        success,
        message: if success { "Google account disconnected" } else { "Failed to disconnect" },
    })
}
