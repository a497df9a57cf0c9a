//! HTTP error responses

use acelab_domain::AcelabError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

const DEFAULT_FAILURE: &str = "Request failed";

/// Error body returned by every JSON route:
/// `{"success": false, "message": …}` plus `"needs_auth": true` when the
/// user has to (re)connect Google.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub needs_auth: bool,
}

impl ApiError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self { status: StatusCode::UNAUTHORIZED, message: message.into(), needs_auth: false }
    }

    /// Map a domain error, prefixing unexpected failures with `context`.
    pub fn with_context(err: &AcelabError, context: &str) -> Self {
        let (status, message) = match err {
            AcelabError::NotConnected(_) => {
                (StatusCode::BAD_REQUEST, "Please connect your Google account first".to_string())
            }
            AcelabError::ReauthRequired(_) => (
                StatusCode::BAD_REQUEST,
                "Google authorization expired, please reconnect your Google account".to_string(),
            ),
            AcelabError::InvalidState(msg) | AcelabError::TokenExchange(msg) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            AcelabError::InvalidInput(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            AcelabError::NotFound(msg) => (StatusCode::NOT_FOUND, format!("Not found: {msg}")),
            other => (StatusCode::INTERNAL_SERVER_ERROR, format!("{context}: {other}")),
        };

        Self { status, message, needs_auth: err.needs_auth() }
    }
}

impl From<AcelabError> for ApiError {
    fn from(err: AcelabError) -> Self {
        Self::with_context(&err, DEFAULT_FAILURE)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({ "success": false, "message": self.message });
        if self.needs_auth {
            body["needs_auth"] = json!(true);
        }
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_errors_ask_for_auth() {
        let err = ApiError::from(AcelabError::NotConnected("user 42".into()));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.needs_auth);
        assert_eq!(err.message, "Please connect your Google account first");

        let err = ApiError::from(AcelabError::ReauthRequired("no refresh token".into()));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.needs_auth);
    }

    #[test]
    fn validation_and_lookup_statuses() {
        assert_eq!(
            ApiError::from(AcelabError::InvalidInput("duration".into())).status,
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(AcelabError::InvalidState("bad".into())).status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(AcelabError::NotFound("lesson 9".into())).status,
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn unexpected_errors_carry_context() {
        let err = ApiError::with_context(
            &AcelabError::ProviderApi("quota exceeded".into()),
            "Failed to create Google Meet",
        );
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.needs_auth);
        assert_eq!(err.message, "Failed to create Google Meet: Provider API error: quota exceeded");
    }
}
