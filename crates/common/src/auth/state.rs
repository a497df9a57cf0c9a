//! OAuth `state` token codec
//!
//! The state parameter carries the initiating user's id through the consent
//! redirect. The payload is base64 (standard alphabet) of `{"user_id": N}`.
//! With a secret configured the token becomes `{payload}.{signature}` where
//! the signature is HMAC-SHA256 over the payload, base64url without padding.

use std::fmt;

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use crate::security::SecureString;

type HmacSha256 = Hmac<Sha256>;

/// Decoded state contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatePayload {
    pub user_id: i64,
}

/// Why a state token was rejected
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("state is empty")]
    Empty,
    #[error("state is not valid base64")]
    Encoding,
    #[error("state payload is not valid JSON with a user_id: {0}")]
    Payload(String),
    #[error("state signature is missing")]
    MissingSignature,
    #[error("state signature does not match")]
    BadSignature,
    #[error("state signing key rejected: {0}")]
    Key(String),
}

/// Encodes and verifies OAuth state tokens.
#[derive(Clone, Default)]
pub struct StateCodec {
    secret: Option<SecureString>,
}

impl StateCodec {
    /// Unsigned codec: plain base64 JSON.
    #[must_use]
    pub const fn unsigned() -> Self {
        Self { secret: None }
    }

    /// HMAC-signed codec. An empty secret yields an unsigned codec.
    #[must_use]
    pub fn signed(secret: impl Into<String>) -> Self {
        let secret = SecureString::new(secret);
        Self { secret: (!secret.is_empty()).then_some(secret) }
    }

    /// Build from an optional secret (as read from config).
    #[must_use]
    pub fn from_secret(secret: Option<&str>) -> Self {
        secret.map_or_else(Self::unsigned, Self::signed)
    }

    #[must_use]
    pub const fn is_signed(&self) -> bool {
        self.secret.is_some()
    }

    /// Encode a state token for `user_id`.
    ///
    /// # Errors
    /// Returns [`StateError::Key`] if the signing key cannot be used.
    pub fn encode(&self, user_id: i64) -> Result<String, StateError> {
        let json = serde_json::to_vec(&StatePayload { user_id })
            .map_err(|e| StateError::Payload(e.to_string()))?;
        let payload = STANDARD.encode(json);

        match &self.secret {
            Some(secret) => {
                let signature = sign(secret, payload.as_bytes())?;
                Ok(format!("{payload}.{signature}"))
            }
            None => Ok(payload),
        }
    }

    /// Decode and, when signed, verify a state token.
    ///
    /// # Errors
    /// Returns a [`StateError`] describing the first check that failed.
    pub fn decode(&self, state: &str) -> Result<StatePayload, StateError> {
        let state = state.trim();
        if state.is_empty() {
            return Err(StateError::Empty);
        }

        let payload = match &self.secret {
            Some(secret) => {
                let (payload, signature) =
                    state.rsplit_once('.').ok_or(StateError::MissingSignature)?;
                verify(secret, payload.as_bytes(), signature)?;
                payload
            }
            None => state,
        };

        let json = STANDARD.decode(payload).map_err(|_| StateError::Encoding)?;
        serde_json::from_slice::<StatePayload>(&json)
            .map_err(|e| StateError::Payload(e.to_string()))
    }
}

impl fmt::Debug for StateCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateCodec").field("signed", &self.is_signed()).finish()
    }
}

fn mac_for(secret: &SecureString) -> Result<HmacSha256, StateError> {
    HmacSha256::new_from_slice(secret.as_bytes()).map_err(|e| StateError::Key(e.to_string()))
}

fn sign(secret: &SecureString, payload: &[u8]) -> Result<String, StateError> {
    let mut mac = mac_for(secret)?;
    mac.update(payload);
    Ok(URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()))
}

fn verify(secret: &SecureString, payload: &[u8], signature: &str) -> Result<(), StateError> {
    let sig_bytes = URL_SAFE_NO_PAD.decode(signature).map_err(|_| StateError::BadSignature)?;
    let mut mac = mac_for(secret)?;
    mac.update(payload);
    mac.verify_slice(&sig_bytes).map_err(|_| StateError::BadSignature)
}
