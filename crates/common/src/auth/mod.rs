//! OAuth 2.0 authorization code flow primitives
//!
//! Server-side (confidential client) OAuth used to obtain delegated Google
//! credentials for tutors.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   StateCodec    │  user id <-> opaque `state` (optionally HMAC signed)
//! └─────────────────┘
//! ┌─────────────────┐
//! │   OAuthClient   │  consent URL, code exchange, refresh
//! └────────┬────────┘
//!          └──► reqwest (form POST to the token endpoint)
//! ```
//!
//! # Module Organization
//!
//! - **[`types`]**: `TokenSet`, `TokenResponse`, `OAuthConfig`, `OAuthError`
//! - **[`client`]**: HTTP client for authorization and token exchange
//! - **[`state`]**: state token encoding and verification

pub mod client;
pub mod state;
pub mod types;

pub use client::{OAuthClient, OAuthClientError};
pub use state::{StateCodec, StateError, StatePayload};
pub use types::{OAuthConfig, OAuthError, TokenResponse, TokenSet};
