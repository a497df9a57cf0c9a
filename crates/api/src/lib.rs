//! # Acelab API
//!
//! HTTP layer for the Google Meet provisioner.
//!
//! This crate contains:
//! - axum routes for connecting Google and managing lesson meetings
//! - Application context (dependency injection)
//! - Logging setup and the server entry point
//!
//! ## Architecture
//! - Depends on `common`, `domain`, `core`, and `infra`
//! - Wires the core services to the SQLCipher and Google adapters
//! - Callers are identified by the `X-User-Id` header from the gateway

pub mod context;
pub mod error;
pub mod extractors;
pub mod routes;
pub mod utils;

pub use context::AppContext;
pub use error::ApiError;
pub use routes::router;
