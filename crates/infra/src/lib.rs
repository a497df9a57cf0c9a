//! # Acelab Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - Configuration loading (environment and files)
//! - Database implementations (SQLite/SQLCipher)
//! - HTTP client with retry
//! - Google OAuth and Calendar integrations
//!
//! ## Architecture
//! - Implements traits defined in `acelab-core`
//! - Depends on `acelab-common`, `acelab-domain` and `acelab-core`
//! - Contains all "impure" code (I/O, network)

pub mod config;
pub mod database;
pub mod errors;
pub mod http;
pub mod integrations;

// Re-export commonly used items
pub use database::{DbManager, SqlCipherGrantRepository, SqlCipherLessonRepository};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use integrations::google::{GoogleCalendarClient, GoogleOAuthProvider};
