//! # Acelab Domain
//!
//! Business domain types for the Acelab meeting provisioner.
//!
//! This crate contains:
//! - OAuth grant, meeting and lesson types
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Provider constants
//!
//! ## Architecture
//! - No dependencies on other Acelab crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
