//! Error classification shared by the common modules
//!
//! Each module keeps its own `thiserror` enum (`StorageError`,
//! `OAuthClientError`, `StateError`). Those that callers need to triage
//! implement [`ErrorClassification`], which answers two questions:
//!
//! - **`is_retryable()`**: can the same operation succeed if attempted again?
//! - **`severity()`**: how loudly should this be logged?
//!
//! | Level | Use Case |
//! |-------|----------|
//! | **Info** | Expected conditions (missing rows) |
//! | **Warning** | Degraded but operational (busy database, rejected grant) |
//! | **Error** | Failure requiring attention (network, query errors) |
//! | **Critical** | Integrity at risk (wrong key, broken config) |
//!
//! ```rust,ignore
//! use acelab_common::error::{ErrorClassification, ErrorSeverity};
//!
//! struct Busy;
//!
//! impl ErrorClassification for Busy {
//!     fn is_retryable(&self) -> bool {
//!         true
//!     }
//!
//!     fn severity(&self) -> ErrorSeverity {
//!         ErrorSeverity::Warning
//!     }
//! }
//!
//! assert!(!Busy.is_critical());
//! assert!(Busy.retry_after().is_none());
//! ```

use std::fmt;
use std::time::Duration;

/// Standard interface for classifying errors
pub trait ErrorClassification {
    /// Transient failures (timeouts, busy database, upstream 5xx).
    fn is_retryable(&self) -> bool;

    /// Used for logging decisions.
    fn severity(&self) -> ErrorSeverity;

    /// Whether this needs immediate attention.
    fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }

    /// Suggested retry delay, when the source provides one.
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

/// Error severity levels for monitoring and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}
