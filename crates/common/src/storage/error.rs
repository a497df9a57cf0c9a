//! Storage error types

use thiserror::Error;

use crate::error::{ErrorClassification, ErrorSeverity};

/// Storage error type
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(String),

    #[error("Database encryption error: {0}")]
    Encryption(String),

    #[error("Wrong encryption key or database not encrypted")]
    WrongKeyOrNotEncrypted,

    #[error("Connection timeout after {0}s")]
    Timeout(u64),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Rusqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    R2d2(#[from] r2d2::Error),
}

/// Storage result type
pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    /// Classify an open/decrypt failure message.
    ///
    /// SQLCipher reports a wrong key as a generic "not a database" error, so
    /// the message text is the only signal.
    pub(crate) fn from_open_failure(message: impl Into<String>) -> Self {
        let message = message.into();
        if is_wrong_key_message(&message) {
            Self::WrongKeyOrNotEncrypted
        } else {
            Self::Connection(message)
        }
    }
}

pub(crate) fn is_wrong_key_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    [
        "file is not a database",
        "file is encrypted",
        "database disk image is malformed",
        "notadb",
        "unsupported file format",
    ]
    .iter()
    .any(|needle| lower.contains(needle))
}

impl ErrorClassification for StorageError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Connection(_) => true,
            Self::Rusqlite(err) => matches!(
                err.sqlite_error_code(),
                Some(rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked)
            ),
            _ => false,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Encryption(_) | Self::WrongKeyOrNotEncrypted => ErrorSeverity::Critical,
            Self::Timeout(_) => ErrorSeverity::Warning,
            Self::Rusqlite(rusqlite::Error::QueryReturnedNoRows) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for storage::error.
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::Connection("Failed to connect".to_string());
        assert_eq!(err.to_string(), "Database connection error: Failed to connect");
        assert_eq!(
            StorageError::WrongKeyOrNotEncrypted.to_string(),
            "Wrong encryption key or database not encrypted"
        );
        assert_eq!(StorageError::Timeout(5).to_string(), "Connection timeout after 5s");
    }

    #[test]
    fn test_open_failure_classification() {
        assert!(matches!(
            StorageError::from_open_failure("file is not a database"),
            StorageError::WrongKeyOrNotEncrypted
        ));
        assert!(matches!(
            StorageError::from_open_failure("unable to open database file"),
            StorageError::Connection(_)
        ));
    }

    #[test]
    fn test_error_classification() {
        assert!(StorageError::Timeout(5).is_retryable());
        assert!(!StorageError::InvalidConfig("pool size".into()).is_retryable());
        assert!(StorageError::WrongKeyOrNotEncrypted.is_critical());
        assert_eq!(
            StorageError::Rusqlite(rusqlite::Error::QueryReturnedNoRows).severity(),
            ErrorSeverity::Info
        );
    }
}
