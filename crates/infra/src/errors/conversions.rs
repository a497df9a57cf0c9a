//! Conversions from external infrastructure errors into domain errors.

use acelab_common::storage::StorageError;
use acelab_domain::AcelabError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub AcelabError);

impl From<InfraError> for AcelabError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<AcelabError> for InfraError {
    fn from(value: AcelabError) -> Self {
        Self(value)
    }
}

trait IntoAcelabError {
    fn into_acelab(self) -> AcelabError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → AcelabError */
/* -------------------------------------------------------------------------- */

impl IntoAcelabError for SqlError {
    fn into_acelab(self) -> AcelabError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => AcelabError::Database("database is busy".into()),
                    (ErrorCode::DatabaseLocked, _) => {
                        AcelabError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 2067) => {
                        AcelabError::Database("unique constraint violation".into())
                    }
                    (ErrorCode::ConstraintViolation, 787) => {
                        AcelabError::Database("foreign key constraint violation".into())
                    }
                    (ErrorCode::NotADatabase, _) => AcelabError::Security(
                        "SQLCipher key rejected or database not encrypted".into(),
                    ),
                    _ => AcelabError::Database(format!(
                        "sqlite failure {:?} (code {}): {message}",
                        err.code, err.extended_code
                    )),
                }
            }
            RE::QueryReturnedNoRows => AcelabError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                AcelabError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, name, ty) => {
                AcelabError::Database(format!("invalid column type for {name}: {ty}"))
            }
            other => AcelabError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        Self(value.into_acelab())
    }
}

/* -------------------------------------------------------------------------- */
/* StorageError → AcelabError */
/* -------------------------------------------------------------------------- */

impl IntoAcelabError for StorageError {
    fn into_acelab(self) -> AcelabError {
        match self {
            StorageError::Rusqlite(err) => err.into_acelab(),
            StorageError::WrongKeyOrNotEncrypted | StorageError::Encryption(_) => {
                AcelabError::Security(self.to_string())
            }
            StorageError::InvalidConfig(msg) => AcelabError::Config(msg),
            other => AcelabError::Database(other.to_string()),
        }
    }
}

impl From<StorageError> for InfraError {
    fn from(value: StorageError) -> Self {
        Self(value.into_acelab())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → AcelabError */
/* -------------------------------------------------------------------------- */

impl IntoAcelabError for HttpError {
    fn into_acelab(self) -> AcelabError {
        if self.is_timeout() {
            return AcelabError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return AcelabError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {code} {}", status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => AcelabError::Auth(message),
                404 => AcelabError::NotFound(message),
                400..=499 if code != 429 => AcelabError::InvalidInput(message),
                _ => AcelabError::Network(message),
            };
        }

        if self.is_decode() {
            return AcelabError::ProviderApi(format!("unexpected response body: {self}"));
        }

        AcelabError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        Self(value.into_acelab())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
