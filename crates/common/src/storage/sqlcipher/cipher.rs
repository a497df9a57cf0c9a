//! Per-connection setup: SQLCipher keying, then the SQLite pragmas.

use rusqlite::Connection;
use tracing::{debug, error};

use super::pool::SqlCipherPoolConfig;
use crate::security::SecureString;
use crate::storage::error::{is_wrong_key_message, StorageError, StorageResult};

/// SQLCipher 4.x defaults.
const CIPHER_COMPATIBILITY: i32 = 4;
const KDF_ITERATIONS: i32 = 256_000;
const WAL_AUTOCHECKPOINT_PAGES: i32 = 1000;

/// Key material plus the cipher parameters applied with it.
#[derive(Clone)]
pub struct SqlCipherConfig {
    pub key: SecureString,
    pub cipher_compatibility: i32,
    pub kdf_iter: i32,
}

impl std::fmt::Debug for SqlCipherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlCipherConfig")
            .field("key", &self.key)
            .field("cipher_compatibility", &self.cipher_compatibility)
            .field("kdf_iter", &self.kdf_iter)
            .finish()
    }
}

impl SqlCipherConfig {
    #[must_use]
    pub const fn new(key: SecureString) -> Self {
        Self { key, cipher_compatibility: CIPHER_COMPATIBILITY, kdf_iter: KDF_ITERATIONS }
    }
}

fn encryption_error(pragma: &str, err: &rusqlite::Error) -> StorageError {
    if is_wrong_key_message(&err.to_string()) {
        StorageError::WrongKeyOrNotEncrypted
    } else {
        StorageError::Encryption(format!("Failed to set {pragma}: {err}"))
    }
}

/// Key a freshly opened connection.
///
/// `PRAGMA key` has to run before any other statement touches the file.
///
/// # Errors
/// Returns `Encryption` (or `WrongKeyOrNotEncrypted`) if a pragma is rejected.
pub fn configure_sqlcipher(conn: &Connection, config: &SqlCipherConfig) -> StorageResult<()> {
    conn.pragma_update(None, "key", config.key.expose()).map_err(|e| {
        error!(error = %e, "SQLCipher key setup failed");
        encryption_error("encryption key", &e)
    })?;
    conn.pragma_update(None, "cipher_compatibility", config.cipher_compatibility)
        .map_err(|e| encryption_error("cipher_compatibility", &e))?;
    conn.pragma_update(None, "kdf_iter", config.kdf_iter)
        .map_err(|e| encryption_error("kdf_iter", &e))?;

    debug!("SQLCipher configured");
    Ok(())
}

/// Journal, durability, foreign keys and busy timeout for a keyed connection.
///
/// # Errors
/// Returns `Query` if SQLite rejects a pragma.
pub fn apply_connection_pragmas(
    conn: &Connection,
    config: &SqlCipherPoolConfig,
) -> StorageResult<()> {
    let pragma_error =
        |name: &str, e: rusqlite::Error| StorageError::Query(format!("Failed to set {name}: {e}"));

    if config.enable_wal {
        let mode: String = conn
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .map_err(|e| pragma_error("journal_mode", e))?;
        debug!(journal_mode = %mode, "journal mode applied");
        conn.pragma_update(None, "wal_autocheckpoint", WAL_AUTOCHECKPOINT_PAGES)
            .map_err(|e| pragma_error("wal_autocheckpoint", e))?;
    }

    conn.pragma_update(None, "synchronous", "NORMAL")
        .map_err(|e| pragma_error("synchronous", e))?;
    conn.pragma_update(None, "foreign_keys", config.enable_foreign_keys)
        .map_err(|e| pragma_error("foreign_keys", e))?;
    conn.busy_timeout(config.busy_timeout).map_err(|e| pragma_error("busy_timeout", e))?;

    Ok(())
}

/// Force a page read so a wrong key fails here rather than on first use.
///
/// # Errors
/// Returns `WrongKeyOrNotEncrypted` if the key does not decrypt the file.
pub fn verify_encryption(conn: &Connection) -> StorageResult<()> {
    conn.query_row("SELECT count(*) FROM sqlite_master", [], |_| Ok(())).map_err(|e| {
        error!(error = %e, "encryption verification failed");
        if is_wrong_key_message(&e.to_string()) {
            StorageError::WrongKeyOrNotEncrypted
        } else {
            StorageError::from(e)
        }
    })
}
