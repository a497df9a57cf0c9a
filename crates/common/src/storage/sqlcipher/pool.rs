//! SQLCipher connection pool
//!
//! r2d2 pool whose connections are keyed and configured as they are opened.

use std::ops::{Deref, DerefMut};
use std::path::Path;
use std::time::{Duration, Instant};

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use tracing::{debug, info, instrument, warn};

use super::cipher::{apply_connection_pragmas, configure_sqlcipher, verify_encryption, SqlCipherConfig};
use crate::security::SecureString;
use crate::storage::error::{StorageError, StorageResult};

/// Pool sizing and per-connection settings
#[derive(Debug, Clone)]
pub struct SqlCipherPoolConfig {
    pub max_size: u32,
    /// How long a checkout waits for a free connection.
    pub connection_timeout: Duration,
    /// SQLite busy handler timeout for lock contention.
    pub busy_timeout: Duration,
    pub enable_wal: bool,
    pub enable_foreign_keys: bool,
}

impl SqlCipherPoolConfig {
    /// Defaults with the given pool size (at least one connection).
    #[must_use]
    pub fn with_max_size(max_size: u32) -> Self {
        Self { max_size: max_size.max(1), ..Self::default() }
    }
}

impl Default for SqlCipherPoolConfig {
    fn default() -> Self {
        Self {
            max_size: 8,
            connection_timeout: Duration::from_secs(5),
            busy_timeout: Duration::from_secs(5),
            enable_wal: true,
            enable_foreign_keys: true,
        }
    }
}

/// A keyed connection checked out of [`SqlCipherPool`]; returned on drop.
pub struct SqlCipherConnection(PooledConnection<SqliteConnectionManager>);

impl Deref for SqlCipherConnection {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.0
    }
}

impl DerefMut for SqlCipherConnection {
    fn deref_mut(&mut self) -> &mut Connection {
        &mut self.0
    }
}

/// Pool occupancy snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolHealth {
    pub connections: u32,
    pub idle_connections: u32,
    pub max_connections: u32,
}

/// SQLCipher connection pool
///
/// A wrong key is detected at construction, not on the first query.
#[derive(Debug)]
pub struct SqlCipherPool {
    pool: Pool<SqliteConnectionManager>,
    config: SqlCipherPoolConfig,
}

impl SqlCipherPool {
    /// Open (or create) the database at `path`.
    ///
    /// # Errors
    /// `InvalidConfig` for an empty key, `WrongKeyOrNotEncrypted` if the key
    /// does not match an existing file, `Connection` if the pool cannot be
    /// built.
    #[instrument(skip(encryption_key), fields(db_path = ?path, pool_size = config.max_size))]
    pub fn new(
        path: &Path,
        encryption_key: SecureString,
        config: SqlCipherPoolConfig,
    ) -> StorageResult<Self> {
        if encryption_key.is_empty() {
            return Err(StorageError::InvalidConfig("encryption key is empty".into()));
        }

        let cipher = SqlCipherConfig::new(encryption_key);
        let setup = config.clone();
        let manager = SqliteConnectionManager::file(path).with_init(move |conn| {
            let boxed = |e: StorageError| rusqlite::Error::ToSqlConversionFailure(Box::new(e));
            configure_sqlcipher(conn, &cipher).map_err(boxed)?;
            apply_connection_pragmas(conn, &setup).map_err(boxed)
        });

        let pool = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .map_err(|e| {
                warn!(error = %e, "failed to create connection pool");
                StorageError::from_open_failure(format!("Failed to create pool: {e}"))
            })?;

        let probe = pool.get().map_err(|e| {
            StorageError::from_open_failure(format!("Failed to get test connection: {e}"))
        })?;
        verify_encryption(&probe)?;
        drop(probe);

        info!(max_connections = config.max_size, "SQLCipher pool created");
        Ok(Self { pool, config })
    }

    /// Check out a connection.
    ///
    /// # Errors
    /// `Timeout` when nothing frees up within the configured connection
    /// timeout, `Connection` for any other checkout failure.
    pub fn get_sqlcipher_connection(&self) -> StorageResult<SqlCipherConnection> {
        let started = Instant::now();
        self.pool
            .get()
            .map(|conn| {
                debug!(elapsed_ms = started.elapsed().as_millis(), "connection acquired");
                SqlCipherConnection(conn)
            })
            .map_err(|e| {
                if e.to_string().to_lowercase().contains("timed out") {
                    warn!(timeout = ?self.config.connection_timeout, "connection timeout");
                    StorageError::Timeout(self.config.connection_timeout.as_secs())
                } else {
                    warn!(error = %e, "connection error");
                    StorageError::Connection(format!("Failed to get connection: {e}"))
                }
            })
    }

    #[must_use]
    pub fn health(&self) -> PoolHealth {
        let state = self.pool.state();
        PoolHealth {
            connections: state.connections,
            idle_connections: state.idle_connections,
            max_connections: self.config.max_size,
        }
    }

    #[must_use]
    pub const fn max_size(&self) -> u32 {
        self.config.max_size
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempfile::TempDir;

    use super::*;

    fn test_key() -> SecureString {
        SecureString::new("grant-store-test-key")
    }

    #[test]
    fn test_default_config() {
        let config = SqlCipherPoolConfig::default();
        assert_eq!(config.max_size, 8);
        assert_eq!(config.busy_timeout, Duration::from_secs(5));
        assert!(config.enable_wal);
        assert!(config.enable_foreign_keys);
        assert_eq!(SqlCipherPoolConfig::with_max_size(0).max_size, 1);
    }

    #[test]
    fn test_concurrent_writers_share_pool() {
        let temp_dir = TempDir::new().unwrap();
        let pool = Arc::new(
            SqlCipherPool::new(
                &temp_dir.path().join("grants.db"),
                test_key(),
                SqlCipherPoolConfig::with_max_size(4),
            )
            .unwrap(),
        );
        pool.get_sqlcipher_connection()
            .unwrap()
            .execute("CREATE TABLE grants (user_id INTEGER PRIMARY KEY)", [])
            .unwrap();

        let handles: Vec<_> = (1..=5)
            .map(|user_id| {
                let pool = Arc::clone(&pool);
                std::thread::spawn(move || {
                    pool.get_sqlcipher_connection()
                        .unwrap()
                        .execute("INSERT INTO grants (user_id) VALUES (?1)", [user_id])
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let conn = pool.get_sqlcipher_connection().unwrap();
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM grants", [], |row| row.get(0)).unwrap();
        assert_eq!(count, 5);
        assert_eq!(pool.health().max_connections, 4);
    }

    #[test]
    fn test_empty_key_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let result = SqlCipherPool::new(
            &temp_dir.path().join("grants.db"),
            SecureString::new(""),
            SqlCipherPoolConfig::default(),
        );
        assert!(matches!(result, Err(StorageError::InvalidConfig(_))));
    }
}
