//! Database connection manager backed by the shared SQLCipher pool.

use std::path::Path;

use acelab_common::storage::{SqlCipherConnection, SqlCipherPool, SqlCipherPoolConfig, StorageError};
use acelab_common::SecureString;
use acelab_domain::{AcelabError, Result};
use rusqlite::params;
use tokio::task::JoinError;
use tracing::info;

use crate::errors::InfraError;

const SCHEMA_VERSION: i32 = 1;
const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Database manager that wraps an [`SqlCipherPool`].
#[derive(Debug)]
pub struct DbManager {
    pool: SqlCipherPool,
}

impl DbManager {
    /// Open (or create) the encrypted database with the given pool size.
    ///
    /// # Errors
    /// `Security` when no key is provided or the key does not open the file.
    pub fn new<P: AsRef<Path>>(
        db_path: P,
        pool_size: u32,
        encryption_key: Option<&str>,
    ) -> Result<Self> {
        let key = encryption_key
            .filter(|key| !key.is_empty())
            .map(SecureString::new)
            .ok_or_else(|| AcelabError::Security("database encryption key not provided".into()))?;

        let path = db_path.as_ref();
        let config = SqlCipherPoolConfig::with_max_size(pool_size);
        let pool = SqlCipherPool::new(path, key, config).map_err(map_storage_error)?;

        info!(
            db_path = %path.display(),
            max_connections = pool.max_size(),
            "sqlcipher pool initialised"
        );

        Ok(Self { pool })
    }

    /// Acquire a SQLCipher connection from the pool.
    pub fn get_connection(&self) -> Result<SqlCipherConnection> {
        self.pool.get_sqlcipher_connection().map_err(map_storage_error)
    }

    /// Ensure the full schema exists on the current database.
    pub fn run_migrations(&self) -> Result<()> {
        let conn = self.get_connection()?;
        conn.execute_batch(SCHEMA_SQL).map_err(map_sql_error)?;
        conn.execute(
            "INSERT OR IGNORE INTO schema_version (version, applied_at)
             VALUES (?1, CAST(strftime('%s','now') AS INTEGER))",
            params![SCHEMA_VERSION],
        )
        .map_err(map_sql_error)?;
        Ok(())
    }

    /// Acquire a connection and run a trivial query.
    pub fn health_check(&self) -> Result<()> {
        let conn = self.get_connection()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i32>(0)).map_err(map_sql_error)?;
        Ok(())
    }
}

pub(crate) fn map_sql_error(err: rusqlite::Error) -> AcelabError {
    AcelabError::from(InfraError::from(err))
}

pub(crate) fn map_storage_error(err: StorageError) -> AcelabError {
    AcelabError::from(InfraError::from(err))
}

pub(crate) fn map_join_error(err: JoinError) -> AcelabError {
    AcelabError::Internal(format!("database task failed: {err}"))
}
