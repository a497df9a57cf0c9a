//! Storage primitives for encrypted databases
//!
//! SQLCipher-backed SQLite pooling shared by the repositories in
//! `acelab-infra`.

pub mod error;
pub mod sqlcipher;

pub use error::{StorageError, StorageResult};
pub use sqlcipher::{
    apply_connection_pragmas, PoolHealth, SqlCipherConnection, SqlCipherPool, SqlCipherPoolConfig,
};
