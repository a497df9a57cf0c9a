//! SQLCipher backend: keyed r2d2 pool

pub mod cipher;
pub mod pool;

pub use cipher::{apply_connection_pragmas, configure_sqlcipher, verify_encryption, SqlCipherConfig};
pub use pool::{PoolHealth, SqlCipherConnection, SqlCipherPool, SqlCipherPoolConfig};
