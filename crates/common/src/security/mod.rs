//! Security primitives and utilities

pub mod secure_string;

pub use secure_string::SecureString;
