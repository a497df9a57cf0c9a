//! Macro for implementing Display and FromStr for string-backed enums
//!
//! Lesson status and meeting type are stored as lowercase text columns and
//! accepted as lowercase JSON/form values; this macro keeps both directions in
//! one table.
//!
//! # Example
//!
//! ```rust
//! use acelab_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum RoomState {
//!     Open,
//!     Closed,
//! }
//!
//! impl_domain_status_conversions!(RoomState {
//!     Open => "open",
//!     Closed => "closed",
//! });
//!
//! assert_eq!(RoomState::Open.to_string(), "open");
//! assert_eq!("CLOSED".parse::<RoomState>(), Ok(RoomState::Closed));
//! ```

/// Implements Display and FromStr traits for status enums
///
/// Parsing is case-insensitive; display is the canonical lowercase form.
/// Unknown values produce `Err("Invalid <Enum>: <value>")`.
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Canonical string stored in the database.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
