//! Google Meet provisioning on behalf of a tutor
//!
//! Owns the OAuth grant lifecycle (consent, code exchange, refresh,
//! disconnect) and turns meeting requests into calendar events that carry a
//! conference link.

pub mod ports;
pub mod service;

pub use ports::{CalendarApi, GrantRepository, OAuthProvider};
pub use service::{normalize_attendees, MeetingProvisioner};
