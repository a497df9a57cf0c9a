//! Google integration
//!
//! OAuth consent/token exchange and Calendar v3 event management for
//! provisioning Google Meet links.

pub mod calendar;
pub mod oauth;
pub mod types;

pub use calendar::GoogleCalendarClient;
pub use oauth::{oauth_config, GoogleOAuthProvider};
