//! Application constants
//!
//! Centralized location for provider endpoints and meeting defaults used
//! throughout the application.

// Google OAuth / API endpoints
pub const GOOGLE_AUTHORIZATION_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_USERINFO_ENDPOINT: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
pub const GOOGLE_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

pub const GOOGLE_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/calendar.events",
    "https://www.googleapis.com/auth/userinfo.email",
    "https://www.googleapis.com/auth/userinfo.profile",
];

pub const DEFAULT_APPLICATION_NAME: &str = "Acelab Tutors";
pub const PRIMARY_CALENDAR_ID: &str = "primary";
pub const CONFERENCE_SOLUTION_TYPE: &str = "hangoutsMeet";
pub const ATTENDEE_RESPONSE_STATUS: &str = "accepted";

// Meeting defaults
pub const INSTANT_MEETING_DURATION_MINUTES: i64 = 60;
pub const MIN_SCHEDULED_DURATION_MINUTES: i64 = 15;
pub const MAX_SCHEDULED_DURATION_MINUTES: i64 = 24 * 60;
pub const DEFAULT_TIMEZONE: &str = "UTC";

// Frontend redirect paths after the OAuth callback
pub const OAUTH_SUCCESS_REDIRECT_PATH: &str = "/tutor/courses?google_connected=true";
pub const OAUTH_FAILURE_REDIRECT_PATH: &str = "/tutor/courses?error=oauth_failed";
