//! Meeting and calendar event types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

/// How a lesson meeting is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingType {
    /// Starts now and runs for the default instant duration.
    Instant,
    /// Starts at a tutor-chosen time.
    Scheduled,
}

impl_domain_status_conversions!(MeetingType {
    Instant => "instant",
    Scheduled => "scheduled",
});

/// Request to schedule a video meeting on the organizer's calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledMeeting {
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i64,
    pub description: String,
    pub attendee_emails: Vec<String>,
    /// IANA zone name attached to the event; `None` means UTC.
    pub timezone: Option<String>,
}

/// Handle to a provisioned meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingEvent {
    pub event_id: String,
    pub meeting_link: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Calendar insert payload, already normalized (attendees deduplicated,
/// organizer appended).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCalendarEvent {
    pub summary: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub timezone: String,
    pub attendees: Vec<String>,
    /// Idempotency key for the conference create request.
    pub conference_request_id: String,
    /// Ask the calendar to email invitations.
    pub send_updates: bool,
}

/// What the calendar returned for an inserted event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedCalendarEvent {
    pub event_id: String,
    pub meeting_link: Option<String>,
}
