//! Lesson types
//!
//! Only the slice of a course lesson that the meeting flow reads or writes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::meeting::MeetingType;
use crate::impl_domain_status_conversions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl_domain_status_conversions!(LessonStatus {
    Scheduled => "scheduled",
    Completed => "completed",
    Cancelled => "cancelled",
});

/// A live lesson within a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: i64,
    pub course_id: i64,
    /// Owning tutor; only they may attach a meeting.
    pub tutor_id: i64,
    pub title: String,
    pub meeting_link: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub duration: Option<i64>,
    pub status: LessonStatus,
    pub meeting_type: Option<MeetingType>,
    pub google_event_id: Option<String>,
    pub notifications_sent: bool,
}

/// Body of the create-meeting request.
///
/// `start_time` stays a string so it can be interpreted in `timezone`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonMeetingRequest {
    pub meeting_type: MeetingType,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub timezone: Option<String>,
}

/// Fields written back to the lesson after a meeting is provisioned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonMeetingLink {
    pub meeting_link: String,
    pub google_event_id: String,
    pub meeting_type: MeetingType,
    pub start_time: DateTime<Utc>,
    pub duration: i64,
}
