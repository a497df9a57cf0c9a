//! Lesson meeting service - attaches and cancels a lesson's live-class meeting

use std::str::FromStr;
use std::sync::Arc;

use acelab_domain::constants::{
    DEFAULT_TIMEZONE, INSTANT_MEETING_DURATION_MINUTES, MAX_SCHEDULED_DURATION_MINUTES,
    MIN_SCHEDULED_DURATION_MINUTES,
};
use acelab_domain::{
    AcelabError, Lesson, LessonMeetingLink, LessonMeetingRequest, MeetingEvent, MeetingType,
    Result, ScheduledMeeting, UserId,
};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::{info, instrument, warn};

use super::ports::LessonRepository;
use crate::meeting::MeetingProvisioner;

/// Accepted forms for a start time without an offset.
const NAIVE_FORMATS: &[&str] =
    &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// Lesson-level entry point for creating and cancelling Google Meet links
pub struct LessonMeetingService {
    provisioner: Arc<MeetingProvisioner>,
    lessons: Arc<dyn LessonRepository>,
}

impl LessonMeetingService {
    /// Service over the shared provisioner and the lesson store.
    pub fn new(provisioner: Arc<MeetingProvisioner>, lessons: Arc<dyn LessonRepository>) -> Self {
        Self { provisioner, lessons }
    }

    /// Provision a meeting for the lesson and store its link.
    ///
    /// Scheduled meetings invite every student enrolled in the lesson's
    /// course. The lesson is only written after the provider succeeds.
    #[instrument(skip(self, request), fields(meeting_type = %request.meeting_type))]
    pub async fn create_meeting_for_lesson(
        &self,
        user_id: UserId,
        lesson_id: i64,
        request: &LessonMeetingRequest,
    ) -> Result<Lesson> {
        let lesson = self.owned_lesson(user_id, lesson_id).await?;

        if !self.provisioner.is_connected(user_id).await? {
            return Err(AcelabError::NotConnected(
                "Please connect your Google account first".to_string(),
            ));
        }

        let (event, duration) = match request.meeting_type {
            MeetingType::Instant => {
                let description = format!("Live class for: {}", lesson.title);
                let event = self
                    .provisioner
                    .create_instant_meeting(user_id, &lesson.title, &description)
                    .await?;
                (event, INSTANT_MEETING_DURATION_MINUTES)
            }
            MeetingType::Scheduled => self.schedule(user_id, &lesson, request).await?,
        };

        let link = LessonMeetingLink {
            meeting_link: event.meeting_link,
            google_event_id: event.event_id,
            meeting_type: request.meeting_type,
            start_time: event.start_time,
            duration,
        };
        let updated = self.lessons.link_meeting(lesson.id, &link).await?;
        info!(lesson_id, event_id = %link.google_event_id, "Lesson meeting created");
        Ok(updated)
    }

    /// Delete the lesson's calendar event (best effort) and clear its link.
    ///
    /// Returns the updated lesson and whether the provider deletion succeeded.
    /// A lesson without an event reports `false`.
    #[instrument(skip(self))]
    pub async fn cancel_meeting_for_lesson(
        &self,
        user_id: UserId,
        lesson_id: i64,
    ) -> Result<(Lesson, bool)> {
        let lesson = self.owned_lesson(user_id, lesson_id).await?;

        let provider_deleted = match lesson.google_event_id.as_deref() {
            Some(event_id) if !event_id.is_empty() => {
                self.provisioner.delete_meeting(user_id, event_id).await
            }
            _ => false,
        };
        if !provider_deleted {
            warn!(lesson_id, "Clearing lesson meeting without a provider deletion");
        }

        let updated = self.lessons.clear_meeting(lesson.id).await?;
        Ok((updated, provider_deleted))
    }

    async fn owned_lesson(&self, user_id: UserId, lesson_id: i64) -> Result<Lesson> {
        self.lessons
            .find_lesson(lesson_id)
            .await?
            .filter(|lesson| lesson.tutor_id == user_id.get())
            .ok_or_else(|| AcelabError::NotFound(format!("lesson {lesson_id}")))
    }

    async fn schedule(
        &self,
        user_id: UserId,
        lesson: &Lesson,
        request: &LessonMeetingRequest,
    ) -> Result<(MeetingEvent, i64)> {
        let raw_start = request
            .start_time
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                AcelabError::InvalidInput("start_time is required for scheduled meetings".into())
            })?;

        let duration = request.duration.ok_or_else(|| {
            AcelabError::InvalidInput("duration is required for scheduled meetings".into())
        })?;
        if duration < MIN_SCHEDULED_DURATION_MINUTES {
            return Err(AcelabError::InvalidInput(format!(
                "duration must be at least {MIN_SCHEDULED_DURATION_MINUTES} minutes"
            )));
        }
        if duration > MAX_SCHEDULED_DURATION_MINUTES {
            return Err(AcelabError::InvalidInput(format!(
                "duration must be at most {MAX_SCHEDULED_DURATION_MINUTES} minutes"
            )));
        }

        let timezone = resolve_timezone(request.timezone.as_deref())?;
        let start_time = parse_start_time(raw_start, timezone)?;
        let attendee_emails = self.lessons.enrolled_student_emails(lesson.course_id).await?;

        let meeting = ScheduledMeeting {
            title: lesson.title.clone(),
            start_time,
            duration_minutes: duration,
            description: format!("Live class for: {}", lesson.title),
            attendee_emails,
            timezone: Some(timezone.name().to_string()),
        };
        let event = self.provisioner.create_scheduled_meeting(user_id, &meeting).await?;
        Ok((event, duration))
    }
}

/// IANA zone for `name`; blank or missing means UTC.
pub fn resolve_timezone(name: Option<&str>) -> Result<Tz> {
    let name = name.map(str::trim).filter(|value| !value.is_empty()).unwrap_or(DEFAULT_TIMEZONE);
    Tz::from_str(name).map_err(|_| AcelabError::InvalidInput(format!("unknown timezone: {name}")))
}

/// Parse a start time. Values with an offset are taken as-is; naive values
/// are wall-clock time in `timezone`.
pub fn parse_start_time(raw: &str, timezone: Tz) -> Result<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .ok_or_else(|| AcelabError::InvalidInput(format!("invalid start_time: {raw}")))?;

    timezone
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| {
            AcelabError::InvalidInput(format!("start_time {raw} does not exist in {timezone}"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naive_start_is_interpreted_in_timezone() {
        let tz = resolve_timezone(Some("America/New_York")).unwrap();
        let start = parse_start_time("2026-01-15T09:30", tz).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 1, 15, 14, 30, 0).unwrap());
    }

    #[test]
    fn offset_start_ignores_timezone() {
        let tz = resolve_timezone(Some("Asia/Tokyo")).unwrap();
        let start = parse_start_time("2026-03-01T10:00:00+01:00", tz).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap());
    }

    #[test]
    fn missing_or_blank_timezone_is_utc() {
        assert_eq!(resolve_timezone(None).unwrap(), Tz::UTC);
        assert_eq!(resolve_timezone(Some("  ")).unwrap(), Tz::UTC);
    }

    #[test]
    fn unknown_timezone_is_invalid_input() {
        let err = resolve_timezone(Some("Mars/Olympus")).unwrap_err();
        assert!(matches!(err, AcelabError::InvalidInput(_)));
    }

    #[test]
    fn skipped_local_time_is_rejected() {
        // 02:30 does not exist on the US spring-forward date.
        let tz = resolve_timezone(Some("America/New_York")).unwrap();
        let err = parse_start_time("2026-03-08 02:30", tz).unwrap_err();
        assert!(matches!(err, AcelabError::InvalidInput(_)));
    }

    #[test]
    fn garbage_start_is_rejected() {
        assert!(parse_start_time("next tuesday", Tz::UTC).is_err());
    }
}
