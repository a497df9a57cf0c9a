//! Domain types and models

pub mod grant;
pub mod lesson;
pub mod meeting;

pub use grant::{ConnectionStatus, OAuthGrant, TokenStatus, UserId};
pub use lesson::{Lesson, LessonMeetingLink, LessonMeetingRequest, LessonStatus};
pub use meeting::{CreatedCalendarEvent, MeetingEvent, MeetingType, NewCalendarEvent, ScheduledMeeting};
