//! Port interfaces for lesson meeting links

use acelab_domain::{Lesson, LessonMeetingLink, Result};
use async_trait::async_trait;

/// Lesson storage as seen by the meeting flow
#[async_trait]
pub trait LessonRepository: Send + Sync {
    /// Lesson by id, regardless of owner.
    async fn find_lesson(&self, lesson_id: i64) -> Result<Option<Lesson>>;

    /// Emails of students enrolled in the course, in enrollment order.
    async fn enrolled_student_emails(&self, course_id: i64) -> Result<Vec<String>>;

    /// Write the meeting fields and mark the lesson scheduled.
    async fn link_meeting(&self, lesson_id: i64, link: &LessonMeetingLink) -> Result<Lesson>;

    /// Clear the meeting fields and mark the lesson cancelled.
    async fn clear_meeting(&self, lesson_id: i64) -> Result<Lesson>;
}
