//! Lesson repository implementation using SQLCipher

use std::sync::Arc;

use acelab_core::LessonRepository;
use acelab_domain::{
    AcelabError, Lesson, LessonMeetingLink, LessonStatus, MeetingType, Result as DomainResult,
};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tokio::task;
use tracing::instrument;

use super::grant_repository::from_unix;
use super::manager::{map_join_error, map_sql_error, DbManager};

const SELECT_LESSON: &str = "SELECT id, course_id, tutor_id, title, meeting_link, start_time,
                                    duration, status, meeting_type, google_event_id,
                                    notifications_sent
                             FROM lessons WHERE id = ?1";

/// SQLCipher-backed implementation of `LessonRepository`
pub struct SqlCipherLessonRepository {
    db: Arc<DbManager>,
}

impl SqlCipherLessonRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// Insert a lesson row (used by seeding and tests; lesson CRUD lives
    /// elsewhere). Returns the new id.
    pub async fn insert_lesson(&self, course_id: i64, tutor_id: i64, title: &str) -> DomainResult<i64> {
        let db = Arc::clone(&self.db);
        let title = title.to_string();

        task::spawn_blocking(move || -> DomainResult<i64> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO lessons (course_id, tutor_id, title) VALUES (?1, ?2, ?3)",
                params![course_id, tutor_id, title],
            )
            .map_err(map_sql_error)?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_join_error)?
    }

    /// Enroll a student email in a course. Re-enrolling is a no-op.
    pub async fn enroll_student(&self, course_id: i64, student_email: &str) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let email = student_email.to_string();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT OR IGNORE INTO lesson_enrollments (course_id, student_email) VALUES (?1, ?2)",
                params![course_id, email],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl LessonRepository for SqlCipherLessonRepository {
    #[instrument(skip(self))]
    async fn find_lesson(&self, lesson_id: i64) -> DomainResult<Option<Lesson>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Option<Lesson>> {
            let conn = db.get_connection()?;
            conn.query_row(SELECT_LESSON, params![lesson_id], map_lesson_row)
                .optional()
                .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self))]
    async fn enrolled_student_emails(&self, course_id: i64) -> DomainResult<Vec<String>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<String>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(
                    "SELECT student_email FROM lesson_enrollments
                     WHERE course_id = ?1 ORDER BY enrolled_at, id",
                )
                .map_err(map_sql_error)?;
            let emails = stmt
                .query_map(params![course_id], |row| row.get::<_, String>(0))
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;
            Ok(emails)
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self, link), fields(event_id = %link.google_event_id))]
    async fn link_meeting(&self, lesson_id: i64, link: &LessonMeetingLink) -> DomainResult<Lesson> {
        let db = Arc::clone(&self.db);
        let link = link.clone();

        task::spawn_blocking(move || -> DomainResult<Lesson> {
            let conn = db.get_connection()?;
            let updated = conn
                .execute(
                    "UPDATE lessons
                     SET meeting_link = ?1, google_event_id = ?2, meeting_type = ?3,
                         start_time = ?4, duration = ?5, status = ?6, updated_at = ?7
                     WHERE id = ?8",
                    params![
                        link.meeting_link,
                        link.google_event_id,
                        link.meeting_type.as_str(),
                        link.start_time.timestamp(),
                        link.duration,
                        LessonStatus::Scheduled.as_str(),
                        Utc::now().timestamp(),
                        lesson_id,
                    ],
                )
                .map_err(map_sql_error)?;
            reload(&conn, lesson_id, updated)
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self))]
    async fn clear_meeting(&self, lesson_id: i64) -> DomainResult<Lesson> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Lesson> {
            let conn = db.get_connection()?;
            let updated = conn
                .execute(
                    "UPDATE lessons
                     SET meeting_link = NULL, google_event_id = NULL, status = ?1, updated_at = ?2
                     WHERE id = ?3",
                    params![LessonStatus::Cancelled.as_str(), Utc::now().timestamp(), lesson_id],
                )
                .map_err(map_sql_error)?;
            reload(&conn, lesson_id, updated)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn reload(conn: &Connection, lesson_id: i64, updated: usize) -> DomainResult<Lesson> {
    if updated == 0 {
        return Err(AcelabError::NotFound(format!("lesson {lesson_id}")));
    }
    conn.query_row(SELECT_LESSON, params![lesson_id], map_lesson_row).map_err(map_sql_error)
}

fn map_lesson_row(row: &Row<'_>) -> rusqlite::Result<Lesson> {
    let status: String = row.get(7)?;
    let meeting_type: Option<String> = row.get(8)?;

    Ok(Lesson {
        id: row.get(0)?,
        course_id: row.get(1)?,
        tutor_id: row.get(2)?,
        title: row.get(3)?,
        meeting_link: row.get(4)?,
        start_time: row.get::<_, Option<i64>>(5)?.map(from_unix),
        duration: row.get(6)?,
        status: parse_column(7, &status)?,
        meeting_type: meeting_type.map(|value| parse_column::<MeetingType>(8, &value)).transpose()?,
        google_event_id: row.get(9)?,
        notifications_sent: row.get(10)?,
    })
}

fn parse_column<T>(index: usize, value: &str) -> rusqlite::Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    value.parse::<T>().map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(index, Type::Text, err.into())
    })
}
