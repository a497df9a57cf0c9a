//! In-memory repository mocks
//!
//! Both mocks keep their rows behind `Arc<Mutex<…>>` and count writes so
//! tests can assert that a failed flow persisted nothing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use acelab_core::{GrantRepository, LessonRepository};
use acelab_domain::{
    AcelabError, Lesson, LessonMeetingLink, LessonStatus, OAuthGrant, Result as DomainResult,
    UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// In-memory `GrantRepository` keyed by user id.
#[derive(Default)]
pub struct MockGrantRepository {
    grants: Arc<Mutex<HashMap<UserId, OAuthGrant>>>,
    upserts: AtomicUsize,
    token_updates: AtomicUsize,
}

impl MockGrantRepository {
    pub fn insert(&self, grant: OAuthGrant) {
        self.grants.lock().unwrap().insert(grant.user_id, grant);
    }

    pub fn get(&self, user_id: UserId) -> Option<OAuthGrant> {
        self.grants.lock().unwrap().get(&user_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.grants.lock().unwrap().len()
    }

    pub fn upsert_count(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }

    pub fn token_update_count(&self) -> usize {
        self.token_updates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GrantRepository for MockGrantRepository {
    async fn find_grant(&self, user_id: UserId) -> DomainResult<Option<OAuthGrant>> {
        Ok(self.get(user_id))
    }

    async fn upsert_grant(&self, grant: OAuthGrant) -> DomainResult<OAuthGrant> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        let mut grants = self.grants.lock().unwrap();
        let stored = match grants.get(&grant.user_id) {
            Some(existing) => OAuthGrant { created_at: existing.created_at, ..grant },
            None => grant,
        };
        grants.insert(stored.user_id, stored.clone());
        Ok(stored)
    }

    async fn update_access_token(
        &self,
        user_id: UserId,
        access_token: &str,
        expires_at: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.token_updates.fetch_add(1, Ordering::SeqCst);
        let mut grants = self.grants.lock().unwrap();
        let grant = grants
            .get_mut(&user_id)
            .ok_or_else(|| AcelabError::NotFound(format!("grant for user {user_id}")))?;
        grant.access_token = access_token.to_string();
        grant.expires_at = expires_at;
        grant.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_grant(&self, user_id: UserId) -> DomainResult<bool> {
        Ok(self.grants.lock().unwrap().remove(&user_id).is_some())
    }
}

/// In-memory `LessonRepository` with per-course enrollment lists.
#[derive(Default)]
pub struct MockLessonRepository {
    lessons: Arc<Mutex<HashMap<i64, Lesson>>>,
    enrollments: Arc<Mutex<HashMap<i64, Vec<String>>>>,
    writes: AtomicUsize,
}

impl MockLessonRepository {
    pub fn insert(&self, lesson: Lesson) {
        self.lessons.lock().unwrap().insert(lesson.id, lesson);
    }

    pub fn enroll(&self, course_id: i64, email: &str) {
        self.enrollments.lock().unwrap().entry(course_id).or_default().push(email.to_string());
    }

    pub fn get(&self, lesson_id: i64) -> Option<Lesson> {
        self.lessons.lock().unwrap().get(&lesson_id).cloned()
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn update<F>(&self, lesson_id: i64, apply: F) -> DomainResult<Lesson>
    where
        F: FnOnce(&mut Lesson),
    {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut lessons = self.lessons.lock().unwrap();
        let lesson = lessons
            .get_mut(&lesson_id)
            .ok_or_else(|| AcelabError::NotFound(format!("lesson {lesson_id}")))?;
        apply(lesson);
        Ok(lesson.clone())
    }
}

#[async_trait]
impl LessonRepository for MockLessonRepository {
    async fn find_lesson(&self, lesson_id: i64) -> DomainResult<Option<Lesson>> {
        Ok(self.get(lesson_id))
    }

    async fn enrolled_student_emails(&self, course_id: i64) -> DomainResult<Vec<String>> {
        Ok(self.enrollments.lock().unwrap().get(&course_id).cloned().unwrap_or_default())
    }

    async fn link_meeting(&self, lesson_id: i64, link: &LessonMeetingLink) -> DomainResult<Lesson> {
        self.update(lesson_id, |lesson| {
            lesson.meeting_link = Some(link.meeting_link.clone());
            lesson.google_event_id = Some(link.google_event_id.clone());
            lesson.meeting_type = Some(link.meeting_type);
            lesson.start_time = Some(link.start_time);
            lesson.duration = Some(link.duration);
            lesson.status = LessonStatus::Scheduled;
        })
    }

    async fn clear_meeting(&self, lesson_id: i64) -> DomainResult<Lesson> {
        self.update(lesson_id, |lesson| {
            lesson.meeting_link = None;
            lesson.google_event_id = None;
            lesson.status = LessonStatus::Cancelled;
        })
    }
}
