//! Shared test helpers for `acelab-core` integration tests.
//!
//! In-memory port implementations with call counters, plus fixtures for
//! grants and lessons, so service tests can assert on provider traffic.

#![allow(dead_code)]

pub mod providers;
pub mod repositories;

use std::sync::Arc;

use acelab_common::auth::StateCodec;
use acelab_core::{LessonMeetingService, MeetingProvisioner};
use acelab_domain::{Lesson, LessonStatus, OAuthGrant, UserId};
use chrono::{Duration, Utc};

pub use providers::{MockCalendarApi, MockOAuthProvider};
pub use repositories::{MockGrantRepository, MockLessonRepository};

pub const TUTOR: UserId = UserId(42);
pub const TUTOR_EMAIL: &str = "tutor@example.com";

/// Grant for [`TUTOR`] expiring `expires_in` from now.
pub fn grant(expires_in: Duration, refresh_token: Option<&str>) -> OAuthGrant {
    OAuthGrant::new(
        TUTOR,
        Some(TUTOR_EMAIL.to_string()),
        "ya29.stored".to_string(),
        refresh_token.map(str::to_string),
        Utc::now() + expires_in,
    )
}

pub fn lesson(id: i64, course_id: i64, tutor: UserId) -> Lesson {
    Lesson {
        id,
        course_id,
        tutor_id: tutor.get(),
        title: "Algebra II".to_string(),
        meeting_link: None,
        start_time: None,
        duration: None,
        status: LessonStatus::Scheduled,
        meeting_type: None,
        google_event_id: None,
        notifications_sent: false,
    }
}

/// Provisioner wired to fresh mocks.
pub struct Harness {
    pub grants: Arc<MockGrantRepository>,
    pub oauth: Arc<MockOAuthProvider>,
    pub calendar: Arc<MockCalendarApi>,
    pub lessons: Arc<MockLessonRepository>,
    pub provisioner: Arc<MeetingProvisioner>,
    pub lesson_service: LessonMeetingService,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_codec(StateCodec::unsigned())
    }

    pub fn with_codec(codec: StateCodec) -> Self {
        let grants = Arc::new(MockGrantRepository::default());
        let oauth = Arc::new(MockOAuthProvider::default());
        let calendar = Arc::new(MockCalendarApi::default());
        let lessons = Arc::new(MockLessonRepository::default());

        let provisioner = Arc::new(
            MeetingProvisioner::new(grants.clone(), oauth.clone(), calendar.clone())
                .with_state_codec(codec),
        );
        let lesson_service = LessonMeetingService::new(provisioner.clone(), lessons.clone());

        Self { grants, oauth, calendar, lessons, provisioner, lesson_service }
    }

    /// Harness whose tutor already holds `grant`.
    pub fn connected(grant: OAuthGrant) -> Self {
        let harness = Self::new();
        harness.grants.insert(grant);
        harness
    }
}
