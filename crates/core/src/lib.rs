//! # Acelab Core
//!
//! Business logic for Google Meet provisioning - no infrastructure
//! dependencies.
//!
//! This crate contains:
//! - Port interfaces (traits) for grant storage, OAuth and the calendar
//! - `MeetingProvisioner`: grant lifecycle and meeting creation
//! - `LessonMeetingService`: attaching meetings to course lessons
//!
//! ## Architecture Principles
//! - Depends only on `acelab-common` and `acelab-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits

pub mod lesson;
pub mod meeting;

pub use lesson::{LessonMeetingService, LessonRepository};
pub use meeting::{CalendarApi, GrantRepository, MeetingProvisioner, OAuthProvider};
