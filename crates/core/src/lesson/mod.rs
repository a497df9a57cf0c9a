//! Live-class meetings attached to course lessons

pub mod ports;
pub mod service;

pub use ports::LessonRepository;
pub use service::{parse_start_time, resolve_timezone, LessonMeetingService};
