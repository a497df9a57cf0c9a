//! Database implementations

pub mod grant_repository;
pub mod lesson_repository;
pub mod manager;

pub use grant_repository::SqlCipherGrantRepository;
pub use lesson_repository::SqlCipherLessonRepository;
pub use manager::DbManager;
