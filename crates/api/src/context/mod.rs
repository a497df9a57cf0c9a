//! Application context - dependency injection container

use std::sync::Arc;
use std::time::Duration;

use acelab_common::auth::StateCodec;
use acelab_core::{LessonMeetingService, MeetingProvisioner};
use acelab_domain::{Config, Result};
use acelab_infra::{
    DbManager, GoogleCalendarClient, GoogleOAuthProvider, HttpClient, SqlCipherGrantRepository,
    SqlCipherLessonRepository,
};

use crate::utils::health::{ComponentHealth, HealthStatus};

/// Application context - holds all services and dependencies
///
/// Built once at startup and shared with every handler as
/// `Arc<AppContext>`.
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub provisioner: Arc<MeetingProvisioner>,
    pub lesson_meetings: Arc<LessonMeetingService>,
    pub lessons: Arc<SqlCipherLessonRepository>,
    pub grants: Arc<SqlCipherGrantRepository>,
}

impl AppContext {
    /// Open the database, apply migrations and wire the Google adapters.
    ///
    /// # Errors
    /// Fails when the database cannot be opened with the configured key or
    /// the HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        let db = Arc::new(DbManager::new(
            &config.database.path,
            config.database.pool_size,
            config.database.encryption_key.as_deref(),
        )?);
        db.run_migrations()?;

        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.google.request_timeout_secs))
            .user_agent(config.google.application_name.clone())
            .build()?;

        let grants = Arc::new(SqlCipherGrantRepository::new(Arc::clone(&db)));
        let lessons = Arc::new(SqlCipherLessonRepository::new(Arc::clone(&db)));

        let codec = StateCodec::from_secret(config.google.state_secret.as_deref());
        if !codec.is_signed() {
            tracing::warn!("GOOGLE_STATE_SECRET not set; OAuth state tokens are unsigned");
        }

        let provisioner = Arc::new(
            MeetingProvisioner::new(
                grants.clone(),
                Arc::new(GoogleOAuthProvider::new(&config.google, http.clone())),
                Arc::new(GoogleCalendarClient::new(&config.google, http)),
            )
            .with_state_codec(codec),
        );
        let lesson_meetings =
            Arc::new(LessonMeetingService::new(Arc::clone(&provisioner), lessons.clone()));

        tracing::info!(
            db_path = %config.database.path,
            calendar_id = %config.google.calendar_id,
            "application context initialised"
        );

        Ok(Self { config, db, provisioner, lesson_meetings, lessons, grants })
    }

    /// Check health of all application components
    pub async fn health_check(&self) -> HealthStatus {
        let db = Arc::clone(&self.db);
        let database = match tokio::task::spawn_blocking(move || db.health_check()).await {
            Ok(Ok(())) => ComponentHealth::healthy("database"),
            Ok(Err(err)) => ComponentHealth::unhealthy("database", err.to_string()),
            Err(err) => ComponentHealth::unhealthy("database", err.to_string()),
        };

        HealthStatus::new().add_component(database).evaluate()
    }
}
