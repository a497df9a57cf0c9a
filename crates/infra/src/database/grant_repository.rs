//! OAuth grant repository implementation using SQLCipher
//!
//! Grants live in `google_grants`, one row per user. Timestamps are stored
//! as unix seconds.

use std::sync::Arc;

use acelab_core::GrantRepository;
use acelab_domain::{OAuthGrant, Result as DomainResult, UserId};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{params, OptionalExtension, Row};
use tokio::task;
use tracing::{debug, instrument};

use super::manager::{map_join_error, map_sql_error, DbManager};

const SELECT_GRANT: &str = "SELECT user_id, google_email, access_token, refresh_token,
                                   expires_at, created_at, updated_at
                            FROM google_grants WHERE user_id = ?1";

/// SQLCipher-backed implementation of `GrantRepository`
pub struct SqlCipherGrantRepository {
    db: Arc<DbManager>,
}

impl SqlCipherGrantRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GrantRepository for SqlCipherGrantRepository {
    #[instrument(skip(self))]
    async fn find_grant(&self, user_id: UserId) -> DomainResult<Option<OAuthGrant>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Option<OAuthGrant>> {
            let conn = db.get_connection()?;
            conn.query_row(SELECT_GRANT, params![user_id.get()], map_grant_row)
                .optional()
                .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    /// Insert or overwrite by `user_id`. A response without a refresh token
    /// keeps the previously stored one.
    #[instrument(skip(self, grant), fields(user_id = %grant.user_id))]
    async fn upsert_grant(&self, grant: OAuthGrant) -> DomainResult<OAuthGrant> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<OAuthGrant> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO google_grants (
                    user_id, google_email, access_token, refresh_token,
                    expires_at, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ON CONFLICT(user_id) DO UPDATE SET
                    google_email = excluded.google_email,
                    access_token = excluded.access_token,
                    refresh_token = COALESCE(excluded.refresh_token, google_grants.refresh_token),
                    expires_at = excluded.expires_at,
                    updated_at = excluded.updated_at",
                params![
                    grant.user_id.get(),
                    grant.google_email,
                    grant.access_token,
                    grant.refresh_token(),
                    grant.expires_at.timestamp(),
                    grant.created_at.timestamp(),
                    grant.updated_at.timestamp(),
                ],
            )
            .map_err(map_sql_error)?;

            debug!("grant row written");
            conn.query_row(SELECT_GRANT, params![grant.user_id.get()], map_grant_row)
                .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self, access_token))]
    async fn update_access_token(
        &self,
        user_id: UserId,
        access_token: &str,
        expires_at: DateTime<Utc>,
    ) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let access_token = access_token.to_string();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            let updated = conn
                .execute(
                    "UPDATE google_grants
                     SET access_token = ?1, expires_at = ?2, updated_at = ?3
                     WHERE user_id = ?4",
                    params![access_token, expires_at.timestamp(), Utc::now().timestamp(), user_id.get()],
                )
                .map_err(map_sql_error)?;

            if updated == 0 {
                return Err(acelab_domain::AcelabError::NotConnected(format!("user {user_id}")));
            }
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self))]
    async fn delete_grant(&self, user_id: UserId) -> DomainResult<bool> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<bool> {
            let conn = db.get_connection()?;
            let deleted = conn
                .execute("DELETE FROM google_grants WHERE user_id = ?1", params![user_id.get()])
                .map_err(map_sql_error)?;
            Ok(deleted > 0)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn map_grant_row(row: &Row<'_>) -> rusqlite::Result<OAuthGrant> {
    Ok(OAuthGrant {
        user_id: UserId(row.get(0)?),
        google_email: row.get(1)?,
        access_token: row.get(2)?,
        refresh_token: row.get(3)?,
        expires_at: from_unix(row.get(4)?),
        created_at: from_unix(row.get(5)?),
        updated_at: from_unix(row.get(6)?),
    })
}

/// Unix seconds to UTC; out-of-range values clamp to the epoch.
pub(crate) fn from_unix(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(seconds, 0).single().unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}
