//! Meeting provisioner - OAuth grant lifecycle and calendar event creation

use std::collections::HashSet;
use std::sync::Arc;

use acelab_common::auth::StateCodec;
use acelab_domain::constants::{DEFAULT_TIMEZONE, INSTANT_MEETING_DURATION_MINUTES};
use acelab_domain::{
    AcelabError, ConnectionStatus, MeetingEvent, NewCalendarEvent, OAuthGrant, Result,
    ScheduledMeeting, TokenStatus, UserId,
};
use chrono::{DateTime, TimeDelta, Utc};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::ports::{CalendarApi, GrantRepository, OAuthProvider};

/// Turns meeting requests into calendar events with a video link, acting
/// with the organizer's stored Google grant.
pub struct MeetingProvisioner {
    grants: Arc<dyn GrantRepository>,
    oauth: Arc<dyn OAuthProvider>,
    calendar: Arc<dyn CalendarApi>,
    state_codec: StateCodec,
}

impl MeetingProvisioner {
    /// Create a provisioner with an unsigned state codec.
    pub fn new(
        grants: Arc<dyn GrantRepository>,
        oauth: Arc<dyn OAuthProvider>,
        calendar: Arc<dyn CalendarApi>,
    ) -> Self {
        Self { grants, oauth, calendar, state_codec: StateCodec::unsigned() }
    }

    /// Use `codec` for OAuth state tokens.
    #[must_use]
    pub fn with_state_codec(mut self, codec: StateCodec) -> Self {
        self.state_codec = codec;
        self
    }

    /// Consent URL whose state carries `user_id`.
    pub fn get_authorization_url(&self, user_id: UserId) -> Result<String> {
        let state = self
            .state_codec
            .encode(user_id.get())
            .map_err(|err| AcelabError::Security(err.to_string()))?;
        Ok(self.oauth.authorization_url(&state))
    }

    /// Finish the consent flow: verify state, exchange the code, look up the
    /// account email and store the grant.
    ///
    /// Nothing is persisted unless every step succeeds.
    #[instrument(skip(self, code, state))]
    pub async fn complete_authorization(&self, code: &str, state: &str) -> Result<OAuthGrant> {
        let payload = self
            .state_codec
            .decode(state)
            .map_err(|err| AcelabError::InvalidState(err.to_string()))?;
        let user_id = UserId(payload.user_id);

        let tokens = self.oauth.exchange_code(code).await?;
        let email = self.oauth.fetch_user_email(&tokens.access_token).await?;

        let grant = OAuthGrant::new(
            user_id,
            Some(email),
            tokens.access_token,
            tokens.refresh_token,
            tokens.expires_at,
        );
        let stored = self.grants.upsert_grant(grant).await?;
        info!(user_id = %user_id, "Google account connected");
        Ok(stored)
    }

    /// The user's grant with a usable access token, refreshing once if the
    /// stored token has expired.
    #[instrument(skip(self))]
    pub async fn ensure_fresh_token(&self, user_id: UserId) -> Result<OAuthGrant> {
        let mut grant = self
            .grants
            .find_grant(user_id)
            .await?
            .ok_or_else(|| AcelabError::NotConnected(format!("user {user_id}")))?;

        if !grant.is_expired() {
            return Ok(grant);
        }

        let Some(refresh_token) = grant.refresh_token() else {
            warn!(user_id = %user_id, "Access token expired and no refresh token is stored");
            return Err(AcelabError::ReauthRequired(
                "access token expired and no refresh token is available".to_string(),
            ));
        };

        let tokens = self.oauth.refresh_access_token(refresh_token).await.inspect_err(|err| {
            warn!(user_id = %user_id, error = %err, "Access token refresh failed");
        })?;

        self.grants.update_access_token(user_id, &tokens.access_token, tokens.expires_at).await?;
        info!(user_id = %user_id, expires_at = %tokens.expires_at, "Access token refreshed");

        grant.access_token = tokens.access_token;
        grant.expires_at = tokens.expires_at;
        grant.updated_at = Utc::now();
        Ok(grant)
    }

    /// Meeting that starts now and runs for the default duration, in UTC.
    pub async fn create_instant_meeting(
        &self,
        user_id: UserId,
        title: &str,
        description: &str,
    ) -> Result<MeetingEvent> {
        let grant = self.ensure_fresh_token(user_id).await?;
        let start = Utc::now();
        let end = meeting_end(start, INSTANT_MEETING_DURATION_MINUTES)?;
        self.insert_meeting(&grant, title, description, start, end, &[], DEFAULT_TIMEZONE).await
    }

    /// Meeting at a caller-chosen time with invited attendees.
    pub async fn create_scheduled_meeting(
        &self,
        user_id: UserId,
        meeting: &ScheduledMeeting,
    ) -> Result<MeetingEvent> {
        if meeting.duration_minutes <= 0 {
            return Err(AcelabError::InvalidInput(format!(
                "meeting duration must be positive, got {}",
                meeting.duration_minutes
            )));
        }
        let end = meeting_end(meeting.start_time, meeting.duration_minutes)?;

        let grant = self.ensure_fresh_token(user_id).await?;
        self.insert_meeting(
            &grant,
            &meeting.title,
            &meeting.description,
            meeting.start_time,
            end,
            &meeting.attendee_emails,
            meeting.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE),
        )
        .await
    }

    /// Delete a provisioned event. Failures are logged and reported as
    /// `false`; this never returns an error.
    pub async fn delete_meeting(&self, user_id: UserId, event_id: &str) -> bool {
        match self.try_delete_meeting(user_id, event_id).await {
            Ok(()) => {
                info!(user_id = %user_id, event_id, "Calendar event deleted");
                true
            }
            Err(err) => {
                error!(user_id = %user_id, event_id, error = %err, "Failed to delete calendar event");
                false
            }
        }
    }

    /// Whether a grant is stored for the user.
    pub async fn is_connected(&self, user_id: UserId) -> Result<bool> {
        Ok(self.grants.find_grant(user_id).await?.is_some())
    }

    /// Token health, or `None` when the user never connected.
    pub async fn get_token_status(&self, user_id: UserId) -> Result<Option<TokenStatus>> {
        Ok(self.grants.find_grant(user_id).await?.map(|grant| grant.token_status()))
    }

    /// Connection summary including the Google account email.
    pub async fn get_connection(&self, user_id: UserId) -> Result<ConnectionStatus> {
        Ok(self
            .grants
            .find_grant(user_id)
            .await?
            .as_ref()
            .map_or_else(ConnectionStatus::disconnected, ConnectionStatus::from))
    }

    /// Forget the user's grant locally. The grant is not revoked at Google.
    pub async fn disconnect(&self, user_id: UserId) -> Result<bool> {
        let removed = self.grants.delete_grant(user_id).await?;
        if removed {
            info!(user_id = %user_id, "Google account disconnected");
        }
        Ok(removed)
    }

    async fn try_delete_meeting(&self, user_id: UserId, event_id: &str) -> Result<()> {
        let grant = self.ensure_fresh_token(user_id).await?;
        self.calendar.delete_event(&grant.access_token, event_id).await
    }

    #[allow(clippy::too_many_arguments)]
    async fn insert_meeting(
        &self,
        grant: &OAuthGrant,
        title: &str,
        description: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        attendee_emails: &[String],
        timezone: &str,
    ) -> Result<MeetingEvent> {
        let attendees = normalize_attendees(attendee_emails, grant.google_email.as_deref());

        let event = NewCalendarEvent {
            summary: title.to_string(),
            description: description.to_string(),
            start,
            end,
            timezone: timezone.to_string(),
            send_updates: !attendees.is_empty(),
            attendees,
            conference_request_id: Uuid::new_v4().to_string(),
        };

        let created = self.calendar.insert_event(&grant.access_token, &event).await?;
        let meeting_link = created.meeting_link.filter(|link| !link.is_empty()).ok_or_else(|| {
            AcelabError::ProviderApi(format!(
                "event {} was created without a conference link",
                created.event_id
            ))
        })?;

        info!(
            user_id = %grant.user_id,
            event_id = %created.event_id,
            attendees = event.attendees.len(),
            "Meeting provisioned"
        );

        Ok(MeetingEvent { event_id: created.event_id, meeting_link, start_time: start, end_time: end })
    }
}

/// `start + duration_minutes`, or `InvalidInput` when it leaves chrono's range.
fn meeting_end(start: DateTime<Utc>, duration_minutes: i64) -> Result<DateTime<Utc>> {
    TimeDelta::try_minutes(duration_minutes)
        .and_then(|duration| start.checked_add_signed(duration))
        .ok_or_else(|| {
            AcelabError::InvalidInput(format!("meeting duration out of range: {duration_minutes}"))
        })
}

/// Trimmed, non-empty, case-insensitively unique emails in first-seen order,
/// with the organizer appended when not already invited.
pub fn normalize_attendees(emails: &[String], organizer: Option<&str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut attendees: Vec<String> = emails
        .iter()
        .map(|email| email.trim())
        .filter(|email| !email.is_empty())
        .filter(|email| seen.insert(email.to_lowercase()))
        .map(str::to_string)
        .collect();

    if let Some(organizer) = organizer.map(str::trim).filter(|email| !email.is_empty()) {
        if seen.insert(organizer.to_lowercase()) {
            attendees.push(organizer.to_string());
        }
    }
    attendees
}
