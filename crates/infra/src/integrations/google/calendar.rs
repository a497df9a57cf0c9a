//! Google Calendar v3 client

use acelab_core::CalendarApi;
use acelab_domain::{AcelabError, CreatedCalendarEvent, GoogleConfig, NewCalendarEvent, Result};
use async_trait::async_trait;
use reqwest::{Method, Response};
use tracing::{debug, instrument};

use super::types::{EventInsertRequest, EventResponse};
use crate::http::HttpClient;

/// Google implementation of `CalendarApi`
///
/// Inserts are sent once (a retried insert could create a second event);
/// deletes go through the retrying client.
pub struct GoogleCalendarClient {
    http: HttpClient,
    base_url: String,
    calendar_id: String,
}

impl GoogleCalendarClient {
    pub fn new(config: &GoogleConfig, http: HttpClient) -> Self {
        Self {
            http,
            base_url: config.calendar_api_base.trim_end_matches('/').to_string(),
            calendar_id: config.calendar_id.clone(),
        }
    }

    fn events_url(&self) -> String {
        format!("{}/calendars/{}/events", self.base_url, urlencoding::encode(&self.calendar_id))
    }
}

#[async_trait]
impl CalendarApi for GoogleCalendarClient {
    #[instrument(skip(self, access_token, event), fields(attendees = event.attendees.len()))]
    async fn insert_event(
        &self,
        access_token: &str,
        event: &NewCalendarEvent,
    ) -> Result<CreatedCalendarEvent> {
        let mut query = vec![("conferenceDataVersion", "1")];
        if event.send_updates {
            query.push(("sendUpdates", "all"));
        }

        let request = self
            .http
            .request(Method::POST, self.events_url())
            .bearer_auth(access_token)
            .query(&query)
            .json(&EventInsertRequest::from(event));
        let response = ensure_success(self.http.send_once(request).await?).await?;

        let created: EventResponse = response.json().await.map_err(|err| {
            AcelabError::ProviderApi(format!("Failed to parse Google Calendar response: {err}"))
        })?;
        debug!(event_id = %created.id, "calendar event inserted");

        Ok(CreatedCalendarEvent { meeting_link: created.meeting_link(), event_id: created.id })
    }

    #[instrument(skip(self, access_token))]
    async fn delete_event(&self, access_token: &str, event_id: &str) -> Result<()> {
        let url = format!("{}/{}", self.events_url(), urlencoding::encode(event_id));
        let request = self.http.request(Method::DELETE, url).bearer_auth(access_token);

        ensure_success(self.http.send(request).await?).await?;
        Ok(())
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
    Err(AcelabError::ProviderApi(format!("Google Calendar API error ({status}): {body}")))
}
