//! Google Calendar v3 and userinfo wire types

use acelab_domain::constants::{ATTENDEE_RESPONSE_STATUS, CONFERENCE_SOLUTION_TYPE};
use acelab_domain::NewCalendarEvent;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Body of `events.insert`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInsertRequest {
    pub summary: String,
    pub description: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attendees: Vec<EventAttendee>,
    pub conference_data: ConferenceDataRequest,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    pub date_time: String,
    pub time_zone: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAttendee {
    pub email: String,
    pub response_status: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceDataRequest {
    pub create_request: CreateConferenceRequest,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConferenceRequest {
    pub request_id: String,
    pub conference_solution_key: ConferenceSolutionKey,
}

#[derive(Debug, Serialize)]
pub struct ConferenceSolutionKey {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl EventDateTime {
    fn new(instant: DateTime<Utc>, time_zone: &str) -> Self {
        Self {
            date_time: instant.to_rfc3339_opts(SecondsFormat::Secs, true),
            time_zone: time_zone.to_string(),
        }
    }
}

impl From<&NewCalendarEvent> for EventInsertRequest {
    fn from(event: &NewCalendarEvent) -> Self {
        Self {
            summary: event.summary.clone(),
            description: event.description.clone(),
            start: EventDateTime::new(event.start, &event.timezone),
            end: EventDateTime::new(event.end, &event.timezone),
            attendees: event
                .attendees
                .iter()
                .map(|email| EventAttendee {
                    email: email.clone(),
                    response_status: ATTENDEE_RESPONSE_STATUS,
                })
                .collect(),
            conference_data: ConferenceDataRequest {
                create_request: CreateConferenceRequest {
                    request_id: event.conference_request_id.clone(),
                    conference_solution_key: ConferenceSolutionKey {
                        kind: CONFERENCE_SOLUTION_TYPE,
                    },
                },
            },
        }
    }
}

/// The parts of an inserted event we read back.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: String,
    pub hangout_link: Option<String>,
    pub conference_data: Option<ConferenceData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceData {
    #[serde(default)]
    pub entry_points: Vec<EntryPoint>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPoint {
    pub entry_point_type: Option<String>,
    pub uri: Option<String>,
}

impl EventResponse {
    /// `hangoutLink`, else the first conference entry point URI.
    pub fn meeting_link(&self) -> Option<String> {
        let non_empty = |value: &Option<String>| value.as_deref().filter(|v| !v.is_empty()).map(str::to_string);

        non_empty(&self.hangout_link).or_else(|| {
            self.conference_data
                .as_ref()
                .and_then(|data| data.entry_points.iter().find_map(|entry| non_empty(&entry.uri)))
        })
    }
}

/// `GET /oauth2/v2/userinfo` response.
#[derive(Debug, Deserialize)]
pub struct UserInfo {
    pub email: Option<String>,
}
