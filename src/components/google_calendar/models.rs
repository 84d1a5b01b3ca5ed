use crate::components::schedule::CalendarEvent;
use crate::utils::time::to_iso_string;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Google's alias for the user's main calendar
pub const PRIMARY_CALENDAR_ID: &str = "primary";

pub const SYNC_DESCRIPTION: &str = "Synced from Sports Calendar App";

/// Start/end of an event in the Calendar API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDateTime {
    #[serde(rename = "dateTime")]
    pub date_time: String,
}

/// Request body of an `events.insert` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventResource {
    pub summary: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
    pub description: String,
}

impl From<&CalendarEvent> for EventResource {
    fn from(event: &CalendarEvent) -> Self {
        Self {
            summary: event.title.clone(),
            start: EventDateTime {
                date_time: to_iso_string(&event.start),
            },
            end: EventDateTime {
                date_time: to_iso_string(&event.end),
            },
            description: SYNC_DESCRIPTION.to_string(),
        }
    }
}

/// The parts of an inserted event we keep
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct InsertedEvent {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "htmlLink")]
    pub html_link: Option<String>,
}

/// Short-lived OAuth access token
#[derive(Debug, Clone, PartialEq)]
pub struct AccessToken {
    pub access_token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Whether the token can still be used at `now`, with a minute of slack
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at - Duration::seconds(60) > now,
            None => true,
        }
    }
}

/// Token endpoint response
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub expires_in: Option<i64>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// The fields of the Calendar discovery document we need
#[derive(Debug, Deserialize)]
pub struct DiscoveryDocument {
    #[serde(rename = "rootUrl")]
    pub root_url: String,
    #[serde(rename = "servicePath")]
    pub service_path: String,
}

impl DiscoveryDocument {
    /// REST base URL, always ending in `/`
    pub fn base_url(&self) -> String {
        let mut base = format!("{}{}", self.root_url, self.service_path);
        if !base.ends_with('/') {
            base.push('/');
        }
        base
    }
}
