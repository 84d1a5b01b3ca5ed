use super::models::{DiscoveryDocument, EventResource, InsertedEvent};
use crate::error::{api_client_error, google_calendar_error, CalResult};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

/// Remote calendar writes
#[async_trait]
pub trait CalendarApi: Send + Sync {
    /// Insert one event into `calendar_id`
    async fn insert_event(
        &self,
        calendar_id: &str,
        access_token: &str,
        event: &EventResource,
    ) -> CalResult<InsertedEvent>;
}

/// Calendar v3 REST client
#[derive(Debug, Clone)]
pub struct HttpCalendarApi {
    client: Client,
    base_url: String,
}

impl HttpCalendarApi {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { client, base_url }
    }

    /// Build a client from the Calendar discovery document at `discovery_url`
    pub async fn load(client: Client, discovery_url: &str) -> CalResult<Self> {
        info!("Loading Google Calendar API client");

        let response = client
            .get(discovery_url)
            .send()
            .await
            .map_err(|e| api_client_error(&format!("Failed to fetch discovery document: {}", e)))?;

        if !response.status().is_success() {
            return Err(api_client_error(&format!(
                "Failed to fetch discovery document: HTTP {}",
                response.status()
            )));
        }

        let doc: DiscoveryDocument = response
            .json()
            .await
            .map_err(|e| api_client_error(&format!("Invalid discovery document: {}", e)))?;

        debug!("Calendar API base URL: {}", doc.base_url());
        Ok(Self::new(client, doc.base_url()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl CalendarApi for HttpCalendarApi {
    async fn insert_event(
        &self,
        calendar_id: &str,
        access_token: &str,
        event: &EventResource,
    ) -> CalResult<InsertedEvent> {
        let url = format!(
            "{}calendars/{}/events",
            self.base_url,
            urlencoding::encode(calendar_id)
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .json(event)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to insert event: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to insert event: HTTP {} - {}",
                status, error_body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse insert response: {}", e)))
    }
}
