use super::api::{CalendarApi, HttpCalendarApi};
use super::models::{AccessToken, EventResource, InsertedEvent, PRIMARY_CALENDAR_ID};
use super::notifications::{
    Notification, Notifier, API_NOT_INITIALIZED_MESSAGE, SYNC_FAILURE_MESSAGE,
    SYNC_SUCCESS_MESSAGE,
};
use super::token::{OAuthSettings, OAuthTokenClient, TokenClient};
use crate::components::schedule::CalendarEvent;
use crate::config::Config;
use crate::error::{CalResult, Error};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, error, info};

/// Loads the two Google clients a session needs
#[async_trait]
pub trait GoogleServices: Send + Sync {
    /// Load the Calendar REST client
    async fn load_api_client(&self) -> CalResult<Arc<dyn CalendarApi>>;

    /// Set up the OAuth token client
    async fn init_token_client(&self) -> CalResult<Arc<dyn TokenClient>>;
}

/// Production services talking to Google over HTTP
#[derive(Debug, Clone)]
pub struct HttpGoogleServices {
    config: Config,
    client: Client,
}

impl HttpGoogleServices {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl GoogleServices for HttpGoogleServices {
    async fn load_api_client(&self) -> CalResult<Arc<dyn CalendarApi>> {
        let api =
            HttpCalendarApi::load(self.client.clone(), &self.config.endpoints.discovery_url).await?;
        Ok(Arc::new(api))
    }

    async fn init_token_client(&self) -> CalResult<Arc<dyn TokenClient>> {
        let settings = OAuthSettings::from_config(&self.config)?;
        Ok(Arc::new(OAuthTokenClient::new(settings, self.client.clone())))
    }
}

/// Where a session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Uninitialized,
    Initializing,
    Ready,
    /// Waiting on the user's consent
    SigningIn,
}

/// Events created by one sync, in input order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SyncReport {
    pub inserted: Vec<InsertedEvent>,
}

/// Counts callers inside a phase for as long as the guard lives
struct PhaseGuard<'a>(&'a AtomicUsize);

impl<'a> PhaseGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Authenticated, sequential export of events into the primary Google calendar.
///
/// Both clients are loaded at most once per session; concurrent callers of
/// [`ensure_initialized`](Self::ensure_initialized) wait on the same load.
/// A failed load leaves its slot empty, so a later call tries again.
pub struct GoogleSyncSession {
    services: Arc<dyn GoogleServices>,
    api: OnceCell<Arc<dyn CalendarApi>>,
    tokens: OnceCell<Arc<dyn TokenClient>>,
    access_token: Mutex<Option<AccessToken>>,
    initializing: AtomicUsize,
    signing_in: AtomicUsize,
}

impl fmt::Debug for GoogleSyncSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleSyncSession")
            .field("state", &self.state())
            .finish()
    }
}

impl GoogleSyncSession {
    pub fn new(services: Arc<dyn GoogleServices>) -> Self {
        Self {
            services,
            api: OnceCell::new(),
            tokens: OnceCell::new(),
            access_token: Mutex::new(None),
            initializing: AtomicUsize::new(0),
            signing_in: AtomicUsize::new(0),
        }
    }

    /// Session backed by the real Google endpoints in `config`
    pub fn from_config(config: &Config) -> Self {
        Self::new(Arc::new(HttpGoogleServices::new(config.clone())))
    }

    pub fn state(&self) -> SyncState {
        if self.signing_in.load(Ordering::SeqCst) > 0 {
            SyncState::SigningIn
        } else if self.api.initialized() && self.tokens.initialized() {
            SyncState::Ready
        } else if self.initializing.load(Ordering::SeqCst) > 0 {
            SyncState::Initializing
        } else {
            SyncState::Uninitialized
        }
    }

    /// Load the API and token clients unless already loaded
    pub async fn ensure_initialized(&self) -> CalResult<()> {
        self.clients().await.map(|_| ())
    }

    async fn clients(&self) -> CalResult<(Arc<dyn CalendarApi>, Arc<dyn TokenClient>)> {
        let _phase = PhaseGuard::enter(&self.initializing);

        let api = self
            .api
            .get_or_try_init(|| self.services.load_api_client())
            .await?
            .clone();
        let tokens = self
            .tokens
            .get_or_try_init(|| self.services.init_token_client())
            .await?
            .clone();

        Ok((api, tokens))
    }

    /// Reuse the cached token while valid, otherwise ask for consent
    async fn authorize(&self, tokens: &dyn TokenClient) -> CalResult<String> {
        let mut cached = self.access_token.lock().await;

        if let Some(token) = cached.as_ref().filter(|t| t.is_valid_at(Utc::now())) {
            debug!("Reusing cached access token");
            return Ok(token.access_token.clone());
        }

        let _phase = PhaseGuard::enter(&self.signing_in);
        info!("Requesting access to Google Calendar");
        let token = tokens.request_access_token().await?;
        let value = token.access_token.clone();
        *cached = Some(token);
        Ok(value)
    }

    /// Sign in if needed, then insert `events` one at a time, in order.
    ///
    /// Stops at the first failed insert. Events inserted before it stay in
    /// the calendar; the error reports how many that was.
    pub async fn sign_in_and_insert(&self, events: &[CalendarEvent]) -> CalResult<SyncReport> {
        let (api, tokens) = self.clients().await?;
        let access_token = self.authorize(tokens.as_ref()).await?;

        let mut inserted = Vec::with_capacity(events.len());
        for event in events {
            let resource = EventResource::from(event);
            match api
                .insert_event(PRIMARY_CALENDAR_ID, &access_token, &resource)
                .await
            {
                Ok(created) => {
                    debug!("Inserted \"{}\" as {}", event.title, created.id);
                    inserted.push(created);
                }
                Err(e) => {
                    return Err(Error::CalendarInsert {
                        title: event.title.clone(),
                        inserted: inserted.len(),
                        message: e.to_string(),
                    });
                }
            }
        }

        info!("Inserted {} event(s) into Google Calendar", inserted.len());
        Ok(SyncReport { inserted })
    }

    /// Run a sync and tell the user how it went, exactly once.
    ///
    /// Returns whether the whole batch was inserted.
    pub async fn sync_and_notify(&self, events: &[CalendarEvent], notifier: &dyn Notifier) -> bool {
        if let Err(e) = self.ensure_initialized().await {
            error!("Google API initialization failed: {:?}", e);
            notifier.notify(Notification::Failure(API_NOT_INITIALIZED_MESSAGE.to_string()));
            return false;
        }

        match self.sign_in_and_insert(events).await {
            Ok(_) => {
                notifier.notify(Notification::Success(SYNC_SUCCESS_MESSAGE.to_string()));
                true
            }
            Err(e) => {
                error!("Error syncing to Google Calendar: {:?}", e);
                notifier.notify(Notification::Failure(SYNC_FAILURE_MESSAGE.to_string()));
                false
            }
        }
    }
}
