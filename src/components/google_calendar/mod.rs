pub mod api;
pub mod models;
pub mod notifications;
pub mod session;
pub mod token;

pub use api::{CalendarApi, HttpCalendarApi};
pub use models::{AccessToken, EventResource, InsertedEvent};
pub use notifications::{ConsoleNotifier, Notification, Notifier};
pub use session::{GoogleServices, GoogleSyncSession, HttpGoogleServices, SyncReport, SyncState};
pub use token::{OAuthSettings, OAuthTokenClient, TokenClient};
