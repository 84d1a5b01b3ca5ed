use miette::Diagnostic;
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(sportscal::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(sportscal::config))]
    Config(String),

    #[error("Google API client error: {0}")]
    #[diagnostic(
        code(sportscal::api_client),
        help("The Google Calendar client could not be loaded; check network access and GOOGLE_DISCOVERY_URL")
    )]
    ApiClient(String),

    #[error("Google Calendar API error: {0}")]
    #[diagnostic(code(sportscal::google_calendar))]
    GoogleCalendar(String),

    #[error("Authorization error: {0}")]
    #[diagnostic(code(sportscal::authorization))]
    Authorization(String),

    #[error("Failed to insert \"{title}\" after {inserted} event(s) were added: {message}")]
    #[diagnostic(
        code(sportscal::calendar_insert),
        help("Events inserted before the failure were not removed")
    )]
    CalendarInsert {
        title: String,
        inserted: usize,
        message: String,
    },

    #[error("Schedule error: {0}")]
    #[diagnostic(code(sportscal::schedule))]
    Schedule(String),

    #[error("HTTP error: {0}")]
    #[diagnostic(code(sportscal::http))]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    #[diagnostic(code(sportscal::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(sportscal::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(sportscal::other))]
    Other(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::Config(format!("Invalid URL: {}", err))
    }
}

/// Type alias for Result with our Error type
pub type CalResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create API client errors
pub fn api_client_error(message: &str) -> Error {
    Error::ApiClient(message.to_string())
}

/// Helper to create Google Calendar errors
pub fn google_calendar_error(message: &str) -> Error {
    Error::GoogleCalendar(message.to_string())
}

/// Helper to create authorization errors
pub fn authorization_error(message: &str) -> Error {
    Error::Authorization(message.to_string())
}

/// Helper to create schedule errors
pub fn schedule_error(message: &str) -> Error {
    Error::Schedule(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
