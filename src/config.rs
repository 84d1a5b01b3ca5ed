use crate::error::{config_error, env_error, CalResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default location of the optional config file
pub const CONFIG_FILE: &str = "config/sportscal.toml";

/// OAuth scope for writing events into the user's calendars
pub const CALENDAR_EVENTS_SCOPE: &str = "https://www.googleapis.com/auth/calendar.events";

pub const DEFAULT_DISCOVERY_URL: &str =
    "https://www.googleapis.com/discovery/v1/apis/calendar/v3/rest";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_ESPN_BASE_URL: &str = "https://site.api.espn.com/apis/site/v2/sports";
pub const DEFAULT_MLB_BASE_URL: &str = "https://statsapi.mlb.com/api/v1";

/// Remote endpoints, overridable so tests can point them at a local server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Endpoints {
    pub discovery_url: String,
    pub auth_url: String,
    pub token_url: String,
    pub espn_base_url: String,
    pub mlb_base_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            discovery_url: DEFAULT_DISCOVERY_URL.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            espn_base_url: DEFAULT_ESPN_BASE_URL.to_string(),
            mlb_base_url: DEFAULT_MLB_BASE_URL.to_string(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Google OAuth client ID, only needed for syncing
    pub google_client_id: Option<String>,
    /// Google OAuth client secret (installed-app clients have one)
    pub google_client_secret: Option<String>,
    /// Loopback port the consent redirect lands on
    pub oauth_redirect_port: u16,
    /// Timezone used for human-readable times
    pub timezone: String,
    /// Directory .ics files are written to
    pub export_dir: PathBuf,
    pub endpoints: Endpoints,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            google_client_id: None,
            google_client_secret: None,
            oauth_redirect_port: 8080,
            timezone: String::from("UTC"),
            export_dir: PathBuf::from("."),
            endpoints: Endpoints::default(),
        }
    }
}

/// Shape of `config/sportscal.toml`; every key is optional
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    google_client_id: Option<String>,
    google_client_secret: Option<String>,
    oauth_redirect_port: Option<u16>,
    timezone: Option<String>,
    export_dir: Option<PathBuf>,
    discovery_url: Option<String>,
    auth_url: Option<String>,
    token_url: Option<String>,
    espn_base_url: Option<String>,
    mlb_base_url: Option<String>,
}

impl Config {
    /// Load configuration from the config file and environment.
    ///
    /// Environment variables (including those from `.env`) win over the file.
    pub fn load() -> CalResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let mut config = Config::default();

        if Path::new(CONFIG_FILE).exists() {
            let content = fs::read_to_string(CONFIG_FILE)?;
            config.merge_file(&content)?;
        }

        config.merge_env()?;
        Ok(config)
    }

    /// Merge values from TOML text into this config
    pub fn merge_file(&mut self, content: &str) -> CalResult<()> {
        let file: ConfigFile = toml::from_str(content)?;

        if file.google_client_id.is_some() {
            self.google_client_id = file.google_client_id;
        }
        if file.google_client_secret.is_some() {
            self.google_client_secret = file.google_client_secret;
        }
        if let Some(port) = file.oauth_redirect_port {
            self.oauth_redirect_port = port;
        }
        if let Some(timezone) = file.timezone {
            self.timezone = timezone;
        }
        if let Some(dir) = file.export_dir {
            self.export_dir = dir;
        }
        if let Some(url) = file.discovery_url {
            self.endpoints.discovery_url = url;
        }
        if let Some(url) = file.auth_url {
            self.endpoints.auth_url = url;
        }
        if let Some(url) = file.token_url {
            self.endpoints.token_url = url;
        }
        if let Some(url) = file.espn_base_url {
            self.endpoints.espn_base_url = url;
        }
        if let Some(url) = file.mlb_base_url {
            self.endpoints.mlb_base_url = url;
        }

        Ok(())
    }

    fn merge_env(&mut self) -> CalResult<()> {
        if let Ok(id) = env::var("GOOGLE_CLIENT_ID") {
            self.google_client_id = Some(id);
        }
        if let Ok(secret) = env::var("GOOGLE_CLIENT_SECRET") {
            self.google_client_secret = Some(secret);
        }
        if let Ok(port) = env::var("OAUTH_REDIRECT_PORT") {
            self.oauth_redirect_port = port
                .parse::<u16>()
                .map_err(|_| env_error("Invalid OAUTH_REDIRECT_PORT format"))?;
        }
        if let Ok(timezone) = env::var("TIMEZONE") {
            self.timezone = timezone;
        }
        if let Ok(dir) = env::var("EXPORT_DIR") {
            self.export_dir = PathBuf::from(dir);
        }
        if let Ok(url) = env::var("GOOGLE_DISCOVERY_URL") {
            self.endpoints.discovery_url = url;
        }
        if let Ok(url) = env::var("GOOGLE_AUTH_URL") {
            self.endpoints.auth_url = url;
        }
        if let Ok(url) = env::var("GOOGLE_TOKEN_URL") {
            self.endpoints.token_url = url;
        }
        if let Ok(url) = env::var("ESPN_BASE_URL") {
            self.endpoints.espn_base_url = url;
        }
        if let Ok(url) = env::var("MLB_BASE_URL") {
            self.endpoints.mlb_base_url = url;
        }

        Ok(())
    }

    /// The OAuth client ID, required before any Google call
    pub fn require_client_id(&self) -> CalResult<&str> {
        self.google_client_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| env_error("GOOGLE_CLIENT_ID"))
    }

    /// Parse the configured display timezone
    pub fn tz(&self) -> CalResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| config_error(&format!("Invalid timezone: {}", self.timezone)))
    }
}
