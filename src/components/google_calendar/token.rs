//! OAuth token acquisition through Google's consent page.
//!
//! The installed-app loopback flow: the user approves access in the browser,
//! Google redirects to a one-shot listener on `127.0.0.1`, and the returned
//! code is exchanged for an access token. There is no timeout and no way to
//! cancel a pending consent; the request completes when the redirect arrives
//! or the listener fails.

use super::models::{AccessToken, TokenResponse};
use crate::config::{Config, CALENDAR_EVENTS_SCOPE};
use crate::error::{authorization_error, CalResult};
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

/// Opens the consent URL for the user
pub type BrowserLauncher = Arc<dyn Fn(&str) -> std::io::Result<()> + Send + Sync>;

const CONSENT_GRANTED_PAGE: &str = "Authorization successful! You can close this window.";
const CONSENT_FAILED_PAGE: &str = "Authorization failed. You can close this window.";

/// Source of access tokens
#[async_trait]
pub trait TokenClient: Send + Sync {
    /// Ask the user for consent and return a fresh token
    async fn request_access_token(&self) -> CalResult<AccessToken>;
}

/// OAuth client registration and endpoints
#[derive(Debug, Clone)]
pub struct OAuthSettings {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub redirect_port: u16,
}

impl OAuthSettings {
    pub fn from_config(config: &Config) -> CalResult<Self> {
        Ok(Self {
            client_id: config.require_client_id()?.to_string(),
            client_secret: config.google_client_secret.clone(),
            scope: CALENDAR_EVENTS_SCOPE.to_string(),
            auth_url: config.endpoints.auth_url.clone(),
            token_url: config.endpoints.token_url.clone(),
            redirect_port: config.oauth_redirect_port,
        })
    }

    pub fn redirect_uri(&self) -> String {
        format!("http://127.0.0.1:{}", self.redirect_port)
    }
}

/// Interactive token client backed by the browser and a loopback listener
#[derive(Clone)]
pub struct OAuthTokenClient {
    settings: OAuthSettings,
    client: Client,
    launcher: BrowserLauncher,
}

impl OAuthTokenClient {
    pub fn new(settings: OAuthSettings, client: Client) -> Self {
        Self {
            settings,
            client,
            launcher: Arc::new(|url: &str| webbrowser::open(url)),
        }
    }

    /// Replace the browser launcher
    pub fn with_launcher(mut self, launcher: BrowserLauncher) -> Self {
        self.launcher = launcher;
        self
    }

    /// Consent page URL carrying `state`
    pub fn consent_url(&self, state: &str) -> CalResult<Url> {
        let mut url = Url::parse(&self.settings.auth_url)?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.settings.client_id)
            .append_pair("redirect_uri", &self.settings.redirect_uri())
            .append_pair("response_type", "code")
            .append_pair("scope", &self.settings.scope)
            .append_pair("state", state);
        Ok(url)
    }

    /// Exchange an authorization code for an access token
    pub async fn exchange_code(&self, code: &str) -> CalResult<AccessToken> {
        let mut params = vec![
            ("client_id", self.settings.client_id.clone()),
            ("code", code.to_string()),
            ("redirect_uri", self.settings.redirect_uri()),
            ("grant_type", "authorization_code".to_string()),
        ];
        if let Some(secret) = &self.settings.client_secret {
            params.push(("client_secret", secret.clone()));
        }

        let response = self
            .client
            .post(&self.settings.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| authorization_error(&format!("Failed to request token: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| authorization_error(&format!("Failed to read token response: {}", e)))?;

        let token: TokenResponse = serde_json::from_str(&body).map_err(|_| {
            authorization_error(&format!("Failed to get token: HTTP {} - {}", status, body))
        })?;

        if let Some(error) = token.error {
            let message = match token.error_description {
                Some(description) => format!("Token request rejected: {} ({})", error, description),
                None => format!("Token request rejected: {}", error),
            };
            return Err(authorization_error(&message));
        }

        if !status.is_success() {
            return Err(authorization_error(&format!(
                "Failed to get token: HTTP {} - {}",
                status, body
            )));
        }

        let access_token = token
            .access_token
            .ok_or_else(|| authorization_error("Token response missing 'access_token' field"))?;
        let expires_at = token
            .expires_in
            .and_then(|secs| expiry_after(Utc::now(), secs));

        Ok(AccessToken {
            access_token,
            expires_at,
        })
    }

    /// Wait for the single consent redirect on `server`.
    ///
    /// The blocking listener reports back through a oneshot channel.
    async fn wait_for_redirect(&self, server: tiny_http::Server, state: String) -> CalResult<String> {
        let (tx, rx) = oneshot::channel();

        tokio::task::spawn_blocking(move || {
            let _ = tx.send(receive_redirect(&server, &state));
        });

        rx.await
            .map_err(|_| authorization_error("Consent listener stopped before a redirect arrived"))?
    }
}

#[async_trait]
impl TokenClient for OAuthTokenClient {
    async fn request_access_token(&self) -> CalResult<AccessToken> {
        let state = Uuid::new_v4().to_string();

        // Listen before the browser can redirect
        let server = tiny_http::Server::http(("127.0.0.1", self.settings.redirect_port))
            .map_err(|e| {
                authorization_error(&format!(
                    "Failed to listen on {}: {}",
                    self.settings.redirect_uri(),
                    e
                ))
            })?;

        let url = self.consent_url(&state)?;
        info!("Opening browser for Google Calendar authorization");
        if let Err(e) = (self.launcher)(url.as_str()) {
            warn!("Could not open a browser: {}", e);
            println!("Open this URL to authorize access to your calendar:\n{}", url);
        }

        let code = self.wait_for_redirect(server, state).await?;
        debug!("Received authorization code");
        self.exchange_code(&code).await
    }
}

/// Expiry instant `secs` after `now`; `None` when it cannot be represented
fn expiry_after(now: DateTime<Utc>, secs: i64) -> Option<DateTime<Utc>> {
    TimeDelta::try_seconds(secs).and_then(|lifetime| now.checked_add_signed(lifetime))
}

/// Whether a request target carries a consent outcome (`code` or `error`)
pub fn is_consent_redirect(request_url: &str) -> bool {
    let Ok(url) = Url::parse("http://127.0.0.1/").and_then(|base| base.join(request_url)) else {
        return false;
    };
    url.query_pairs().any(|(key, _)| key == "code" || key == "error")
}

/// Extract the authorization code from a redirect request target
pub fn parse_callback(request_url: &str, expected_state: &str) -> CalResult<String> {
    let url = Url::parse("http://127.0.0.1/")?.join(request_url)?;
    let params: HashMap<String, String> = url.query_pairs().into_owned().collect();

    if let Some(error) = params.get("error") {
        return Err(authorization_error(&format!("Consent was not granted: {}", error)));
    }

    if params.get("state").map(String::as_str) != Some(expected_state) {
        return Err(authorization_error("State mismatch in consent redirect"));
    }

    params
        .get("code")
        .cloned()
        .ok_or_else(|| authorization_error("No authorization code found in callback"))
}

fn receive_redirect(server: &tiny_http::Server, state: &str) -> CalResult<String> {
    loop {
        let request = server
            .recv()
            .map_err(|e| authorization_error(&format!("Consent listener failed: {}", e)))?;

        // Favicons and other stray requests; keep waiting for the redirect
        if !is_consent_redirect(request.url()) {
            debug!("Ignoring request to {}", request.url());
            let _ = request.respond(tiny_http::Response::empty(404));
            continue;
        }

        let result = parse_callback(request.url(), state);
        let page = if result.is_ok() {
            CONSENT_GRANTED_PAGE
        } else {
            CONSENT_FAILED_PAGE
        };
        if let Err(e) = request.respond(tiny_http::Response::from_string(page)) {
            warn!("Failed to answer the consent redirect: {}", e);
        }

        return result;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn settings() -> OAuthSettings {
        OAuthSettings {
            client_id: "client-123.apps.googleusercontent.com".to_string(),
            client_secret: None,
            scope: CALENDAR_EVENTS_SCOPE.to_string(),
            auth_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token_url: "https://oauth2.googleapis.com/token".to_string(),
            redirect_port: 8080,
        }
    }

    #[test]
    fn test_consent_url() {
        let client = OAuthTokenClient::new(settings(), Client::new());
        let url = client.consent_url("state-xyz").unwrap();
        let params: HashMap<String, String> = url.query_pairs().into_owned().collect();

        assert_eq!(url.host_str(), Some("accounts.google.com"));
        assert_eq!(params["client_id"], "client-123.apps.googleusercontent.com");
        assert_eq!(params["redirect_uri"], "http://127.0.0.1:8080");
        assert_eq!(params["response_type"], "code");
        assert_eq!(params["scope"], CALENDAR_EVENTS_SCOPE);
        assert_eq!(params["state"], "state-xyz");
    }

    #[test]
    fn test_parse_callback() {
        assert_eq!(
            parse_callback("/?state=abc&code=4%2F0Ab", "abc").unwrap(),
            "4/0Ab"
        );
    }

    #[test]
    fn test_parse_callback_denied() {
        let err = parse_callback("/?error=access_denied&state=abc", "abc").unwrap_err();
        assert!(matches!(err, Error::Authorization(msg) if msg.contains("access_denied")));
    }

    #[test]
    fn test_only_code_or_error_ends_consent() {
        assert!(is_consent_redirect("/?state=abc&code=4%2F0Ab"));
        assert!(is_consent_redirect("/?error=access_denied"));
        assert!(!is_consent_redirect("/favicon.ico"));
        assert!(!is_consent_redirect("/"));
        assert!(!is_consent_redirect("/?state=abc"));
        assert!(!is_consent_redirect("/robots.txt?scope=x"));
    }

    #[test]
    fn test_stray_request_keeps_listener_open() {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let port = server.server_addr().to_ip().unwrap().port();

        let browser = std::thread::spawn(move || {
            use std::io::{Read, Write};
            for target in ["/", "/favicon.ico", "/?state=abc&code=granted"] {
                let mut stream = std::net::TcpStream::connect(("127.0.0.1", port)).unwrap();
                stream
                    .set_read_timeout(Some(std::time::Duration::from_secs(2)))
                    .unwrap();
                write!(
                    stream,
                    "GET {} HTTP/1.1\r\nHost: 127.0.0.1\r\nConnection: close\r\n\r\n",
                    target
                )
                .unwrap();
                let mut response = String::new();
                let _ = stream.read_to_string(&mut response);
            }
        });

        assert_eq!(receive_redirect(&server, "abc").unwrap(), "granted");
        browser.join().unwrap();
    }

    #[test]
    fn test_expiry_after() {
        let now = Utc::now();
        assert_eq!(expiry_after(now, 3600), Some(now + TimeDelta::seconds(3600)));
        assert_eq!(expiry_after(now, i64::MAX), None);
        assert_eq!(expiry_after(now, i64::MAX / 1000), None);
    }

    #[test]
    fn test_parse_callback_state_mismatch() {
        assert!(matches!(
            parse_callback("/?state=other&code=x", "abc"),
            Err(Error::Authorization(_))
        ));
        assert!(matches!(
            parse_callback("/?state=abc", "abc"),
            Err(Error::Authorization(_))
        ));
    }
}
