//! Minimal W3C WebDriver client.
//!
//! Only the handful of endpoints a single screenshot needs: session
//! create/delete, navigation, synchronous script execution, screenshot and
//! server status. Every response is a JSON object with a `value` member; on
//! failure `value` carries `error` and `message`.

use std::time::Duration;

use base64::Engine;
use reqwest::{Client, Method};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, instrument};
use url::Url;

use shelfmark_shared::{Result, ShelfmarkError};

/// Upper bound for a single WebDriver command. Navigation blocks until the
/// page load event, so this is generous.
const COMMAND_TIMEOUT: Duration = Duration::from_secs(120);

/// Browser launch options sent with `POST /session`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserOptions {
    pub headless: bool,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
        }
    }
}

impl BrowserOptions {
    /// Chrome command-line switches for a container-friendly session.
    pub fn chrome_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(5);
        if self.headless {
            args.push("--headless".to_string());
        }
        args.push("--no-sandbox".to_string());
        args.push("--disable-dev-shm-usage".to_string());
        args.push("--disable-gpu".to_string());
        args.push(format!(
            "--window-size={},{}",
            self.window_width, self.window_height
        ));
        args
    }

    fn capabilities(&self) -> Value {
        json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": self.chrome_args() }
                }
            }
        })
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    value: Value,
}

#[derive(Debug, Deserialize)]
struct ErrorValue {
    error: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewSession {
    session_id: String,
}

#[derive(Debug, Deserialize)]
struct Status {
    #[serde(default)]
    ready: bool,
}

/// HTTP client bound to one WebDriver server.
#[derive(Debug, Clone)]
pub struct WebDriverClient {
    http: Client,
    base: Url,
}

impl WebDriverClient {
    /// Client for the server at `base` (e.g. `http://127.0.0.1:9515`).
    pub fn new(base: &str) -> Result<Self> {
        let mut base = Url::parse(base).map_err(|e| {
            ShelfmarkError::config(format!("invalid WebDriver URL '{base}': {e}"))
        })?;
        // Url::join replaces the last segment unless the path ends in '/'.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = Client::builder()
            .timeout(COMMAND_TIMEOUT)
            .build()
            .map_err(|e| ShelfmarkError::browser(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| ShelfmarkError::browser(format!("bad WebDriver endpoint '{path}': {e}")))
    }

    async fn command(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let url = self.endpoint(path)?;
        debug!(%method, %url, "webdriver command");

        let mut request = self.http.request(method, url.clone());
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ShelfmarkError::browser(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ShelfmarkError::browser(format!("reading response from {url}: {e}")))?;

        let envelope: Envelope = serde_json::from_str(&text).map_err(|e| {
            ShelfmarkError::browser(format!(
                "invalid WebDriver response ({status}) from {url}: {e}"
            ))
        })?;

        if !status.is_success() {
            return Err(match serde_json::from_value::<ErrorValue>(envelope.value) {
                Ok(err) => ShelfmarkError::WebDriver {
                    error: err.error,
                    message: err.message,
                },
                Err(_) => ShelfmarkError::browser(format!("WebDriver returned {status} for {url}")),
            });
        }

        Ok(envelope.value)
    }

    /// `GET /status`: whether the server is ready to create sessions.
    pub async fn is_ready(&self) -> Result<bool> {
        let value = self.command(Method::GET, "status", None).await?;
        let status: Status = serde_json::from_value(value)
            .map_err(|e| ShelfmarkError::browser(format!("invalid status payload: {e}")))?;
        Ok(status.ready)
    }

    /// `POST /session`; returns the new session id.
    #[instrument(skip_all, fields(base = %self.base))]
    pub async fn new_session(&self, options: &BrowserOptions) -> Result<String> {
        let value = self
            .command(Method::POST, "session", Some(options.capabilities()))
            .await?;
        let session: NewSession = serde_json::from_value(value)
            .map_err(|e| ShelfmarkError::browser(format!("invalid new-session payload: {e}")))?;
        Ok(session.session_id)
    }

    /// `DELETE /session/{id}`.
    pub async fn delete_session(&self, session: &str) -> Result<()> {
        self.command(Method::DELETE, &format!("session/{session}"), None)
            .await?;
        Ok(())
    }

    /// `POST /session/{id}/url`. Returns once the browser reports the load.
    pub async fn navigate(&self, session: &str, url: &str) -> Result<()> {
        self.command(
            Method::POST,
            &format!("session/{session}/url"),
            Some(json!({ "url": url })),
        )
        .await?;
        Ok(())
    }

    /// `POST /session/{id}/execute/sync` with no arguments.
    pub async fn execute(&self, session: &str, script: &str) -> Result<Value> {
        self.command(
            Method::POST,
            &format!("session/{session}/execute/sync"),
            Some(json!({ "script": script, "args": [] })),
        )
        .await
    }

    /// `GET /session/{id}/screenshot`, decoded to PNG bytes.
    pub async fn screenshot(&self, session: &str) -> Result<Vec<u8>> {
        let value = self
            .command(Method::GET, &format!("session/{session}/screenshot"), None)
            .await?;
        let encoded = value
            .as_str()
            .ok_or_else(|| ShelfmarkError::browser("screenshot payload is not a string"))?;
        base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| ShelfmarkError::browser(format!("screenshot is not valid base64: {e}")))
    }
}
