//! A single browser session and its guaranteed release.
//!
//! [`BrowserSession::quit`] deletes the WebDriver session and stops the
//! driver. If a session is dropped without `quit` (early return, panic,
//! cancelled future) the `Drop` impl kills the driver process, or for a
//! remote server schedules the session delete on the current runtime.
//! Only `quit` asks the browser to close; the kill on drop is a fallback.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};

use shelfmark_shared::{CaptureConfig, Result, ShelfmarkError};

use crate::driver::DriverProcess;
use crate::webdriver::{BrowserOptions, WebDriverClient};

const READY_STATE_SCRIPT: &str = "return document.readyState";

/// Interval between `document.readyState` probes.
const READY_POLL: Duration = Duration::from_millis(250);

/// Where the session comes from and how the browser is launched.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Driver executable, used when `webdriver_url` is unset.
    pub driver_path: PathBuf,
    /// Existing WebDriver server to connect to instead of spawning a driver.
    pub webdriver_url: Option<String>,
    pub browser: BrowserOptions,
    /// How long the spawned driver may take to accept sessions.
    pub startup_timeout: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from(&CaptureConfig::default())
    }
}

impl From<&CaptureConfig> for SessionOptions {
    fn from(config: &CaptureConfig) -> Self {
        Self {
            driver_path: PathBuf::from(&config.driver_path),
            webdriver_url: config.webdriver_url.clone(),
            browser: BrowserOptions {
                headless: config.headless,
                window_width: config.window_width,
                window_height: config.window_height,
            },
            startup_timeout: Duration::from_secs(config.startup_timeout_secs),
        }
    }
}

/// One live WebDriver session.
#[derive(Debug)]
pub struct BrowserSession {
    client: WebDriverClient,
    id: String,
    driver: Option<DriverProcess>,
    released: bool,
}

impl BrowserSession {
    /// Start a driver (or connect to a remote one) and open a session.
    #[instrument(skip_all)]
    pub async fn start(options: &SessionOptions) -> Result<Self> {
        let (driver, client) = match &options.webdriver_url {
            Some(url) => {
                debug!(%url, "using remote WebDriver server");
                (None, WebDriverClient::new(url)?)
            }
            None => {
                let (process, client) =
                    DriverProcess::spawn(&options.driver_path, options.startup_timeout).await?;
                (Some(process), client)
            }
        };

        let id = match client.new_session(&options.browser).await {
            Ok(id) => id,
            Err(e) => {
                if let Some(driver) = driver {
                    driver.shutdown().await;
                }
                return Err(e);
            }
        };

        info!(session = %id, "browser session started");
        Ok(Self {
            client,
            id,
            driver,
            released: false,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub async fn navigate(&self, url: &str) -> Result<()> {
        debug!(%url, "navigating");
        self.client.navigate(&self.id, url).await
    }

    /// Poll `document.readyState` until it is `"complete"`.
    ///
    /// A failed probe ends the wait immediately; exceeding `timeout` is a
    /// [`ShelfmarkError::Timeout`].
    pub async fn wait_until_ready(&self, timeout: Duration) -> Result<()> {
        let start = Instant::now();
        loop {
            let state = self.client.execute(&self.id, READY_STATE_SCRIPT).await?;
            if state.as_str() == Some("complete") {
                debug!(elapsed_ms = start.elapsed().as_millis() as u64, "page ready");
                return Ok(());
            }

            if start.elapsed() >= timeout {
                return Err(ShelfmarkError::timeout(
                    "document.readyState == \"complete\"",
                    start.elapsed(),
                ));
            }
            debug!(?state, "page still loading");
            tokio::time::sleep(READY_POLL).await;
        }
    }

    /// Viewport screenshot as PNG bytes.
    pub async fn screenshot_png(&self) -> Result<Vec<u8>> {
        self.client.screenshot(&self.id).await
    }

    /// Delete the session and stop the driver.
    ///
    /// Always stops the driver, even when the delete fails; the delete error
    /// is returned afterwards.
    pub async fn quit(mut self) -> Result<()> {
        self.released = true;
        let deleted = self.client.delete_session(&self.id).await;
        if let Some(driver) = self.driver.take() {
            driver.shutdown().await;
        }
        match &deleted {
            Ok(()) => info!(session = %self.id, "browser session closed"),
            Err(e) => warn!(session = %self.id, error = %e, "failed to delete session"),
        }
        deleted
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        warn!(session = %self.id, "browser session dropped without quit");

        if let Some(driver) = self.driver.as_mut() {
            // Best effort: a killed chromedriver can leave its Chrome children running.
            driver.kill();
        } else if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let client = self.client.clone();
            let id = std::mem::take(&mut self.id);
            handle.spawn(async move {
                if let Err(e) = client.delete_session(&id).await {
                    warn!(session = %id, error = %e, "deferred session delete failed");
                }
            });
        }
    }
}
