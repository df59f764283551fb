//! One-shot page screenshot: load, wait for the app to render, save a PNG.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{info, instrument, warn};
use url::Url;

use shelfmark_shared::{CaptureConfig, Result, ShelfmarkError};

use crate::session::{BrowserSession, SessionOptions};

/// What to capture.
#[derive(Debug, Clone)]
pub struct CaptureRequest {
    pub url: String,
    pub output: PathBuf,
    /// Extra delay after the page reports `complete`, for client-side rendering.
    pub wait: Duration,
    /// Label used in logs; defaults to `Capturing <url>`.
    pub description: Option<String>,
}

impl CaptureRequest {
    pub fn label(&self) -> String {
        self.description
            .clone()
            .unwrap_or_else(|| format!("Capturing {}", self.url))
    }
}

/// How to capture.
#[derive(Debug, Clone)]
pub struct CaptureOptions {
    pub session: SessionOptions,
    /// Bound on the `document.readyState` wait.
    pub ready_timeout: Duration,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self::from(&CaptureConfig::default())
    }
}

impl From<&CaptureConfig> for CaptureOptions {
    fn from(config: &CaptureConfig) -> Self {
        Self {
            session: SessionOptions::from(config),
            ready_timeout: Duration::from_secs(config.ready_timeout_secs),
        }
    }
}

/// A written screenshot.
#[derive(Debug, Clone)]
pub struct CaptureOutcome {
    pub path: PathBuf,
    pub bytes: usize,
    pub elapsed: Duration,
}

/// Capture `request.url` into `request.output`.
///
/// The browser session is released on every path out of this function.
/// A failure to release after a successful capture is logged, not returned.
#[instrument(skip_all, fields(url = %request.url, output = %request.output.display()))]
pub async fn capture_screenshot(
    request: &CaptureRequest,
    options: &CaptureOptions,
) -> Result<CaptureOutcome> {
    let start = Instant::now();
    Url::parse(&request.url).map_err(|e| {
        ShelfmarkError::validation(format!("invalid URL '{}': {e}", request.url))
    })?;

    info!(
        label = %request.label(),
        wait_secs = request.wait.as_secs_f64(),
        "starting capture"
    );

    let session = BrowserSession::start(&options.session).await?;
    let captured = run(&session, request, options.ready_timeout).await;
    let released = session.quit().await;

    match (captured, released) {
        (Ok(bytes), Ok(())) => Ok(outcome(request, bytes, start)),
        (Ok(bytes), Err(e)) => {
            warn!(error = %e, "screenshot saved but session release failed");
            Ok(outcome(request, bytes, start))
        }
        (Err(e), _) => Err(e),
    }
}

async fn run(session: &BrowserSession, request: &CaptureRequest, ready_timeout: Duration) -> Result<usize> {
    session.navigate(&request.url).await?;
    session.wait_until_ready(ready_timeout).await?;
    info!("page loaded (readyState=complete)");

    if !request.wait.is_zero() {
        info!(secs = request.wait.as_secs_f64(), "waiting for app rendering");
        tokio::time::sleep(request.wait).await;
    }

    let png = session.screenshot_png().await?;
    write_png(&request.output, &png).await?;
    Ok(png.len())
}

async fn write_png(path: &Path, png: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ShelfmarkError::io(parent, e))?;
        }
    }
    tokio::fs::write(path, png)
        .await
        .map_err(|e| ShelfmarkError::io(path, e))
}

fn outcome(request: &CaptureRequest, bytes: usize, start: Instant) -> CaptureOutcome {
    info!(path = %request.output.display(), bytes, "screenshot saved");
    CaptureOutcome {
        path: request.output.clone(),
        bytes,
        elapsed: start.elapsed(),
    }
}
