//! Local `chromedriver` process management.

use std::net::TcpListener;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::{Child, Command};
use tracing::{debug, info, instrument, warn};

use shelfmark_shared::{Result, ShelfmarkError};

use crate::webdriver::WebDriverClient;

/// Interval between `/status` probes while the driver starts.
const STARTUP_POLL: Duration = Duration::from_millis(100);

/// A running driver process. Killed when dropped.
#[derive(Debug)]
pub struct DriverProcess {
    child: Child,
    port: u16,
}

impl DriverProcess {
    /// Spawn `driver_path --port=<free port>` and wait until it reports ready.
    ///
    /// Returns the process together with a client bound to it.
    #[instrument(skip_all, fields(driver = %driver_path.display()))]
    pub async fn spawn(
        driver_path: &Path,
        startup_timeout: Duration,
    ) -> Result<(Self, WebDriverClient)> {
        let port = free_port()?;
        let child = Command::new(driver_path)
            .arg(format!("--port={port}"))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                ShelfmarkError::browser(format!(
                    "failed to start driver `{}`: {e}. Is chromedriver installed?",
                    driver_path.display()
                ))
            })?;

        let mut process = Self { child, port };
        let client = WebDriverClient::new(&format!("http://127.0.0.1:{port}"))?;
        process.wait_until_ready(&client, startup_timeout).await?;

        info!(port, "driver is ready");
        Ok((process, client))
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    async fn wait_until_ready(
        &mut self,
        client: &WebDriverClient,
        timeout: Duration,
    ) -> Result<()> {
        let start = Instant::now();
        loop {
            if let Some(status) = self.child.try_wait().map_err(|e| {
                ShelfmarkError::browser(format!("failed to poll driver process: {e}"))
            })? {
                return Err(ShelfmarkError::browser(format!(
                    "driver exited during startup ({status})"
                )));
            }

            match client.is_ready().await {
                Ok(true) => return Ok(()),
                Ok(false) => debug!("driver not ready yet"),
                // Connection refused until the driver binds its port.
                Err(e) => debug!(error = %e, "driver not reachable yet"),
            }

            if start.elapsed() >= timeout {
                self.kill();
                return Err(ShelfmarkError::timeout("driver startup", start.elapsed()));
            }
            tokio::time::sleep(STARTUP_POLL).await;
        }
    }

    /// Ask the OS to kill the process without waiting for it.
    pub fn kill(&mut self) {
        if let Err(e) = self.child.start_kill() {
            // Already exited.
            debug!(error = %e, "driver kill skipped");
        }
    }

    /// Kill the process and reap it.
    pub async fn shutdown(mut self) {
        self.kill();
        match self.child.wait().await {
            Ok(status) => debug!(?status, "driver exited"),
            Err(e) => warn!("driver wait error: {e}"),
        }
    }
}

/// Pick an unused local TCP port by binding port 0.
pub fn free_port() -> Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|e| ShelfmarkError::browser(format!("no free local port: {e}")))?;
    let port = listener
        .local_addr()
        .map_err(|e| ShelfmarkError::browser(format!("no free local port: {e}")))?
        .port();
    Ok(port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_port_is_nonzero() {
        assert_ne!(free_port().unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_binary_is_a_browser_error() {
        let err = DriverProcess::spawn(
            Path::new("/nonexistent/shelfmark/chromedriver"),
            Duration::from_secs(1),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ShelfmarkError::Browser(_)));
        assert!(err.to_string().contains("failed to start driver"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn driver_that_exits_immediately_fails_startup() {
        // `true` ignores its arguments and exits 0 without serving anything.
        let err = DriverProcess::spawn(Path::new("true"), Duration::from_secs(5))
            .await
            .unwrap_err();
        let msg = err.to_string();
        assert!(
            msg.contains("exited during startup") || msg.contains("timed out"),
            "{msg}"
        );
    }
}
