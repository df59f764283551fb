//! A stand-in `chromedriver` for tests of the spawned-driver path.
//!
//! The script serves `/status`, `POST /session` and `DELETE /session/{id}`,
//! fails every other command the way a browser that cannot reach the page
//! does, and writes its pid next to itself.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

const SCRIPT: &str = r#"#!/usr/bin/env python3
import json, os, sys
from http.server import BaseHTTPRequestHandler, HTTPServer

port = int(next(a.split("=", 1)[1] for a in sys.argv[1:] if a.startswith("--port=")))
with open(os.path.join(os.path.dirname(os.path.abspath(__file__)), "driver.pid"), "w") as f:
    f.write(str(os.getpid()))

class Handler(BaseHTTPRequestHandler):
    def reply(self, status, value):
        body = json.dumps({"value": value}).encode()
        self.send_response(status)
        self.send_header("Content-Type", "application/json")
        self.send_header("Content-Length", str(len(body)))
        self.end_headers()
        self.wfile.write(body)

    def do_GET(self):
        if self.path == "/status":
            self.reply(200, {"ready": True, "message": "ready"})
        else:
            self.reply(404, {"error": "unknown command", "message": self.path})

    def do_POST(self):
        self.rfile.read(int(self.headers.get("Content-Length") or 0))
        if self.path == "/session":
            self.reply(200, {"sessionId": "local-1", "capabilities": {}})
        else:
            self.reply(500, {"error": "unknown error", "message": "net::ERR_CONNECTION_REFUSED"})

    def do_DELETE(self):
        self.reply(200, None)

    def log_message(self, *args):
        pass

HTTPServer(("127.0.0.1", port), Handler).serve_forever()
"#;

/// Write the fake driver into `dir`, or `None` when `python3` is unavailable.
pub(crate) fn fake_driver(dir: &Path) -> Option<PathBuf> {
    let python = Command::new("python3")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    if !matches!(python, Ok(status) if status.success()) {
        eprintln!("python3 not found; skipping fake driver test");
        return None;
    }

    let path = dir.join("chromedriver");
    std::fs::write(&path, SCRIPT).expect("write fake driver");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("chmod fake driver");
    Some(path)
}

/// Pid the fake driver in `dir` recorded at startup.
pub(crate) fn driver_pid(dir: &Path) -> u32 {
    std::fs::read_to_string(dir.join("driver.pid"))
        .expect("driver pid file")
        .trim()
        .parse()
        .expect("driver pid")
}

/// Whether `pid` is a live process. Zombies count as gone.
pub(crate) fn is_running(pid: u32) -> bool {
    match std::fs::read_to_string(format!("/proc/{pid}/stat")) {
        Ok(stat) => stat
            .rsplit_once(')')
            .and_then(|(_, rest)| rest.trim_start().chars().next())
            .is_some_and(|state| state != 'Z' && state != 'X'),
        Err(_) => false,
    }
}

/// Poll until `pid` has exited, for at most `timeout`.
pub(crate) async fn wait_for_exit(pid: u32, timeout: Duration) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if !is_running(pid) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    !is_running(pid)
}
