//! Headless-browser page screenshots for Shelfmark.
//!
//! Drives Chrome through a WebDriver server: either a `chromedriver`
//! spawned per capture or a remote server given by URL.

pub mod capture;
pub mod driver;
pub mod session;
pub mod webdriver;

#[cfg(all(test, target_os = "linux"))]
mod test_support;

pub use capture::{CaptureOptions, CaptureOutcome, CaptureRequest, capture_screenshot};
pub use driver::DriverProcess;
pub use session::{BrowserSession, SessionOptions};
pub use webdriver::{BrowserOptions, WebDriverClient};
