//! Application configuration for Shelfmark.
//!
//! User config lives at `~/.shelfmark/shelfmark.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShelfmarkError};
use crate::types::{ShelfDefinition, ShelfLayout};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "shelfmark.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".shelfmark";

// ---------------------------------------------------------------------------
// Config structs (matching shelfmark.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Library organizer settings.
    #[serde(default)]
    pub organizer: OrganizerConfig,

    /// Screenshot capture settings.
    #[serde(default)]
    pub capture: CaptureConfig,

    /// Physical shelves, in report order.
    #[serde(default = "default_shelves")]
    pub shelves: Vec<ShelfDefinition>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            organizer: OrganizerConfig::default(),
            capture: CaptureConfig::default(),
            shelves: default_shelves(),
        }
    }
}

impl AppConfig {
    /// Build the validated shelf layout described by `[[shelves]]`.
    pub fn layout(&self) -> Result<ShelfLayout> {
        ShelfLayout::new(self.shelves.clone())
    }
}

fn default_shelves() -> Vec<ShelfDefinition> {
    ShelfLayout::default().shelves().to_vec()
}

/// Which classification table the organizer uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSetName {
    /// Topic-first table: essentials on Office A, overflow by subject.
    #[default]
    Primary,
    /// Capacity-oriented table that spreads secondary material to Office B.
    Balanced,
}

/// `[organizer]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizerConfig {
    /// File-name pattern for inventory exports (`*` and `?` wildcards).
    #[serde(default = "default_input_pattern")]
    pub input_pattern: String,

    /// Report file written into the working directory.
    #[serde(default = "default_output_file")]
    pub output_file: String,

    /// Classification table.
    #[serde(default)]
    pub rule_set: RuleSetName,
}

impl Default for OrganizerConfig {
    fn default() -> Self {
        Self {
            input_pattern: default_input_pattern(),
            output_file: default_output_file(),
            rule_set: RuleSetName::default(),
        }
    }
}

fn default_input_pattern() -> String {
    "library_*.csv".into()
}
fn default_output_file() -> String {
    "library_organization.html".into()
}

/// `[capture]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// WebDriver executable spawned for each capture.
    #[serde(default = "default_driver_path")]
    pub driver_path: String,

    /// Use an already running WebDriver server instead of spawning one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webdriver_url: Option<String>,

    /// Viewport width in pixels.
    #[serde(default = "default_window_width")]
    pub window_width: u32,

    /// Viewport height in pixels.
    #[serde(default = "default_window_height")]
    pub window_height: u32,

    /// Run the browser without a visible window.
    #[serde(default = "default_true")]
    pub headless: bool,

    /// Upper bound on waiting for `document.readyState == "complete"`.
    #[serde(default = "default_ready_timeout")]
    pub ready_timeout_secs: u64,

    /// Upper bound on waiting for the driver process to accept sessions.
    #[serde(default = "default_startup_timeout")]
    pub startup_timeout_secs: u64,

    /// Render delay used when the CLI is not given one.
    #[serde(default = "default_wait")]
    pub default_wait_secs: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            driver_path: default_driver_path(),
            webdriver_url: None,
            window_width: default_window_width(),
            window_height: default_window_height(),
            headless: true,
            ready_timeout_secs: default_ready_timeout(),
            startup_timeout_secs: default_startup_timeout(),
            default_wait_secs: default_wait(),
        }
    }
}

fn default_driver_path() -> String {
    "chromedriver".into()
}
fn default_window_width() -> u32 {
    1920
}
fn default_window_height() -> u32 {
    1080
}
fn default_true() -> bool {
    true
}
fn default_ready_timeout() -> u64 {
    10
}
fn default_startup_timeout() -> u64 {
    10
}
fn default_wait() -> u64 {
    20
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.shelfmark/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ShelfmarkError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.shelfmark/shelfmark.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ShelfmarkError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        ShelfmarkError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    tracing::debug!(?path, shelves = config.shelves.len(), "config loaded");

    Ok(config)
}

/// Load from an explicit path when given, otherwise from the default location.
pub fn resolve_config(explicit: Option<&Path>) -> Result<AppConfig> {
    match explicit {
        Some(path) => load_config_from(path),
        None => load_config(),
    }
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| ShelfmarkError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| ShelfmarkError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ShelfmarkError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
