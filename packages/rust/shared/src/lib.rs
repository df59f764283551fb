//! Shared types, error model, and configuration for Shelfmark.
//!
//! This crate is the foundation depended on by all other Shelfmark crates.
//! It provides:
//! - [`ShelfmarkError`], the unified error type
//! - Domain types ([`InventoryRecord`], [`ItemKind`], [`ShelfDefinition`], [`ShelfLayout`], [`Location`])
//! - Configuration ([`AppConfig`], [`CaptureConfig`], [`OrganizerConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CaptureConfig, OrganizerConfig, RuleSetName, config_dir, config_file_path,
    init_config, load_config, load_config_from, resolve_config,
};
pub use error::{Result, ShelfmarkError};
pub use types::{
    BookText, InventoryRecord, ItemKind, Location, ShelfDefinition, ShelfLayout,
};
