//! End-to-end `organize` pipeline: discover → ingest → classify → measure → render.

use std::path::PathBuf;
use std::time::Instant;

use chrono::Utc;
use tracing::{info, instrument, warn};

use shelfmark_inventory::{discover_sources, ingest_all};
use shelfmark_shared::{ItemKind, Result, ShelfLayout, ShelfmarkError};

use crate::classifier::RuleSet;
use crate::report::{ReportInput, render_report};
use crate::space::{SpaceReport, calculate_space};

/// Configuration for the `organize` pipeline.
#[derive(Debug, Clone)]
pub struct OrganizeConfig {
    /// Directory searched for inventory exports.
    pub source_dir: PathBuf,
    /// File-name pattern for exports (e.g. `library_*.csv`).
    pub input_pattern: String,
    /// Where the HTML report is written.
    pub output_path: PathBuf,
    pub layout: ShelfLayout,
    pub rules: &'static RuleSet,
}

/// Result of the `organize` pipeline.
#[derive(Debug)]
pub struct OrganizeResult {
    pub output_path: PathBuf,
    /// Number of export files found.
    pub source_count: usize,
    /// Files that could not be read and were skipped.
    pub failed_sources: Vec<PathBuf>,
    pub book_count: usize,
    pub video_game_count: usize,
    pub music_count: usize,
    pub space: SpaceReport,
    pub elapsed: std::time::Duration,
}

impl OrganizeResult {
    /// Shelves whose books do not fit, as (id, utilization).
    pub fn over_capacity(&self) -> Vec<(&str, f64)> {
        self.space
            .over_capacity()
            .map(|s| (s.shelf_id.as_str(), s.utilization))
            .collect()
    }
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each export file has been read.
    fn source_read(&self, path: &str, records: usize);
    /// Called when the pipeline completes.
    fn done(&self, result: &OrganizeResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn source_read(&self, _path: &str, _records: usize) {}
    fn done(&self, _result: &OrganizeResult) {}
}

/// Run the full `organize` pipeline.
///
/// Unreadable export files are logged and skipped; the report is still
/// written. Only a bad layout, a missing source directory or a failed
/// write of the output abort the run.
#[instrument(skip_all, fields(dir = %config.source_dir.display(), rules = config.rules.name))]
pub fn organize(config: &OrganizeConfig, progress: &dyn ProgressReporter) -> Result<OrganizeResult> {
    let start = Instant::now();

    config.layout.validate()?;
    config.rules.check_against(&config.layout)?;

    progress.phase("Discovering inventory files");
    let paths = discover_sources(&config.source_dir, &config.input_pattern)?;
    info!(count = paths.len(), pattern = %config.input_pattern, "found inventory files");
    if paths.is_empty() {
        warn!("no inventory files matched; the report will be empty");
    }

    progress.phase("Reading inventory");
    let ingested = ingest_all(&paths);
    for source in &ingested.sources {
        progress.source_read(&source.path.display().to_string(), source.records);
    }
    info!(items = ingested.records.len(), "total items");

    progress.phase("Calculating shelf space");
    let space = calculate_space(&ingested.records, &config.layout, config.rules)?;
    log_capacity_summary(&space);

    progress.phase("Rendering report");
    let html = render_report(&ReportInput {
        records: &ingested.records,
        space: &space,
        layout: &config.layout,
        generated_at: Utc::now(),
    });

    if let Some(parent) = config.output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| ShelfmarkError::io(parent, e))?;
        }
    }
    std::fs::write(&config.output_path, html)
        .map_err(|e| ShelfmarkError::io(&config.output_path, e))?;
    info!(path = %config.output_path.display(), "wrote organization report");

    let result = OrganizeResult {
        output_path: config.output_path.clone(),
        source_count: paths.len(),
        failed_sources: ingested.failed_sources().map(|s| s.path.clone()).collect(),
        book_count: ingested.count(ItemKind::Book),
        video_game_count: ingested.count(ItemKind::VideoGame),
        music_count: ingested.count(ItemKind::Music),
        space,
        elapsed: start.elapsed(),
    };

    progress.done(&result);
    Ok(result)
}

fn log_capacity_summary(space: &SpaceReport) {
    for shelf in space.shelves() {
        info!(
            shelf = %shelf.shelf_id,
            utilization = %format!("{:.1}%", shelf.utilization),
            used = shelf.total_width,
            available = shelf.available_width,
            "shelf utilization"
        );
    }

    let over: Vec<&str> = space.over_capacity().map(|s| s.shelf_id.as_str()).collect();
    if !over.is_empty() {
        warn!(
            shelves = %over.join(", "),
            "shelves over capacity; consider more shelving, digital copies or rotating books into storage"
        );
    } else {
        info!("all shelves within capacity");
    }
}
