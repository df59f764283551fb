//! Inventory export ingestion.
//!
//! Reads catalogue exports (one CSV file per collection) into uniform
//! [`InventoryRecord`]s and finds the export files in a directory.
//! A file that cannot be read contributes zero records and never stops the
//! remaining files from being ingested.
//!
//! [`InventoryRecord`]: shelfmark_shared::InventoryRecord

mod reader;
mod sources;

pub use reader::{Ingested, SourceOutcome, ingest_all, parse_inventory, read_inventory};
pub use sources::{discover_sources, pattern_to_regex};
