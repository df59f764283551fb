//! Shelf organization for Shelfmark.
//!
//! Classifies catalogued books onto physical shelves, estimates how much
//! room each shelf needs, and renders the result as an HTML guide.

pub mod classifier;
pub mod pipeline;
pub mod report;
pub mod space;

pub use classifier::{BALANCED, PRIMARY, Predicate, Rule, RuleSet};
pub use pipeline::{OrganizeConfig, OrganizeResult, ProgressReporter, SilentProgress, organize};
pub use report::{ReportInput, escape_html, render_report};
pub use space::{CapacityBand, SpaceReport, ShelfUsage, calculate_space, estimate_width};
