//! Shelf space estimation and utilization.
//!
//! Every book gets a spine-width estimate from its page count; widths are
//! summed per (shelf, row) and compared against the shelf's total row width.

use std::collections::BTreeMap;

use tracing::{debug, instrument};

use shelfmark_shared::{InventoryRecord, Location, Result, ShelfLayout, ShelfmarkError};

use crate::classifier::RuleSet;

/// Utilization above this is flagged as over capacity in the report.
pub const OVER_CAPACITY_PERCENT: f64 = 90.0;

/// Utilization above this is flagged as near capacity in the report.
pub const NEAR_CAPACITY_PERCENT: f64 = 75.0;

/// Estimated spine width in inches for a book with `pages` pages.
///
/// Unknown page counts (0) are assumed to be an average 1" book.
pub fn estimate_width(pages: u32) -> f64 {
    match pages {
        0 => 1.0,
        1..=100 => 0.5,
        101..=200 => 0.75,
        201..=300 => 1.0,
        301..=500 => 1.25,
        501..=750 => 1.5,
        _ => 2.0,
    }
}

/// `used / available * 100`. Values above 100 are valid and mean overflow.
pub fn utilization_percent(used: f64, available: f64) -> f64 {
    if available > 0.0 {
        used / available * 100.0
    } else {
        0.0
    }
}

// ---------------------------------------------------------------------------
// Capacity bands
// ---------------------------------------------------------------------------

/// Coarse status used to colour the utilization banners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityBand {
    Over,
    Near,
    Good,
}

impl CapacityBand {
    pub fn from_utilization(percent: f64) -> Self {
        if percent > OVER_CAPACITY_PERCENT {
            Self::Over
        } else if percent > NEAR_CAPACITY_PERCENT {
            Self::Near
        } else {
            Self::Good
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Over => "over-capacity",
            Self::Near => "near-capacity",
            Self::Good => "good-capacity",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Over => "⚠️ Over capacity",
            Self::Near => "⚡ Near capacity",
            Self::Good => "✅ Good capacity",
        }
    }
}

// ---------------------------------------------------------------------------
// Assignments
// ---------------------------------------------------------------------------

/// A book as placed on a row.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedBook {
    pub title: String,
    pub author: String,
    pub pages: u32,
    pub width: f64,
}

/// Books assigned to one row and the width they take up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowAssignment {
    pub width: f64,
    pub books: Vec<PlacedBook>,
}

impl RowAssignment {
    fn place(&mut self, book: PlacedBook) {
        self.width += book.width;
        self.books.push(book);
    }

    /// Books ordered by title (case-sensitive, byte-wise), ties in placement order.
    pub fn books_by_title(&self) -> Vec<&PlacedBook> {
        let mut books: Vec<&PlacedBook> = self.books.iter().collect();
        books.sort_by(|a, b| a.title.cmp(&b.title));
        books
    }
}

/// Space used on a single shelf.
#[derive(Debug, Clone, PartialEq)]
pub struct ShelfUsage {
    pub shelf_id: String,
    /// Keyed by 1-based row number; every row of the shelf is present.
    pub rows: BTreeMap<u32, RowAssignment>,
    pub total_width: f64,
    pub available_width: f64,
    pub utilization: f64,
}

impl ShelfUsage {
    pub fn row(&self, row: u32) -> Option<&RowAssignment> {
        self.rows.get(&row)
    }

    pub fn band(&self) -> CapacityBand {
        CapacityBand::from_utilization(self.utilization)
    }

    pub fn book_count(&self) -> usize {
        self.rows.values().map(|r| r.books.len()).sum()
    }

    fn finish(&mut self) {
        self.total_width = self.rows.values().map(|r| r.width).sum();
        self.utilization = utilization_percent(self.total_width, self.available_width);
    }
}

/// Space usage for every shelf of a layout, in layout order.
#[derive(Debug, Clone, PartialEq)]
pub struct SpaceReport {
    shelves: Vec<ShelfUsage>,
}

impl SpaceReport {
    pub fn shelves(&self) -> &[ShelfUsage] {
        &self.shelves
    }

    pub fn shelf(&self, id: &str) -> Option<&ShelfUsage> {
        self.shelves.iter().find(|s| s.shelf_id == id)
    }

    /// Sum of all row widths across all shelves.
    pub fn total_width(&self) -> f64 {
        self.shelves.iter().map(|s| s.total_width).sum()
    }

    pub fn book_count(&self) -> usize {
        self.shelves.iter().map(ShelfUsage::book_count).sum()
    }

    /// Shelves whose books would not physically fit (> 100 %).
    pub fn over_capacity(&self) -> impl Iterator<Item = &ShelfUsage> {
        self.shelves.iter().filter(|s| s.utilization > 100.0)
    }
}

/// Classify every book and total up the width on each shelf.
///
/// Non-book records are ignored. A location produced by `rules` that is not
/// part of `layout` is a validation error.
#[instrument(skip_all, fields(records = records.len(), rules = rules.name))]
pub fn calculate_space(
    records: &[InventoryRecord],
    layout: &ShelfLayout,
    rules: &RuleSet,
) -> Result<SpaceReport> {
    let mut shelves: Vec<ShelfUsage> = layout
        .shelves()
        .iter()
        .map(|shelf| ShelfUsage {
            shelf_id: shelf.id.clone(),
            rows: (1..=shelf.rows)
                .map(|row| (row, RowAssignment::default()))
                .collect(),
            total_width: 0.0,
            available_width: shelf.available_width(),
            utilization: 0.0,
        })
        .collect();

    for record in records.iter().filter(|r| r.is_book()) {
        let location = rules.classify(&record.book_text());
        let row = find_row(&mut shelves, location)?;

        let width = estimate_width(record.pages);
        debug!(title = %record.title, %location, width, "placed book");
        row.place(PlacedBook {
            title: record.title.clone(),
            author: record.creators.clone(),
            pages: record.pages,
            width,
        });
    }

    for shelf in &mut shelves {
        shelf.finish();
    }

    Ok(SpaceReport { shelves })
}

fn find_row(shelves: &mut [ShelfUsage], location: Location) -> Result<&mut RowAssignment> {
    shelves
        .iter_mut()
        .find(|s| s.shelf_id == location.shelf)
        .and_then(|s| s.rows.get_mut(&location.row))
        .ok_or_else(|| {
            ShelfmarkError::validation(format!("{location} is not part of the shelf layout"))
        })
}
