//! Core domain types for Shelfmark inventories and shelf layouts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShelfmarkError};

// ---------------------------------------------------------------------------
// ItemKind
// ---------------------------------------------------------------------------

/// Kind of catalogued item, as written in the export's `item_type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Book,
    #[serde(rename = "videogame")]
    VideoGame,
    Music,
}

impl ItemKind {
    /// Every recognized kind, in report order.
    pub const ALL: [ItemKind; 3] = [ItemKind::Book, ItemKind::VideoGame, ItemKind::Music];

    /// The exact `item_type` value used in exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Book => "book",
            Self::VideoGame => "videogame",
            Self::Music => "music",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = ShelfmarkError;

    /// Exact, case-sensitive match; anything else is not a recognized kind.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "book" => Ok(Self::Book),
            "videogame" => Ok(Self::VideoGame),
            "music" => Ok(Self::Music),
            other => Err(ShelfmarkError::validation(format!(
                "unrecognized item kind '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// InventoryRecord
// ---------------------------------------------------------------------------

/// One row of an inventory export, normalised.
///
/// Text fields that were absent in the source are empty strings. `pages` is
/// zero when the `length` column was empty, malformed, or negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub kind: ItemKind,
    pub title: String,
    pub creators: String,
    pub tags: String,
    pub group: String,
    pub description: String,
    pub pages: u32,
}

impl InventoryRecord {
    /// Convenience constructor for a book with only a title and page count.
    pub fn book(title: impl Into<String>, pages: u32) -> Self {
        Self {
            kind: ItemKind::Book,
            title: title.into(),
            creators: String::new(),
            tags: String::new(),
            group: String::new(),
            description: String::new(),
            pages,
        }
    }

    pub fn is_book(&self) -> bool {
        self.kind == ItemKind::Book
    }

    /// The text fields the shelf classifier looks at.
    pub fn book_text(&self) -> BookText<'_> {
        BookText {
            title: &self.title,
            tags: &self.tags,
            group: &self.group,
            description: &self.description,
        }
    }
}

/// Borrowed view of the four text fields used for classification.
#[derive(Debug, Clone, Copy, Default)]
pub struct BookText<'a> {
    pub title: &'a str,
    pub tags: &'a str,
    pub group: &'a str,
    pub description: &'a str,
}

impl BookText<'_> {
    /// Lowercased concatenation of all four fields, space separated.
    pub fn combined_lowercase(&self) -> String {
        format!(
            "{} {} {} {}",
            self.title, self.tags, self.group, self.description
        )
        .to_lowercase()
    }
}

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// A physical (shelf, row) slot. Rows are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    pub shelf: &'static str,
    pub row: u32,
}

impl Location {
    pub const fn new(shelf: &'static str, row: u32) -> Self {
        Self { shelf, row }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} row {}", self.shelf, self.row)
    }
}

// ---------------------------------------------------------------------------
// ShelfDefinition / ShelfLayout
// ---------------------------------------------------------------------------

/// Static description of one bookcase. Widths and depths are in inches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShelfDefinition {
    /// Stable identifier referenced by classification rules (e.g. `office_a`).
    pub id: String,
    /// Display name; derived from the id when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Number of rows on the shelf.
    pub rows: u32,
    /// Usable width of a single row.
    pub width: f64,
    /// Depth of a single row.
    pub depth: f64,
    /// One label per row, top to bottom.
    #[serde(default)]
    pub row_labels: Vec<String>,
}

impl ShelfDefinition {
    fn new(id: &str, rows: u32, width: f64, depth: f64, labels: &[&str]) -> Self {
        Self {
            id: id.into(),
            name: None,
            rows,
            width,
            depth,
            row_labels: labels.iter().map(|l| (*l).to_string()).collect(),
        }
    }

    /// Total usable width across all rows.
    pub fn available_width(&self) -> f64 {
        f64::from(self.rows) * self.width
    }

    /// Human-readable name: explicit `name`, or the id title-cased
    /// (`office_a` → `Office A`).
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => title_case_id(&self.id),
        }
    }

    /// Label of the given 1-based row, if one is defined.
    pub fn row_label(&self, row: u32) -> Option<&str> {
        let idx = usize::try_from(row.checked_sub(1)?).ok()?;
        self.row_labels.get(idx).map(String::as_str)
    }

    pub fn has_row(&self, row: u32) -> bool {
        (1..=self.rows).contains(&row)
    }
}

fn title_case_id(id: &str) -> String {
    id.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Ordered, immutable set of shelves available to the organizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShelfLayout {
    shelves: Vec<ShelfDefinition>,
}

impl ShelfLayout {
    /// Build a layout, checking that it is usable for space calculations.
    pub fn new(shelves: Vec<ShelfDefinition>) -> Result<Self> {
        let layout = Self { shelves };
        layout.validate()?;
        Ok(layout)
    }

    pub fn shelves(&self) -> &[ShelfDefinition] {
        &self.shelves
    }

    pub fn shelf(&self, id: &str) -> Option<&ShelfDefinition> {
        self.shelves.iter().find(|s| s.id == id)
    }

    /// Whether `location` names an existing shelf and row.
    pub fn contains(&self, location: Location) -> bool {
        self.shelf(location.shelf)
            .is_some_and(|shelf| shelf.has_row(location.row))
    }

    /// Check the layout for empty shelves, bad widths, duplicate ids and
    /// row label mismatches.
    pub fn validate(&self) -> Result<()> {
        if self.shelves.is_empty() {
            return Err(ShelfmarkError::validation("shelf layout has no shelves"));
        }

        for (i, shelf) in self.shelves.iter().enumerate() {
            if shelf.id.trim().is_empty() {
                return Err(ShelfmarkError::validation(format!(
                    "shelf #{} has an empty id",
                    i + 1
                )));
            }
            if self.shelves[..i].iter().any(|s| s.id == shelf.id) {
                return Err(ShelfmarkError::validation(format!(
                    "duplicate shelf id '{}'",
                    shelf.id
                )));
            }
            if shelf.rows == 0 {
                return Err(ShelfmarkError::validation(format!(
                    "shelf '{}' has 0 rows",
                    shelf.id
                )));
            }
            if !(shelf.width.is_finite() && shelf.width > 0.0) {
                return Err(ShelfmarkError::validation(format!(
                    "shelf '{}' must have a positive width, got {}",
                    shelf.id, shelf.width
                )));
            }
            if !shelf.row_labels.is_empty() && shelf.row_labels.len() != shelf.rows as usize {
                return Err(ShelfmarkError::validation(format!(
                    "shelf '{}' has {} rows but {} row labels",
                    shelf.id,
                    shelf.rows,
                    shelf.row_labels.len()
                )));
            }
        }

        Ok(())
    }
}

impl Default for ShelfLayout {
    /// The six-shelf home layout the default rule sets are written against.
    fn default() -> Self {
        Self {
            shelves: vec![
                ShelfDefinition::new(
                    "office_a",
                    5,
                    32.0,
                    26.0,
                    &[
                        "Core Language Learning",
                        "Essential Programming & Math",
                        "Core Science Textbooks",
                        "Essential Philosophy",
                        "Professional Writing & Development",
                    ],
                ),
                ShelfDefinition::new(
                    "office_b",
                    4,
                    32.0,
                    26.0,
                    &[
                        "Philosophy & Political Thought",
                        "Academic Textbooks & References",
                        "Essays & Collections",
                        "Gaming & Strategy",
                    ],
                ),
                ShelfDefinition::new(
                    "dining",
                    3,
                    24.0,
                    24.0,
                    &[
                        "Japanese Language & Asian Cooking",
                        "Chinese Language & Global Cooking",
                        "Other Languages & Kitchen References",
                    ],
                ),
                ShelfDefinition::new(
                    "hallway",
                    2,
                    16.0,
                    16.0,
                    &[
                        "History & Historical Works",
                        "Literature, Fiction & Classics",
                    ],
                ),
                ShelfDefinition::new("crate_h", 1, 32.0, 12.0, &["General Overflow Storage"]),
                ShelfDefinition::new(
                    "crate_v",
                    1,
                    12.0,
                    32.0,
                    &["Mathematics, Science & References"],
                ),
            ],
        }
    }
}
