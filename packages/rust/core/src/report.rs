//! Static HTML report for a shelf organization.
//!
//! The output is a single self-contained document: inline CSS, no scripts,
//! no external resources. All catalogue text goes through [`escape_html`].

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use shelfmark_shared::{InventoryRecord, ItemKind, ShelfDefinition, ShelfLayout};

use crate::space::{ShelfUsage, SpaceReport};

/// Everything the renderer needs. Nothing is recomputed here.
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    /// All ingested records, including non-books (used for the summary counts).
    pub records: &'a [InventoryRecord],
    pub space: &'a SpaceReport,
    pub layout: &'a ShelfLayout,
    pub generated_at: DateTime<Utc>,
}

const STYLE: &str = r#"
        body { font-family: Arial, sans-serif; margin: 20px; background-color: #f5f5f5; }
        .container { max-width: 1200px; margin: 0 auto; background: white; padding: 20px; border-radius: 8px; }
        h1 { color: #2c3e50; text-align: center; border-bottom: 3px solid #3498db; padding-bottom: 10px; }
        h2 { color: #34495e; border-left: 4px solid #3498db; padding-left: 10px; }
        .summary { background: #ecf0f1; padding: 15px; border-radius: 5px; margin-bottom: 20px; }
        .shelf { margin-bottom: 30px; border: 1px solid #ddd; border-radius: 5px; overflow: hidden; }
        .shelf-header { background: #3498db; color: white; padding: 10px; font-weight: bold; }
        .row { border-bottom: 1px solid #eee; }
        .row-header { background: #ecf0f1; padding: 8px; font-weight: bold; display: flex; justify-content: space-between; }
        table { width: 100%; border-collapse: collapse; }
        th, td { padding: 8px; text-align: left; border-bottom: 1px solid #ddd; }
        th { background-color: #f8f9fa; }
        tr:nth-child(even) { background-color: #f8f9fa; }
        .width-estimate { color: #7f8c8d; font-size: 0.9em; }
        .space-info { padding: 5px; border-radius: 3px; margin: 4px 0; }
        .over-capacity { background: #f8d7da; }
        .near-capacity { background: #fff3cd; }
        .good-capacity { background: #d1ecf1; }
        .notes { margin-top: 30px; padding: 15px; background: #f8f9fa; border-radius: 5px; }
"#;

const NOTES: [&str; 4] = [
    "Width estimates are based on page count: about 0.5\" under 100 pages, 1.0\" for 200-300 pages, 1.5\" for 500-750 pages.",
    "Actual widths vary with paper type, binding and publisher.",
    "Leave 10-15% free space on each shelf for easy access and future additions.",
    "Video games and music CDs are not placed on shelves; store them separately.",
];

/// Render the organization guide as one HTML document.
#[instrument(skip_all, fields(records = input.records.len(), shelves = input.layout.shelves().len()))]
pub fn render_report(input: &ReportInput<'_>) -> String {
    let mut html = String::with_capacity(16 * 1024);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str(
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    html.push_str("    <title>Library Organization Guide</title>\n");
    html.push_str(&format!("    <style>{STYLE}    </style>\n"));
    html.push_str("</head>\n<body>\n<div class=\"container\">\n");
    html.push_str("<h1>📚 Library Organization Guide</h1>\n");

    push_summary(&mut html, input);
    push_utilization(&mut html, input);

    for shelf in input.layout.shelves() {
        if let Some(usage) = input.space.shelf(&shelf.id) {
            push_shelf(&mut html, shelf, usage);
        }
    }

    html.push_str("<div class=\"notes\">\n<h3>Notes</h3>\n<ul>\n");
    for note in NOTES {
        html.push_str(&format!("    <li>{}</li>\n", escape_html(note)));
    }
    html.push_str("</ul>\n</div>\n");

    html.push_str("</div>\n</body>\n</html>\n");

    debug!(bytes = html.len(), "rendered report");
    html
}

fn push_summary(html: &mut String, input: &ReportInput<'_>) {
    let count = |kind: ItemKind| input.records.iter().filter(|r| r.kind == kind).count();

    html.push_str("<div class=\"summary\">\n<h2>Collection Summary</h2>\n");
    html.push_str(&format!(
        "<p><strong>Total Books:</strong> {}</p>\n",
        count(ItemKind::Book)
    ));
    html.push_str(&format!(
        "<p><strong>Total Video Games:</strong> {}</p>\n",
        count(ItemKind::VideoGame)
    ));
    html.push_str(&format!(
        "<p><strong>Total Music CDs:</strong> {}</p>\n",
        count(ItemKind::Music)
    ));
    html.push_str(&format!(
        "<p><strong>Organization Date:</strong> {}</p>\n",
        input.generated_at.format("%Y-%m-%d %H:%M UTC")
    ));
    html.push_str("</div>\n");
}

fn push_utilization(html: &mut String, input: &ReportInput<'_>) {
    html.push_str("<div class=\"summary\">\n<h2>Space Utilization Overview</h2>\n");

    for shelf in input.layout.shelves() {
        let Some(usage) = input.space.shelf(&shelf.id) else {
            continue;
        };
        let band = usage.band();
        html.push_str(&format!(
            "<div class=\"space-info {class}\" data-shelf=\"{id}\">\n\
             <strong>{name}:</strong> {util:.1}% utilization \
             ({used:.1}\" used of {available}\" available)\n\
             <span style=\"margin-left: 10px;\">{label}</span>\n</div>\n",
            class = band.css_class(),
            id = escape_html(&shelf.id),
            name = escape_html(&shelf.display_name()),
            util = usage.utilization,
            used = usage.total_width,
            available = usage.available_width,
            label = band.label(),
        ));
    }

    html.push_str("</div>\n");
}

fn push_shelf(html: &mut String, shelf: &ShelfDefinition, usage: &ShelfUsage) {
    html.push_str(&format!(
        "<div class=\"shelf\" id=\"shelf-{}\">\n",
        escape_html(&shelf.id)
    ));
    html.push_str(&format!(
        "<div class=\"shelf-header\">{name} ({width}\" × {depth}\" × {rows} rows) \
         - {util:.1}% utilized</div>\n",
        name = escape_html(&shelf.display_name()),
        width = shelf.width,
        depth = shelf.depth,
        rows = shelf.rows,
        util = usage.utilization,
    ));

    for (&row_num, row) in &usage.rows {
        let heading = match shelf.row_label(row_num) {
            Some(label) => format!("Row {row_num}: {}", escape_html(label)),
            None => format!("Row {row_num}"),
        };

        html.push_str("<div class=\"row\">\n<div class=\"row-header\">\n");
        html.push_str(&format!("    <span>{heading}</span>\n"));
        html.push_str(&format!(
            "    <span class=\"width-estimate\">{:.1}\" estimated width ({} books)</span>\n",
            row.width,
            row.books.len()
        ));
        html.push_str("</div>\n<table>\n");
        html.push_str(
            "<thead><tr><th>Title</th><th>Author</th><th>Pages</th><th>Est. Width</th></tr></thead>\n",
        );
        html.push_str("<tbody>\n");

        for book in row.books_by_title() {
            let pages = if book.pages > 0 {
                book.pages.to_string()
            } else {
                "Unknown".to_string()
            };
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{pages}</td><td class=\"width-estimate\">{:.2}\"</td></tr>\n",
                escape_html(&book.title),
                escape_html(&book.author),
                book.width,
            ));
        }

        html.push_str("</tbody>\n</table>\n</div>\n");
    }

    html.push_str("</div>\n");
}

/// Escape `& < > " '` for use in HTML text and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}
