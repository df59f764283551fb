//! CSV decoding for inventory exports.

use std::io::Read;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use tracing::{debug, info, instrument, warn};

use shelfmark_shared::{InventoryRecord, ItemKind, Result, ShelfmarkError};

/// Positions of the columns we read, looked up once from the header row.
/// Columns the export does not have read as empty.
#[derive(Debug, Default)]
struct Columns {
    item_type: Option<usize>,
    title: Option<usize>,
    creators: Option<usize>,
    tags: Option<usize>,
    group: Option<usize>,
    description: Option<usize>,
    length: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Self {
        let find = |name: &str| headers.iter().position(|h| h == name);
        Self {
            item_type: find("item_type"),
            title: find("title"),
            creators: find("creators"),
            tags: find("tags"),
            group: find("group"),
            description: find("description"),
            length: find("length"),
        }
    }

    /// Normalise one row, or `None` when the kind is not one we catalogue.
    /// Fields past the end of a short row read as empty.
    fn record(&self, row: &StringRecord) -> Option<InventoryRecord> {
        let field = |idx: Option<usize>| idx.and_then(|i| row.get(i)).unwrap_or("");
        let kind: ItemKind = field(self.item_type).parse().ok()?;
        Some(InventoryRecord {
            kind,
            title: field(self.title).to_string(),
            creators: field(self.creators).to_string(),
            tags: field(self.tags).to_string(),
            group: field(self.group).to_string(),
            description: field(self.description).to_string(),
            pages: parse_pages(field(self.length)),
        })
    }
}

/// Page count from the `length` column. Anything that is not a whole number
/// (blank, "12.5", "n/a") and any negative value becomes 0.
fn parse_pages(raw: &str) -> u32 {
    match raw.trim().parse::<i64>() {
        Ok(n) => u32::try_from(n.max(0)).unwrap_or(u32::MAX),
        Err(_) => 0,
    }
}

/// Decode an export from any reader.
///
/// Quoted fields may span lines, extra columns are ignored and short rows are
/// tolerated. Rows of unrecognized kinds are skipped.
pub fn parse_inventory<R: Read>(input: R) -> std::result::Result<Vec<InventoryRecord>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let columns = Columns::from_headers(reader.headers()?);
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for row in reader.records() {
        match columns.record(&row?) {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }

    debug!(kept = records.len(), skipped, "decoded inventory rows");
    Ok(records)
}

/// Read one export file. Any I/O, encoding or CSV error fails the whole file.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_inventory(path: &Path) -> Result<Vec<InventoryRecord>> {
    let file = std::fs::File::open(path).map_err(|e| ShelfmarkError::io(path, e))?;
    parse_inventory(std::io::BufReader::new(file)).map_err(|e| ShelfmarkError::csv(path, e))
}

/// Result of reading a single source file.
#[derive(Debug, Clone)]
pub struct SourceOutcome {
    pub path: PathBuf,
    /// Records contributed by this file (0 on failure).
    pub records: usize,
    /// Why the file was skipped, if it was.
    pub error: Option<String>,
}

/// All records from a batch of source files, plus per-file outcomes.
#[derive(Debug, Clone, Default)]
pub struct Ingested {
    pub records: Vec<InventoryRecord>,
    pub sources: Vec<SourceOutcome>,
}

impl Ingested {
    /// Number of records of the given kind.
    pub fn count(&self, kind: ItemKind) -> usize {
        self.records.iter().filter(|r| r.kind == kind).count()
    }

    pub fn failed_sources(&self) -> impl Iterator<Item = &SourceOutcome> {
        self.sources.iter().filter(|s| s.error.is_some())
    }
}

/// Read every file in order and concatenate their records.
///
/// Failures are logged and recorded in [`Ingested::sources`]; they never abort
/// the batch.
#[instrument(skip_all, fields(files = paths.len()))]
pub fn ingest_all(paths: &[PathBuf]) -> Ingested {
    let mut ingested = Ingested::default();

    for path in paths {
        match read_inventory(path) {
            Ok(records) => {
                info!(path = %path.display(), items = records.len(), "read inventory file");
                ingested.sources.push(SourceOutcome {
                    path: path.clone(),
                    records: records.len(),
                    error: None,
                });
                ingested.records.extend(records);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable inventory file");
                ingested.sources.push(SourceOutcome {
                    path: path.clone(),
                    records: 0,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    info!(total = ingested.records.len(), "inventory ingestion complete");
    ingested
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "item_type,title,creators,first_name,last_name,ean_isbn13,upc_isbn10,description,publisher,publish_date,group,tags,notes,price,length\n";

    fn parse(csv: &str) -> Vec<InventoryRecord> {
        parse_inventory(csv.as_bytes()).expect("parse csv")
    }

    #[test]
    fn parses_libib_style_export() {
        let csv = format!(
            "{HEADER}book,Genki I,Eri Banno,Eri,Banno,9784789014403,,\"An Integrated Course\",Japan Times,2011,Language,japanese,,,250\n"
        );
        let records = parse(&csv);
        assert_eq!(records.len(), 1);
        let genki = &records[0];
        assert_eq!(genki.kind, ItemKind::Book);
        assert_eq!(genki.title, "Genki I");
        assert_eq!(genki.creators, "Eri Banno");
        assert_eq!(genki.group, "Language");
        assert_eq!(genki.tags, "japanese");
        assert_eq!(genki.description, "An Integrated Course");
        assert_eq!(genki.pages, 250);
    }

    #[test]
    fn keeps_only_recognized_kinds() {
        let csv = "item_type,title\nbook,A\nvideogame,B\nmusic,C\nboardgame,D\nBook,E\n,F\n";
        let records = parse(csv);
        let kinds: Vec<ItemKind> = records.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![ItemKind::Book, ItemKind::VideoGame, ItemKind::Music]);
    }

    #[test]
    fn multiline_quoted_description() {
        let csv = "item_type,title,description,length\nbook,Republic,\"Line one\nline \"\"two\"\"\",400\n";
        let records = parse(csv);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].description, "Line one\nline \"two\"");
        assert_eq!(records[0].pages, 400);
    }

    #[test]
    fn missing_columns_become_empty_strings() {
        let records = parse("item_type,title\nbook,Only A Title\n");
        let r = &records[0];
        assert_eq!(r.creators, "");
        assert_eq!(r.tags, "");
        assert_eq!(r.group, "");
        assert_eq!(r.description, "");
        assert_eq!(r.pages, 0);
    }

    #[test]
    fn short_rows_are_tolerated() {
        let records = parse("item_type,title,creators,length\nbook,Short Row\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Short Row");
        assert_eq!(records[0].creators, "");
    }

    #[test]
    fn short_row_keeps_the_rest_of_the_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("library_books.csv");
        std::fs::write(
            &path,
            "item_type,title,creators,length\nbook,Good Book,Someone,120\nbook,Trailing Row Missing Length,Someone\n",
        )
        .expect("write");

        let ingested = ingest_all(std::slice::from_ref(&path));
        assert_eq!(ingested.failed_sources().count(), 0);
        let titles: Vec<&str> = ingested.records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Good Book", "Trailing Row Missing Length"]);
        assert_eq!(ingested.records[0].pages, 120);
        assert_eq!(ingested.records[1].pages, 0);
        assert_eq!(ingested.records[1].creators, "Someone");
    }

    #[test]
    fn row_shorter_than_item_type_column_is_skipped() {
        let records = parse("title,creators,item_type\nNo Kind\nHas Kind,Someone,book\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Has Kind");
    }

    #[test]
    fn malformed_page_counts_become_zero() {
        assert_eq!(parse_pages(""), 0);
        assert_eq!(parse_pages("abc"), 0);
        assert_eq!(parse_pages("12.5"), 0);
        assert_eq!(parse_pages("-40"), 0);
        assert_eq!(parse_pages(" 320 "), 320);
        assert_eq!(parse_pages("+75"), 75);
        assert_eq!(parse_pages("99999999999"), u32::MAX);
    }

    #[test]
    fn read_inventory_reports_missing_file() {
        let err = read_inventory(Path::new("/nonexistent/library_books.csv")).unwrap_err();
        assert!(matches!(err, ShelfmarkError::Io { .. }));
    }

    #[test]
    fn invalid_utf8_fails_the_whole_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("library_bad.csv");
        let mut bytes = b"item_type,title\nbook,Good\nbook,".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);
        std::fs::write(&path, bytes).expect("write");

        let err = read_inventory(&path).unwrap_err();
        assert!(matches!(err, ShelfmarkError::Csv { .. }));
    }

    #[test]
    fn ingest_all_skips_failing_files_and_keeps_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let first = dir.path().join("library_books.csv");
        let broken = dir.path().join("library_missing.csv");
        let second = dir.path().join("library_media.csv");
        std::fs::write(&first, "item_type,title\nbook,One\nbook,Two\n").expect("write");
        std::fs::write(&second, "item_type,title\nmusic,Three\nvideogame,Four\n").expect("write");

        let ingested = ingest_all(&[first.clone(), broken.clone(), second.clone()]);

        let titles: Vec<&str> = ingested.records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["One", "Two", "Three", "Four"]);
        assert_eq!(ingested.count(ItemKind::Book), 2);
        assert_eq!(ingested.count(ItemKind::Music), 1);
        assert_eq!(ingested.count(ItemKind::VideoGame), 1);

        assert_eq!(ingested.sources.len(), 3);
        let failed: Vec<&Path> = ingested.failed_sources().map(|s| s.path.as_path()).collect();
        assert_eq!(failed, vec![broken.as_path()]);
        assert_eq!(ingested.sources[1].records, 0);
    }
}
