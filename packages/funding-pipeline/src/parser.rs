//! Listing parser: fixed-field text and tabular records into [`Listing`]s.
//!
//! Parsing never fails as a whole. Malformed records are skipped and
//! counted; unreadable or empty input yields [`InputStatus::Empty`].

use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ParseError;
use crate::types::listing::{normalize_optional, Listing, RawRecord};

/// Lines per record in the fixed-field format.
pub const FIELDS_PER_RECORD: usize = 5;

/// Status used when a record carries none.
pub const UNKNOWN_STATUS: &str = "unknown";

/// Whether the input held anything at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputStatus {
    Parsed,
    /// Input was empty or could not be read.
    Empty,
}

/// Result of parsing one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutcome {
    pub listings: Vec<Listing>,
    /// Records dropped as malformed.
    pub skipped: usize,
    /// Lines of a trailing group shorter than a full record.
    pub truncated_lines: usize,
    pub status: InputStatus,
}

impl ParseOutcome {
    pub fn empty() -> Self {
        Self {
            listings: Vec::new(),
            skipped: 0,
            truncated_lines: 0,
            status: InputStatus::Empty,
        }
    }

    pub fn is_empty_input(&self) -> bool {
        self.status == InputStatus::Empty
    }
}

/// Parse 5-line `Title:/Link:/Status:/Start_date:/Deadline:` records.
///
/// Blank lines are ignored and the rest are trimmed before grouping, so
/// record boundaries are positional. Each value is what follows the first
/// `:`; a line without one is taken whole.
pub fn parse_fixed_fields(text: &str) -> ParseOutcome {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        return ParseOutcome::empty();
    }

    let chunks = lines.chunks_exact(FIELDS_PER_RECORD);
    let truncated_lines = chunks.remainder().len();
    if truncated_lines > 0 {
        warn!(
            truncated_lines,
            first_line = chunks.remainder()[0],
            "Trailing partial record dropped"
        );
    }

    let records = chunks.map(|chunk| RawRecord {
        title: Some(field_value(chunk[0]).to_string()),
        url: Some(field_value(chunk[1]).to_string()),
        status: Some(field_value(chunk[2]).to_string()),
        open_date: Some(field_value(chunk[3]).to_string()),
        deadline: Some(field_value(chunk[4]).to_string()),
        description: None,
    });

    let mut outcome = parse_records(records);
    outcome.truncated_lines = truncated_lines;
    outcome.status = InputStatus::Parsed;
    outcome
}

fn field_value(line: &str) -> &str {
    match line.split_once(':') {
        Some((_, value)) => value.trim(),
        None => line,
    }
}

/// Normalize raw records into listings, skipping malformed ones.
pub fn parse_records(records: impl IntoIterator<Item = RawRecord>) -> ParseOutcome {
    let mut outcome = ParseOutcome::empty();

    for (index, raw) in records.into_iter().enumerate() {
        outcome.status = InputStatus::Parsed;
        match record_to_listing(index, raw) {
            Ok(listing) => outcome.listings.push(listing),
            Err(e) => {
                warn!(error = %e, "Skipping record");
                outcome.skipped += 1;
            }
        }
    }

    debug!(
        listings = outcome.listings.len(),
        skipped = outcome.skipped,
        "Parsed records"
    );
    outcome
}

/// Turn one raw record into a listing.
pub fn record_to_listing(index: usize, raw: RawRecord) -> Result<Listing, ParseError> {
    let title = required(raw.title).ok_or_else(|| ParseError::RecordMalformed {
        index,
        reason: "missing title".into(),
    })?;
    let url = required(raw.url).ok_or_else(|| ParseError::RecordMalformed {
        index,
        reason: "missing url".into(),
    })?;
    let status = required(raw.status).unwrap_or_else(|| UNKNOWN_STATUS.to_string());

    Ok(Listing {
        title,
        url,
        status,
        open_date: raw.open_date.as_deref().and_then(normalize_optional),
        deadline: raw.deadline.as_deref().and_then(normalize_optional),
        description: raw.description.as_deref().and_then(normalize_optional),
    })
}

fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Header normalization shared by the CSV and JSON paths: trimmed,
/// lowercased, inner whitespace as `_`.
pub fn normalize_header(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Listing fields a tabular column can feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Url,
    Status,
    OpenDate,
    Deadline,
    Description,
}

impl Field {
    const ALL: [Field; 6] = [
        Field::Title,
        Field::Url,
        Field::Status,
        Field::OpenDate,
        Field::Deadline,
        Field::Description,
    ];

    /// Normalized headers accepted for this field, highest priority first.
    fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::Title => &["title"],
            Field::Url => &["link", "url"],
            Field::Status => &["status"],
            Field::OpenDate => &["start_date", "opening_date", "open_date", "dates"],
            Field::Deadline => &["deadline", "closing_date"],
            Field::Description => &["description"],
        }
    }
}

/// Column positions feeding each [`Field`], in alias priority order.
///
/// Inputs often carry several aliases of one field (a merged sheet has
/// both `Link` and `URL`). The first alias with a non-blank value wins
/// and the rest are ignored, as are unknown columns.
#[derive(Debug, Default)]
struct ColumnMap {
    columns: [Vec<usize>; 6],
}

impl ColumnMap {
    fn new<'h>(headers: impl IntoIterator<Item = &'h str>) -> Self {
        let headers: Vec<String> = headers.into_iter().map(normalize_header).collect();

        let mut map = Self::default();
        for (slot, field) in map.columns.iter_mut().zip(Field::ALL) {
            *slot = field
                .aliases()
                .iter()
                .filter_map(|alias| headers.iter().position(|h| h == alias))
                .collect();
        }
        map
    }

    fn record<'v>(&self, value: impl Fn(usize) -> Option<&'v str>) -> RawRecord {
        let pick = |field: Field| {
            self.columns[field as usize]
                .iter()
                .filter_map(|&column| value(column))
                .map(str::trim)
                .find(|v| !v.is_empty())
                .map(str::to_string)
        };

        RawRecord {
            title: pick(Field::Title),
            url: pick(Field::Url),
            status: pick(Field::Status),
            open_date: pick(Field::OpenDate),
            deadline: pick(Field::Deadline),
            description: pick(Field::Description),
        }
    }
}

/// Parse CSV with a header row.
pub fn parse_csv(text: &str) -> ParseOutcome {
    if text.trim().is_empty() {
        return ParseOutcome::empty();
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let columns = match reader.headers() {
        Ok(headers) => ColumnMap::new(headers.iter()),
        Err(e) => {
            warn!(error = %e, "Unreadable CSV header");
            return ParseOutcome::empty();
        }
    };

    let mut skipped = 0;
    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        match row {
            Ok(row) => records.push(columns.record(|column| row.get(column))),
            Err(e) => {
                let err = ParseError::RecordMalformed {
                    index,
                    reason: e.to_string(),
                };
                warn!(error = %err, "Skipping CSV row");
                skipped += 1;
            }
        }
    }

    let mut outcome = parse_records(records);
    outcome.skipped += skipped;
    if outcome.skipped > 0 {
        outcome.status = InputStatus::Parsed;
    }
    outcome
}

/// Parse a JSON array of objects.
///
/// Scalar values are taken as text; `null` counts as absent.
pub fn parse_json(text: &str) -> ParseOutcome {
    let items = match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            warn!("JSON input is not an array of records");
            return ParseOutcome::empty();
        }
        Err(e) => {
            warn!(error = %e, "Unreadable JSON input");
            return ParseOutcome::empty();
        }
    };

    let mut skipped = 0;
    let mut records = Vec::new();
    for (index, item) in items.into_iter().enumerate() {
        match json_record(item) {
            Some(raw) => records.push(raw),
            None => {
                let err = ParseError::RecordMalformed {
                    index,
                    reason: "record is not an object".into(),
                };
                warn!(error = %err, "Skipping JSON record");
                skipped += 1;
            }
        }
    }

    let mut outcome = parse_records(records);
    outcome.skipped += skipped;
    if outcome.skipped > 0 {
        outcome.status = InputStatus::Parsed;
    }
    outcome
}

fn json_record(item: Value) -> Option<RawRecord> {
    let Value::Object(fields) = item else {
        return None;
    };

    let (keys, values): (Vec<String>, Vec<String>) = fields
        .into_iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::Null => return None,
                Value::String(s) => s,
                other => other.to_string(),
            };
            Some((key, text))
        })
        .unzip();

    let columns = ColumnMap::new(keys.iter().map(String::as_str));
    Some(columns.record(|column| values.get(column).map(String::as_str)))
}

/// Read and parse a fixed-field text file. Unreadable files are `Empty`.
pub fn parse_fixed_file(path: &Path) -> ParseOutcome {
    match std::fs::read_to_string(path) {
        Ok(text) => parse_fixed_fields(&text),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Fixed-field file unavailable");
            ParseOutcome::empty()
        }
    }
}

/// Read and parse a CSV or JSON file, chosen by extension (`.json` is
/// JSON, anything else CSV). Unreadable files are `Empty`.
pub fn parse_tabular_file(path: &Path) -> ParseOutcome {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Tabular file unavailable");
            return ParseOutcome::empty();
        }
    };

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        parse_json(&text)
    } else {
        parse_csv(&text)
    }
}
