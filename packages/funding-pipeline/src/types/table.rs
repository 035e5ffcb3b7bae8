//! Checkpoint tables: the tabular view of a run, as written to disk and
//! served over HTTP.

use std::fmt;
use std::io;

use indexmap::IndexMap;
use serde::ser::{Serialize, Serializer};

use super::run::PipelineRow;
use crate::error::ExportResult;

/// Columns of the Tagged checkpoint.
pub const TAGGED_COLUMNS: [&str; 7] = [
    "Title",
    "Link",
    "Status",
    "Start_date",
    "Deadline",
    "Pertinence",
    "Matching Word(s)",
];

/// Extra columns the Judged and Approved checkpoints carry.
pub const JUDGE_COLUMNS: [&str; 3] = ["Pertinence LLM", "Résumé LLM", "Réponse brute"];

/// The three points at which a run's results are saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Checkpoint {
    /// Every listing with its keyword verdict.
    Tagged,
    /// Keyword-relevant listings with judge verdicts.
    Judged,
    /// Judged listings the judge said `Yes` to.
    Approved,
}

impl Checkpoint {
    pub const ALL: [Checkpoint; 3] = [Checkpoint::Tagged, Checkpoint::Judged, Checkpoint::Approved];

    pub fn as_str(&self) -> &'static str {
        match self {
            Checkpoint::Tagged => "tagged",
            Checkpoint::Judged => "judged",
            Checkpoint::Approved => "approved",
        }
    }
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rows of string cells under named columns.
///
/// Absent values are empty cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Tagged-checkpoint table.
    pub fn tagged<'a>(rows: impl IntoIterator<Item = &'a PipelineRow>) -> Self {
        let mut table = Table::new(TAGGED_COLUMNS);
        table.rows = rows.into_iter().map(tagged_cells).collect();
        table
    }

    /// Judged-checkpoint table; rows without a verdict get empty judge cells.
    pub fn judged<'a>(rows: impl IntoIterator<Item = &'a PipelineRow>) -> Self {
        let mut table = Table::new(TAGGED_COLUMNS.iter().chain(JUDGE_COLUMNS.iter()).copied());
        table.rows = rows
            .into_iter()
            .map(|row| {
                let mut cells = tagged_cells(row);
                match &row.judge {
                    Some(verdict) => cells.extend([
                        verdict.decision.label().to_string(),
                        verdict.summary.clone(),
                        verdict.raw_response.clone(),
                    ]),
                    None => cells.extend(std::iter::repeat(String::new()).take(JUDGE_COLUMNS.len())),
                }
                cells
            })
            .collect();
        table
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Insert a constant first column, e.g. the portal a row came from.
    pub fn with_leading_column(mut self, name: impl Into<String>, value: &str) -> Self {
        self.columns.insert(0, name.into());
        for row in &mut self.rows {
            row.insert(0, value.to_string());
        }
        self
    }

    /// Append another table's rows. Columns are taken from `self`; rows of
    /// `other` are matched by column name and missing cells left empty.
    pub fn extend_from(&mut self, other: &Table) {
        if self.columns.is_empty() {
            self.columns = other.columns.clone();
        }
        let positions: Vec<Option<usize>> = self
            .columns
            .iter()
            .map(|col| other.columns.iter().position(|c| c == col))
            .collect();
        for row in &other.rows {
            self.rows.push(
                positions
                    .iter()
                    .map(|pos| pos.and_then(|i| row.get(i).cloned()).unwrap_or_default())
                    .collect(),
            );
        }
    }

    /// Rows as column-name → cell maps, in column order.
    pub fn records(&self) -> Vec<IndexMap<&str, &str>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .map(String::as_str)
                    .zip(row.iter().map(String::as_str))
                    .collect()
            })
            .collect()
    }

    /// Write the table as CSV with a header row.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> ExportResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(&self.columns)?;
        for row in &self.rows {
            csv_writer.write_record(row)?;
        }
        csv_writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// Read a table written by [`Table::write_csv`]: header row, then
    /// rows of the same width.
    pub fn read_csv<R: io::Read>(reader: R) -> Result<Self, csv::Error> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let columns = csv_reader.headers()?.iter().map(str::to_string).collect();
        let rows = csv_reader
            .records()
            .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
            .collect::<Result<_, _>>()?;
        Ok(Self { columns, rows })
    }

    pub fn to_csv_string(&self) -> ExportResult<String> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// JSON array of records.
    pub fn to_json_string(&self) -> ExportResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.records())
    }
}

fn tagged_cells(row: &PipelineRow) -> Vec<String> {
    let listing = &row.listing;
    vec![
        listing.title.clone(),
        listing.url.clone(),
        listing.status.clone(),
        listing.open_date.clone().unwrap_or_default(),
        listing.deadline.clone().unwrap_or_default(),
        row.keyword.label().to_string(),
        row.keyword.joined_terms(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::listing::Listing;
    use crate::types::verdict::{Decision, JudgeVerdict, KeywordVerdict};

    fn row(title: &str, judge: Option<JudgeVerdict>) -> PipelineRow {
        PipelineRow {
            listing: Listing::new(title, format!("http://x/{}", title), "open"),
            keyword: KeywordVerdict::from_matches(vec!["deeptech".into(), "incubation".into()]),
            judge,
        }
    }

    #[test]
    fn test_tagged_cells() {
        let table = Table::tagged(&[row("A", None)]);

        assert_eq!(table.columns.len(), 7);
        assert_eq!(
            table.rows[0],
            vec!["A", "http://x/A", "open", "", "", "Yes", "deeptech, incubation"]
        );
    }

    #[test]
    fn test_judged_cells() {
        let verdict = JudgeVerdict::new(Decision::Yes, "Good fit.", "Pertinence : Oui");
        let table = Table::judged(&[row("A", Some(verdict)), row("B", None)]);

        assert_eq!(table.columns[7], "Pertinence LLM");
        assert_eq!(&table.rows[0][7..], ["Oui", "Good fit.", "Pertinence : Oui"]);
        assert_eq!(&table.rows[1][7..], ["", "", ""]);
    }

    #[test]
    fn test_csv_quotes_joined_terms() {
        let csv = Table::tagged(&[row("A", None)]).to_csv_string().unwrap();
        let mut lines = csv.lines();

        assert_eq!(
            lines.next(),
            Some("Title,Link,Status,Start_date,Deadline,Pertinence,Matching Word(s)")
        );
        assert_eq!(
            lines.next(),
            Some(r#"A,http://x/A,open,,,Yes,"deeptech, incubation""#)
        );
    }

    #[test]
    fn test_json_records_keep_column_order() {
        let json = Table::tagged(&[row("A", None)]).to_json_string().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["Title"], "A");
        assert_eq!(value[0]["Matching Word(s)"], "deeptech, incubation");
        assert!(json.find("\"Title\"").unwrap() < json.find("\"Link\"").unwrap());
    }

    #[test]
    fn test_read_csv_keeps_multiline_cells() {
        let verdict = JudgeVerdict::new(Decision::No, "", "Pertinence : Non\nRésumé : -");
        let table = Table::judged(&[row("A", Some(verdict))]);
        let csv = table.to_csv_string().unwrap();

        assert_eq!(Table::read_csv(csv.as_bytes()).unwrap(), table);
    }

    #[test]
    fn test_combine_with_source_column() {
        let eu = Table::tagged(&[row("A", None)]).with_leading_column("Source", "eu");
        let uk = Table::tagged(&[row("B", None)]).with_leading_column("Source", "uk");

        let mut combined = Table::default();
        combined.extend_from(&eu);
        combined.extend_from(&uk);

        assert_eq!(combined.len(), 2);
        assert_eq!(combined.rows[1][0], "uk");
        assert_eq!(combined.rows[1][1], "B");
    }
}
