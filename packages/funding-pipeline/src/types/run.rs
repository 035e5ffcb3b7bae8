//! Run state and per-run results.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::listing::Listing;
use super::table::{Checkpoint, Table};
use super::verdict::{Decision, JudgeVerdict, KeywordVerdict};

/// Where a pipeline run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStage {
    Idle,
    Parsing,
    KeywordFiltering,
    JudgeEnrichment,
    Merging,
    Done,
    Failed,
}

impl RunStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStage::Idle => "idle",
            RunStage::Parsing => "parsing",
            RunStage::KeywordFiltering => "keyword_filtering",
            RunStage::JudgeEnrichment => "judge_enrichment",
            RunStage::Merging => "merging",
            RunStage::Done => "done",
            RunStage::Failed => "failed",
        }
    }

    /// Whether a run is between `Parsing` and `Merging`.
    pub fn is_active(&self) -> bool {
        !matches!(self, RunStage::Idle | RunStage::Done | RunStage::Failed)
    }
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counters collected over one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Listings after parsing and dedup.
    pub listings: usize,
    /// Input records skipped as malformed.
    pub skipped_records: usize,
    /// Lines of a trailing partial fixed-field group.
    pub truncated_lines: usize,
    /// Records that overwrote an earlier record with the same url.
    pub duplicate_urls: usize,
    /// Listings the keyword stage marked relevant.
    pub relevant: usize,
    /// Relevant listings that received a judge verdict.
    pub judged: usize,
    /// Verdicts with decision `Yes`.
    pub approved: usize,
    /// Verdicts with decision `Unknown`.
    pub unknown: usize,
    /// Verdicts with decision `Error`.
    pub errors: usize,
}

impl RunStats {
    /// Tally judge decisions into the counters.
    pub fn count_decisions<'a>(&mut self, verdicts: impl IntoIterator<Item = &'a JudgeVerdict>) {
        for verdict in verdicts {
            self.judged += 1;
            match verdict.decision {
                Decision::Yes => self.approved += 1,
                Decision::Unknown => self.unknown += 1,
                Decision::Error => self.errors += 1,
                Decision::No => {}
            }
        }
    }
}

/// A listing with the verdicts attached to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineRow {
    pub listing: Listing,
    pub keyword: KeywordVerdict,
    pub judge: Option<JudgeVerdict>,
}

impl PipelineRow {
    pub fn new(listing: Listing, keyword: KeywordVerdict) -> Self {
        Self {
            listing,
            keyword,
            judge: None,
        }
    }

    pub fn is_approved(&self) -> bool {
        self.judge.as_ref().is_some_and(JudgeVerdict::is_approved)
    }
}

/// Output of one completed run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub run_id: Uuid,
    pub portal: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Every listing with its keyword verdict, in input order.
    pub tagged: Vec<PipelineRow>,
    /// Keyword-relevant listings with their judge verdicts.
    pub judged: Vec<PipelineRow>,
    pub stats: RunStats,
}

impl PipelineResult {
    pub fn approved(&self) -> impl Iterator<Item = &PipelineRow> {
        self.judged.iter().filter(|row| row.is_approved())
    }

    /// Render one checkpoint as a table.
    pub fn table(&self, checkpoint: Checkpoint) -> Table {
        match checkpoint {
            Checkpoint::Tagged => Table::tagged(&self.tagged),
            Checkpoint::Judged => Table::judged(&self.judged),
            Checkpoint::Approved => Table::judged(self.approved()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_display() {
        assert_eq!(RunStage::JudgeEnrichment.to_string(), "judge_enrichment");
        assert!(RunStage::Parsing.is_active());
        assert!(!RunStage::Done.is_active());
    }

    #[test]
    fn test_count_decisions() {
        let verdicts = vec![
            JudgeVerdict::new(Decision::Yes, "", ""),
            JudgeVerdict::new(Decision::No, "", ""),
            JudgeVerdict::new(Decision::Unknown, "", ""),
            JudgeVerdict::new(Decision::Error, "", ""),
        ];

        let mut stats = RunStats::default();
        stats.count_decisions(&verdicts);

        assert_eq!(stats.judged, 4);
        assert_eq!(stats.approved, 1);
        assert_eq!(stats.unknown, 1);
        assert_eq!(stats.errors, 1);
    }
}
