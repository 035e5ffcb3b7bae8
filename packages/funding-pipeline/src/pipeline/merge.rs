//! Dedup and verdict merge, both keyed by listing url.

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::warn;

use crate::types::listing::Listing;
use crate::types::run::PipelineRow;
use crate::types::verdict::JudgeVerdict;

/// Listings with duplicate urls collapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deduped {
    pub listings: Vec<Listing>,
    /// Records that overwrote an earlier one.
    pub duplicates: usize,
}

/// Collapse listings sharing a url.
///
/// The later record wins for every field; the row stays where the url
/// first appeared.
pub fn dedup_by_url(listings: Vec<Listing>) -> Deduped {
    let mut by_url: IndexMap<String, Listing> = IndexMap::with_capacity(listings.len());
    let mut duplicates = 0;

    for listing in listings {
        if let Some(previous) = by_url.insert(listing.url.clone(), listing) {
            duplicates += 1;
            warn!(url = %previous.url, "Duplicate url, keeping later record");
        }
    }

    Deduped {
        listings: by_url.into_values().collect(),
        duplicates,
    }
}

/// Left-join verdicts onto rows by url.
///
/// Every row is kept exactly once; a row without a verdict keeps `None`.
/// Verdicts for urls not among the rows are dropped.
pub fn merge_verdicts(
    rows: Vec<PipelineRow>,
    mut verdicts: HashMap<String, JudgeVerdict>,
) -> Vec<PipelineRow> {
    let merged = rows
        .into_iter()
        .map(|mut row| {
            row.judge = verdicts.remove(&row.listing.url);
            row
        })
        .collect();

    if !verdicts.is_empty() {
        warn!(unmatched = verdicts.len(), "Verdicts without a matching listing");
    }
    merged
}
