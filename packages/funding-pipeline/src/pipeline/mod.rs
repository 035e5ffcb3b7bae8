//! Pipeline orchestrator.
//!
//! A run moves through `Parsing → KeywordFiltering → JudgeEnrichment →
//! Merging → Done`. Only missing input fails a run; extraction and judge
//! failures are recorded on the affected listing and the run carries on.
//!
//! # Example
//!
//! ```rust,ignore
//! use funding_pipeline::{Pipeline, PortalConfig, ReferenceProject};
//!
//! let pipeline = Pipeline::new(PortalConfig::eu(data_dir), extractor, judge);
//! let result = pipeline.run_portal(&ReferenceProject::defaults()).await?;
//! println!("{} approved", result.stats.approved);
//! ```

pub mod merge;

pub use merge::{dedup_by_url, merge_verdicts, Deduped};

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;
use futures::stream::{self, StreamExt};
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::error::{ExtractError, PipelineError, Result};
use crate::export::{CheckpointFile, CheckpointStore};
use crate::keywords::{classify, KeywordTable};
use crate::parser::{parse_fixed_fields, parse_fixed_file, parse_records, parse_tabular_file, ParseOutcome};
use crate::relevance::RelevanceJudge;
use crate::traits::extractor::{Extractor, NO_CONTENT};
use crate::traits::handles::{Collaborators, HandleFactory, SharedHandles};
use crate::traits::judge::Judge;
use crate::traits::lister::Lister;
use crate::types::config::{InputSource, PipelineConfig, PortalConfig};
use crate::types::listing::Listing;
use crate::types::reference::ReferenceProject;
use crate::types::run::{PipelineResult, PipelineRow, RunStage, RunStats};
use crate::types::table::{Checkpoint, Table};
use crate::types::verdict::JudgeVerdict;

struct PipelineState {
    stage: RunStage,
    checkpoints: HashMap<Checkpoint, Table>,
}

/// Runs the keyword and judge stages over one portal's listings.
pub struct Pipeline {
    portal: PortalConfig,
    config: PipelineConfig,
    keywords: KeywordTable,
    lister: Option<Arc<dyn Lister>>,
    handles: Arc<dyn HandleFactory>,
    state: RwLock<PipelineState>,
    running: AtomicBool,
}

/// Clears the running flag when a run ends, however it ends.
struct RunGuard<'a>(&'a AtomicBool);

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Pipeline {
    /// Create a pipeline sharing one extractor and judge across listings.
    pub fn new(portal: PortalConfig, extractor: Arc<dyn Extractor>, judge: Arc<dyn Judge>) -> Self {
        Self::with_handles(portal, Arc::new(SharedHandles::new(extractor, judge)))
    }

    /// Create a pipeline that asks `handles` for collaborators per listing.
    pub fn with_handles(portal: PortalConfig, handles: Arc<dyn HandleFactory>) -> Self {
        Self {
            portal,
            config: PipelineConfig::default(),
            keywords: KeywordTable::default(),
            lister: None,
            handles,
            state: RwLock::new(PipelineState {
                stage: RunStage::Idle,
                checkpoints: HashMap::new(),
            }),
            running: AtomicBool::new(false),
        }
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_keywords(mut self, keywords: KeywordTable) -> Self {
        self.keywords = keywords;
        self
    }

    /// Lister used by [`InputSource::Lister`].
    pub fn with_lister(mut self, lister: Arc<dyn Lister>) -> Self {
        self.lister = Some(lister);
        self
    }

    pub fn portal(&self) -> &PortalConfig {
        &self.portal
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Current stage of the latest run.
    pub fn stage(&self) -> RunStage {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .stage
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Latest table saved at `checkpoint`, if any run has reached it.
    pub fn checkpoint(&self, checkpoint: Checkpoint) -> Option<Table> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .checkpoints
            .get(&checkpoint)
            .cloned()
    }

    /// Load checkpoint tables left in the output dir by an earlier process.
    ///
    /// Tables already held from a run in this process win. Returns the
    /// checkpoints loaded.
    pub fn restore_checkpoints(&self) -> Vec<Checkpoint> {
        let Some(store) = self.store() else {
            return Vec::new();
        };

        let loaded: Vec<(Checkpoint, Table)> = Checkpoint::ALL
            .into_iter()
            .filter_map(|checkpoint| match store.read(checkpoint) {
                Ok(table) => table.map(|table| (checkpoint, table)),
                Err(e) => {
                    warn!(checkpoint = %checkpoint, error = %e, "Failed to restore checkpoint");
                    None
                }
            })
            .collect();

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let restored: Vec<Checkpoint> = loaded
            .into_iter()
            .filter_map(|(checkpoint, table)| {
                if state.checkpoints.contains_key(&checkpoint) {
                    return None;
                }
                state.checkpoints.insert(checkpoint, table);
                Some(checkpoint)
            })
            .collect();

        if !restored.is_empty() {
            info!(portal = %self.portal.id, restored = ?restored, "Checkpoints restored");
        }
        restored
    }

    /// Checkpoint files this pipeline writes; empty without an output dir.
    pub fn checkpoint_files(&self) -> Vec<CheckpointFile> {
        self.store().map(|store| store.files()).unwrap_or_default()
    }

    fn store(&self) -> Option<CheckpointStore> {
        self.config
            .output_dir
            .as_ref()
            .map(|dir| CheckpointStore::new(dir, &self.portal.checkpoint_stem))
    }

    /// Run over the portal's configured sources.
    pub async fn run_portal(&self, references: &[ReferenceProject]) -> Result<PipelineResult> {
        let sources = self.portal.sources.clone();
        self.run(&sources, references).await
    }

    /// Run over `sources`, tried in order until one yields data.
    pub async fn run(
        &self,
        sources: &[InputSource],
        references: &[ReferenceProject],
    ) -> Result<PipelineResult> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(PipelineError::AlreadyRunning {
                stage: self.stage(),
            });
        }
        let _guard = RunGuard(&self.running);

        let run_id = Uuid::now_v7();
        let span = info_span!("pipeline_run", portal = %self.portal.id, run_id = %run_id);

        async {
            let result = self.execute(run_id, sources, references).await;
            if result.is_err() {
                self.set_stage(RunStage::Failed);
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn execute(
        &self,
        run_id: Uuid,
        sources: &[InputSource],
        references: &[ReferenceProject],
    ) -> Result<PipelineResult> {
        let started_at = Utc::now();
        let mut stats = RunStats::default();

        // Parsing
        self.set_stage(RunStage::Parsing);
        let outcome = self
            .load_input(sources)
            .await
            .ok_or_else(|| PipelineError::InputUnavailable {
                portal: self.portal.id.clone(),
                tried: sources.len(),
            })?;
        stats.skipped_records = outcome.skipped;
        stats.truncated_lines = outcome.truncated_lines;

        // Keyword filtering
        self.set_stage(RunStage::KeywordFiltering);
        let deduped = dedup_by_url(outcome.listings);
        stats.duplicate_urls = deduped.duplicates;
        stats.listings = deduped.listings.len();

        let tagged = self.tag(deduped.listings);
        let relevant: Vec<PipelineRow> = tagged
            .iter()
            .filter(|row| row.keyword.is_relevant())
            .cloned()
            .collect();
        stats.relevant = relevant.len();
        info!(
            listings = stats.listings,
            relevant = stats.relevant,
            skipped = stats.skipped_records,
            duplicates = stats.duplicate_urls,
            "Keyword filtering complete"
        );
        self.save_checkpoint(Checkpoint::Tagged, Table::tagged(&tagged));

        // Judge enrichment
        self.set_stage(RunStage::JudgeEnrichment);
        let verdicts = self.enrich(&relevant, references).await;

        // Merging
        self.set_stage(RunStage::Merging);
        let judged = merge_verdicts(relevant, verdicts);
        stats.count_decisions(judged.iter().filter_map(|row| row.judge.as_ref()));

        self.save_checkpoint(Checkpoint::Judged, Table::judged(&judged));
        self.save_checkpoint(
            Checkpoint::Approved,
            Table::judged(judged.iter().filter(|row| row.is_approved())),
        );

        self.set_stage(RunStage::Done);
        info!(
            judged = stats.judged,
            approved = stats.approved,
            unknown = stats.unknown,
            errors = stats.errors,
            "Run complete"
        );

        Ok(PipelineResult {
            run_id,
            portal: self.portal.id.clone(),
            started_at,
            finished_at: Utc::now(),
            tagged,
            judged,
            stats,
        })
    }

    /// First source that parses to something other than `Empty`.
    async fn load_input(&self, sources: &[InputSource]) -> Option<ParseOutcome> {
        for source in sources {
            let outcome = match source {
                InputSource::FixedFieldFile(path) => parse_fixed_file(path),
                InputSource::TabularFile(path) => parse_tabular_file(path),
                InputSource::Inline(text) => parse_fixed_fields(text),
                InputSource::Lister => {
                    let Some(lister) = &self.lister else {
                        warn!("Lister source configured but no lister attached");
                        continue;
                    };
                    match lister.list(&self.portal).await {
                        Ok(records) => parse_records(records),
                        Err(e) => {
                            warn!(lister = lister.name(), error = %e, "Lister failed");
                            continue;
                        }
                    }
                }
            };

            if outcome.is_empty_input() {
                debug!(source = %source.describe(), "Source empty, trying next");
                continue;
            }

            info!(
                source = %source.describe(),
                listings = outcome.listings.len(),
                "Loaded listings"
            );
            return Some(outcome);
        }

        warn!(tried = sources.len(), "No input source yielded data");
        None
    }

    fn tag(&self, listings: Vec<Listing>) -> Vec<PipelineRow> {
        listings
            .into_iter()
            .map(|listing| {
                let text = listing
                    .searchable_text(self.portal.keyword_scope, listing.description.as_deref());
                let verdict = classify(&text, &self.keywords);
                PipelineRow::new(listing, verdict)
            })
            .collect()
    }

    /// Judge every row with at most `workers` listings in flight.
    ///
    /// Results are keyed by url so completion order does not matter.
    async fn enrich(
        &self,
        rows: &[PipelineRow],
        references: &[ReferenceProject],
    ) -> HashMap<String, JudgeVerdict> {
        let workers = self.config.workers.max(1);
        debug!(listings = rows.len(), workers, "Judging relevant listings");

        // Listings not yet picked up by a worker.
        let waiting = AtomicUsize::new(rows.len());

        let tasks = (0..rows.len()).map(|i| {
            let row = &rows[i];
            let handles = self.handles.handles();
            let waiting = &waiting;
            async move {
                waiting.fetch_sub(1, Ordering::SeqCst);
                let verdict = self
                    .judge_listing(&row.listing, handles, references, waiting)
                    .await;
                (row.listing.url.clone(), verdict)
            }
        });

        stream::iter(tasks)
            .buffer_unordered(workers)
            .collect::<HashMap<_, _>>()
            .await
    }

    async fn judge_listing(
        &self,
        listing: &Listing,
        handles: Collaborators,
        references: &[ReferenceProject],
        waiting: &AtomicUsize,
    ) -> JudgeVerdict {
        let text = match handles.extractor.extract(&listing.url).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                let e = ExtractError::Empty {
                    url: listing.url.clone(),
                };
                match self.extraction_fallback(&e) {
                    Some(text) => text,
                    None => return JudgeVerdict::error(&e),
                }
            }
            Err(e) => match self.extraction_fallback(&e) {
                Some(text) => text,
                None => return JudgeVerdict::error(&e),
            },
        };

        let verdict = RelevanceJudge::new(handles.judge, &self.portal.label)
            .with_config(&self.config)
            .judge(&text, references)
            .await;

        info!(
            url = %listing.url,
            decision = verdict.decision.label(),
            "Listing judged"
        );

        // Pace judge calls; nothing to pace once every listing has started.
        if !self.config.judge_delay.is_zero() && waiting.load(Ordering::SeqCst) > 0 {
            tokio::time::sleep(self.config.judge_delay).await;
        }
        verdict
    }

    /// Placeholder text to judge instead, or `None` when extraction is
    /// required.
    fn extraction_fallback(&self, error: &ExtractError) -> Option<String> {
        warn!(error = %error, "Extraction failed");
        if self.config.require_extraction {
            None
        } else {
            Some(NO_CONTENT.to_string())
        }
    }

    fn set_stage(&self, stage: RunStage) {
        debug!(stage = %stage, "Stage");
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .stage = stage;
    }

    /// Keep the table for polling and write it out when an output dir is
    /// configured. A new Tagged table drops the previous run's later
    /// checkpoints.
    fn save_checkpoint(&self, checkpoint: Checkpoint, table: Table) {
        if let Some(store) = self.store() {
            if let Err(e) = store.write(checkpoint, &table) {
                warn!(checkpoint = %checkpoint, error = %e, "Failed to write checkpoint");
            }
        }

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if checkpoint == Checkpoint::Tagged {
            state.checkpoints.clear();
        }
        state.checkpoints.insert(checkpoint, table);
    }
}
