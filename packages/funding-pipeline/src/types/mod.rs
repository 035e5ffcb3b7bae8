//! Core data types.

pub mod config;
pub mod listing;
pub mod reference;
pub mod run;
pub mod table;
pub mod verdict;

pub use config::{InputSource, KeywordScope, ListingSelectors, ListingSite, PipelineConfig, PortalConfig};
pub use listing::{normalize_optional, Listing, RawRecord};
pub use reference::ReferenceProject;
pub use run::{PipelineResult, PipelineRow, RunStage, RunStats};
pub use table::{Checkpoint, Table, JUDGE_COLUMNS, TAGGED_COLUMNS};
pub use verdict::{Decision, JudgeVerdict, KeywordVerdict};
