//! Funding-opportunity relevance pipeline
//!
//! Takes funding-call listings from a portal, tags them against a
//! bilingual keyword dictionary, asks an LLM judge whether each tagged
//! listing fits a set of reference projects, and merges everything into
//! checkpoint tables.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use funding_pipeline::{HttpExtractor, Pipeline, PipelineConfig, PortalConfig, ReferenceProject};
//! use funding_pipeline::testing::MockJudge;
//!
//! let pipeline = Pipeline::new(
//!     PortalConfig::eu(data_dir),
//!     Arc::new(HttpExtractor::with_defaults()?),
//!     Arc::new(MockJudge::new()),
//! )
//! .with_config(PipelineConfig::new().with_output_dir("out"));
//!
//! let result = pipeline.run_portal(&ReferenceProject::defaults()).await?;
//! ```
//!
//! # Modules
//!
//! - [`parser`] - Fixed-field and tabular input into listings
//! - [`keywords`] - Keyword dictionary and classification
//! - [`relevance`] - Judge prompt building and verdict parsing
//! - [`pipeline`] - Orchestrator, dedup and merge
//! - [`traits`] - Collaborator seams (Lister, Extractor, Judge)
//! - [`listers`], [`extractors`], [`judges`] - Provided implementations
//! - [`export`] - Checkpoint files
//! - [`testing`] - Mock implementations for testing

pub mod error;
pub mod export;
pub mod extractors;
pub mod http;
pub mod judges;
pub mod keywords;
pub mod listers;
pub mod parser;
pub mod pipeline;
pub mod relevance;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{
    ExportError, ExtractError, JudgeError, ListError, LoadError, ParseError, PipelineError,
    VerdictParseError,
};
pub use traits::{
    extractor::{Extractor, NO_CONTENT},
    handles::{Collaborators, HandleFactory, SharedHandles},
    judge::{Judge, JudgePrompt},
    lister::Lister,
};
pub use types::{
    Checkpoint, Decision, InputSource, JudgeVerdict, KeywordScope, KeywordVerdict, Listing,
    ListingSelectors, ListingSite, PipelineConfig, PipelineResult, PipelineRow, PortalConfig,
    RawRecord, ReferenceProject, RunStage, RunStats, Table,
};

pub use export::{CheckpointFile, CheckpointStore};
pub use extractors::HttpExtractor;
pub use judges::RateLimitedJudge;
pub use keywords::{classify, KeywordTable};
pub use listers::HtmlLister;
pub use parser::{InputStatus, ParseOutcome};
pub use pipeline::Pipeline;
pub use relevance::{parse_verdict, RelevanceJudge};

#[cfg(feature = "openai")]
pub use judges::OpenAIJudge;

// Re-export testing utilities
pub use testing::{MockExtractor, MockJudge, MockLister};
