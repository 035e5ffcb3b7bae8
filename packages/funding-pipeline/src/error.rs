//! Typed errors for the funding pipeline.
//!
//! Only [`PipelineError`] can fail a whole run. Every other kind is
//! recovered at the level of a single record or listing and ends up in
//! that listing's output row.

use thiserror::Error;

use crate::types::run::RunStage;

/// Whole-run failures.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// None of the configured input sources yielded any data.
    #[error("no input data for portal {portal}: tried {tried} source(s)")]
    InputUnavailable { portal: String, tried: usize },

    /// A run is already in progress on this pipeline.
    #[error("a run is already in progress (stage: {stage})")]
    AlreadyRunning { stage: RunStage },
}

/// A single input record could not be turned into a listing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("record {index} is malformed: {reason}")]
    RecordMalformed { index: usize, reason: String },
}

/// Listing collaborator failures.
#[derive(Debug, Error)]
pub enum ListError {
    /// The portal has no listing site configured.
    #[error("portal {portal} has no listing site configured")]
    NotConfigured { portal: String },

    /// HTTP request failed
    #[error("HTTP error fetching {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx response
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// Invalid URL in configuration or in a scraped link
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// A configured CSS selector does not parse
    #[error("invalid selector: {selector}")]
    InvalidSelector { selector: String },
}

/// Text extractor failures. Recovered per listing.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// HTTP request failed
    #[error("HTTP error fetching {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx response
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// The page was fetched but no visible text was found
    #[error("no content detected at {url}")]
    Empty { url: String },
}

/// Judge call failures. Recovered per listing as an `Error` verdict.
#[derive(Debug, Error)]
pub enum JudgeError {
    /// Network or API failure talking to the LLM
    #[error("judge call failed: {0}")]
    Call(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The LLM answered with nothing
    #[error("judge returned an empty response")]
    EmptyResponse,
}

/// The judge answered but no relevance marker could be found.
///
/// Recovered per listing as an `Unknown` verdict; the best-effort summary
/// is carried so the row still shows something useful.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerdictParseError {
    #[error("no relevance marker found in judge response")]
    Unparseable { fallback_summary: String },
}

/// Checkpoint serialization or write failures. Logged, never fatal.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error writing {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A keyword, reference or checkpoint file could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid CSV in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// Result type alias for whole-run operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Result type alias for lister operations.
pub type ListResult<T> = std::result::Result<T, ListError>;

/// Result type alias for extractor operations.
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

/// Result type alias for judge operations.
pub type JudgeResult<T> = std::result::Result<T, JudgeError>;

/// Result type alias for checkpoint export.
pub type ExportResult<T> = std::result::Result<T, ExportError>;

/// Result type alias for file loading.
pub type LoadResult<T> = std::result::Result<T, LoadError>;
