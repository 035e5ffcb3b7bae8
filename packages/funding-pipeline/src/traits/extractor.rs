//! Extractor trait: long-form text for a listing.

use async_trait::async_trait;

use crate::error::ExtractResult;

/// Placeholder judged in place of a page whose text could not be extracted.
pub const NO_CONTENT: &str = "No content detected.";

/// Fetches the visible description text of a listing's detail page.
///
/// Calls are slow and fallible; the pipeline recovers every error.
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, url: &str) -> ExtractResult<String>;
}
