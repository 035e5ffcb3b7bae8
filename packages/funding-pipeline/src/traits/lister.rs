//! Lister trait: where raw listing records come from.

use async_trait::async_trait;

use crate::error::ListResult;
use crate::types::config::PortalConfig;
use crate::types::listing::RawRecord;

/// Yields raw listing records for a portal.
///
/// Records are normalized by the parser afterwards, so implementations
/// may return blank or placeholder fields as they found them.
#[async_trait]
pub trait Lister: Send + Sync {
    /// List every record the portal currently publishes.
    async fn list(&self, portal: &PortalConfig) -> ListResult<Vec<RawRecord>>;

    /// Name for logs.
    fn name(&self) -> &str {
        "lister"
    }
}
