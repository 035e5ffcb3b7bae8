//! Configuration types for pipeline runs and portals.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Which listing fields the keyword stage searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordScope {
    Title,
    /// Title plus url; EU urls often carry the topic slug.
    TitleAndUrl,
}

/// Where a run gets its listings from, tried in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Text file of 5-line `Title:/Link:/Status:/Start_date:/Deadline:` records.
    FixedFieldFile(PathBuf),
    /// CSV (header row) or JSON (array of objects) file; chosen by extension.
    TabularFile(PathBuf),
    /// Fixed-field text already in memory.
    Inline(String),
    /// Ask the pipeline's lister to scrape the portal.
    Lister,
}

impl InputSource {
    /// Short description for logs and errors.
    pub fn describe(&self) -> String {
        match self {
            InputSource::FixedFieldFile(path) => format!("fixed-field file {}", path.display()),
            InputSource::TabularFile(path) => format!("tabular file {}", path.display()),
            InputSource::Inline(_) => "inline text".to_string(),
            InputSource::Lister => "portal lister".to_string(),
        }
    }
}

/// CSS selectors for a portal's listing pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingSelectors {
    /// Anchor carrying each listing's title and href.
    pub item_link: String,
    /// Class fragment identifying the card that wraps one listing.
    pub card_class: String,
    pub status: String,
    pub date: String,
    /// Anchor to the next result page.
    pub next_page: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            item_link: "h3.card__title a".to_string(),
            card_class: "card".to_string(),
            status: ".card__status".to_string(),
            date: ".card__date".to_string(),
            next_page: "a.pagination__next".to_string(),
        }
    }
}

/// A portal's paginated listing site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingSite {
    pub start_url: String,
    /// Base for resolving relative hrefs.
    pub base_url: String,
    pub selectors: ListingSelectors,
    pub max_pages: usize,
    /// Pause between page fetches.
    pub page_delay: Duration,
}

impl ListingSite {
    pub fn new(start_url: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            start_url: start_url.into(),
            base_url: base_url.into(),
            selectors: ListingSelectors::default(),
            max_pages: 50,
            page_delay: Duration::from_secs(3),
        }
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }
}

/// Per-portal settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    /// Short id used in routes and file names (`eu`, `uk`).
    pub id: String,
    /// How the judge prompt names the call ("européen", ...).
    pub label: String,
    pub keyword_scope: KeywordScope,
    /// Input sources in fallback order.
    pub sources: Vec<InputSource>,
    pub listing_site: Option<ListingSite>,
    /// Prefix of checkpoint file names.
    pub checkpoint_stem: String,
}

impl PortalConfig {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            checkpoint_stem: id.clone(),
            id,
            label: label.into(),
            keyword_scope: KeywordScope::Title,
            sources: Vec::new(),
            listing_site: None,
        }
    }

    /// EU Funding & Tenders: listings come from exported fixed-field text files.
    pub fn eu(data_dir: &Path) -> Self {
        Self::new("eu", "européen")
            .with_keyword_scope(KeywordScope::TitleAndUrl)
            .with_source(InputSource::FixedFieldFile(data_dir.join("projets_EU_All.txt")))
            .with_source(InputSource::FixedFieldFile(data_dir.join("AllProjects_ue.txt")))
    }

    /// UKRI: listings are scraped from the opportunity finder, with a
    /// previously exported table as fallback.
    pub fn uk(data_dir: &Path) -> Self {
        Self::new("uk", "britannique (UKRI)")
            .with_source(InputSource::Lister)
            .with_source(InputSource::TabularFile(data_dir.join("projets_UKRI_full.csv")))
            .with_listing_site(ListingSite::new(
                "https://www.ukri.org/opportunity/?filter_council%5B%5D=all&filter_status%5B%5D=open&filter_status%5B%5D=closed&sort_by=closing_date&sort_order=desc",
                "https://www.ukri.org",
            ))
    }

    pub fn with_keyword_scope(mut self, scope: KeywordScope) -> Self {
        self.keyword_scope = scope;
        self
    }

    pub fn with_source(mut self, source: InputSource) -> Self {
        self.sources.push(source);
        self
    }

    pub fn with_sources(mut self, sources: Vec<InputSource>) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_listing_site(mut self, site: ListingSite) -> Self {
        self.listing_site = Some(site);
        self
    }

    pub fn with_checkpoint_stem(mut self, stem: impl Into<String>) -> Self {
        self.checkpoint_stem = stem.into();
        self
    }
}

/// Configuration for a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Listing text is cut to this many words before prompting.
    ///
    /// Default: 800.
    pub word_limit: usize,

    /// At most this many reference projects go into the prompt.
    ///
    /// Default: 3.
    pub max_references: usize,

    /// Pause after each judge call, per worker.
    ///
    /// Default: 10 seconds. Set to zero when the judge paces itself.
    pub judge_delay: Duration,

    /// Listings enriched concurrently. 1 means strictly sequential.
    ///
    /// Default: 1.
    pub workers: usize,

    /// When true, a listing whose text cannot be extracted gets an
    /// `Error` verdict instead of being judged on a placeholder.
    ///
    /// Default: false.
    pub require_extraction: bool,

    /// Directory checkpoint files are written to. `None` keeps
    /// checkpoints in memory only.
    pub output_dir: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            word_limit: 800,
            max_references: 3,
            judge_delay: Duration::from_secs(10),
            workers: 1,
            require_extraction: false,
            output_dir: None,
        }
    }
}

impl PipelineConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_word_limit(mut self, words: usize) -> Self {
        self.word_limit = words;
        self
    }

    pub fn with_max_references(mut self, max: usize) -> Self {
        self.max_references = max;
        self
    }

    pub fn with_judge_delay(mut self, delay: Duration) -> Self {
        self.judge_delay = delay;
        self
    }

    /// Set the worker count; zero is treated as one.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_require_extraction(mut self, required: bool) -> Self {
        self.require_extraction = required;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.word_limit, 800);
        assert_eq!(config.max_references, 3);
        assert_eq!(config.judge_delay, Duration::from_secs(10));
        assert_eq!(config.workers, 1);
        assert!(!config.require_extraction);
    }

    #[test]
    fn test_zero_workers_means_one() {
        assert_eq!(PipelineConfig::new().with_workers(0).workers, 1);
    }

    #[test]
    fn test_portal_presets() {
        let dir = Path::new("data");

        let eu = PortalConfig::eu(dir);
        assert_eq!(eu.keyword_scope, KeywordScope::TitleAndUrl);
        assert_eq!(
            eu.sources[0],
            InputSource::FixedFieldFile(dir.join("projets_EU_All.txt"))
        );
        assert!(eu.listing_site.is_none());

        let uk = PortalConfig::uk(dir);
        assert_eq!(uk.sources[0], InputSource::Lister);
        assert_eq!(uk.listing_site.unwrap().base_url, "https://www.ukri.org");
    }
}
