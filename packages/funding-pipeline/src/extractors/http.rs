//! Detail-page text extraction over plain HTTP.

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::debug;

use crate::error::{ExtractError, ExtractResult};
use crate::http::{build_client, element_text, DEFAULT_TIMEOUT};
use crate::traits::extractor::Extractor;

/// Separator between the parts of a multi-selector group.
pub const PART_SEPARATOR: &str = "\n\n---\n\n";

/// Selectors whose texts are joined into one candidate extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorGroup(pub Vec<String>);

impl SelectorGroup {
    pub fn single(css: impl Into<String>) -> Self {
        Self(vec![css.into()])
    }
}

impl<S: Into<String>> FromIterator<S> for SelectorGroup {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Default groups, tried in order: EU topic description plus its
/// accordion, then the UKRI and generic content containers.
pub fn default_groups() -> Vec<SelectorGroup> {
    vec![
        ["div.showMore--three-lines", "div.govuk-accordion"]
            .into_iter()
            .collect(),
        SelectorGroup::single(".opportunity-detail__content"),
        SelectorGroup::single(".main-content"),
        SelectorGroup::single(".content"),
        SelectorGroup::single("main"),
    ]
}

/// Fetches a page and returns the first non-empty selector group's text.
pub struct HttpExtractor {
    client: reqwest::Client,
    groups: Vec<SelectorGroup>,
}

impl HttpExtractor {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            groups: default_groups(),
        }
    }

    /// Extractor with the default client settings.
    pub fn with_defaults() -> reqwest::Result<Self> {
        Ok(Self::new(build_client(DEFAULT_TIMEOUT)?))
    }

    pub fn with_groups(mut self, groups: Vec<SelectorGroup>) -> Self {
        self.groups = groups;
        self
    }
}

#[async_trait]
impl Extractor for HttpExtractor {
    async fn extract(&self, url: &str) -> ExtractResult<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ExtractError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let html = response.text().await.map_err(|source| ExtractError::Http {
            url: url.to_string(),
            source,
        })?;

        let text = extract_text(&html, &self.groups);
        debug!(url = %url, chars = text.len(), "Extracted page text");

        if text.is_empty() {
            return Err(ExtractError::Empty {
                url: url.to_string(),
            });
        }
        Ok(text)
    }
}

/// Text of the first group that yields anything. Unparseable selectors
/// are skipped.
pub fn extract_text(html: &str, groups: &[SelectorGroup]) -> String {
    let document = Html::parse_document(html);

    for group in groups {
        let parts: Vec<String> = group
            .0
            .iter()
            .filter_map(|css| Selector::parse(css).ok())
            .filter_map(|selector| document.select(&selector).next().map(|el| element_text(&el)))
            .filter(|text| !text.is_empty())
            .collect();

        if !parts.is_empty() {
            return parts.join(PART_SEPARATOR);
        }
    }

    String::new()
}
