//! Paginated HTML listing scraper (reqwest + CSS selectors).
//!
//! Static HTML only: no JavaScript rendering. Works on card-style
//! listing pages such as the UKRI opportunity finder.

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ListError, ListResult};
use crate::http::{build_client, element_text, DEFAULT_TIMEOUT};
use crate::traits::lister::Lister;
use crate::types::config::{ListingSite, PortalConfig};
use crate::types::listing::RawRecord;

/// One parsed listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    pub records: Vec<RawRecord>,
    /// Absolute URL of the next page, if pagination continues.
    pub next_url: Option<String>,
}

/// Lister that walks a portal's listing pages over plain HTTP.
pub struct HtmlLister {
    client: reqwest::Client,
}

impl HtmlLister {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Lister with the default client settings.
    pub fn with_defaults() -> reqwest::Result<Self> {
        Ok(Self::new(build_client(DEFAULT_TIMEOUT)?))
    }

    async fn fetch_html(&self, url: &str) -> ListResult<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ListError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ListError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| ListError::Http {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl Lister for HtmlLister {
    async fn list(&self, portal: &PortalConfig) -> ListResult<Vec<RawRecord>> {
        let site = portal
            .listing_site
            .as_ref()
            .ok_or_else(|| ListError::NotConfigured {
                portal: portal.id.clone(),
            })?;

        let mut records = Vec::new();
        let mut page_url = site.start_url.clone();

        for page in 1..=site.max_pages {
            debug!(portal = %portal.id, page, url = %page_url, "Fetching listing page");

            let html = match self.fetch_html(&page_url).await {
                Ok(html) => html,
                Err(e) if records.is_empty() => return Err(e),
                Err(e) => {
                    warn!(portal = %portal.id, page, error = %e, "Stopping pagination early");
                    break;
                }
            };

            let parsed = parse_listing_page(&html, site)?;
            debug!(portal = %portal.id, page, found = parsed.records.len(), "Parsed listing page");
            records.extend(parsed.records);

            match parsed.next_url {
                Some(next) if next != page_url => page_url = next,
                _ => break,
            }

            if !site.page_delay.is_zero() {
                tokio::time::sleep(site.page_delay).await;
            }
        }

        info!(portal = %portal.id, records = records.len(), "Listing complete");
        Ok(records)
    }

    fn name(&self) -> &str {
        "html"
    }
}

fn selector(css: &str) -> ListResult<Selector> {
    Selector::parse(css).map_err(|_| ListError::InvalidSelector {
        selector: css.to_string(),
    })
}

/// Extract listing cards and the next-page link from one page.
///
/// Relative hrefs are resolved against the site's base URL. A next link
/// whose class mentions `disabled` ends pagination.
pub fn parse_listing_page(html: &str, site: &ListingSite) -> ListResult<ListingPage> {
    let base = Url::parse(&site.base_url).map_err(|_| ListError::InvalidUrl {
        url: site.base_url.clone(),
    })?;
    let item_link = selector(&site.selectors.item_link)?;
    let status = selector(&site.selectors.status)?;
    let date = selector(&site.selectors.date)?;
    let next_page = selector(&site.selectors.next_page)?;

    let document = Html::parse_document(html);

    let records = document
        .select(&item_link)
        .filter_map(|link| {
            let href = link.value().attr("href")?;
            let url = base.join(href).ok()?;
            let title = element_text(&link).replace('\n', " ");

            let mut record = RawRecord::new(title, url.to_string());
            if let Some(card) = enclosing_card(&link, &site.selectors.card_class) {
                record.status = first_text(&card, &status);
                record.open_date = first_text(&card, &date);
            }
            Some(record)
        })
        .collect();

    let next_url = document
        .select(&next_page)
        .next()
        .filter(|a| {
            !a.value()
                .attr("class")
                .is_some_and(|class| class.contains("disabled"))
        })
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| base.join(href).ok())
        .map(|url| url.to_string());

    Ok(ListingPage { records, next_url })
}

/// Nearest `div` ancestor whose class contains `card_class`.
fn enclosing_card<'a>(link: &ElementRef<'a>, card_class: &str) -> Option<ElementRef<'a>> {
    link.ancestors().filter_map(ElementRef::wrap).find(|el| {
        el.value().name() == "div"
            && el
                .value()
                .attr("class")
                .is_some_and(|class| class.contains(card_class))
    })
}

fn first_text(scope: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(|el| element_text(&el).replace('\n', " "))
        .filter(|text| !text.is_empty())
}
