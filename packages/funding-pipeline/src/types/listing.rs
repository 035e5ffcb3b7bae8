//! Listing records: raw scraped/tabular shape and the normalized entity.

use serde::{Deserialize, Serialize};

use crate::types::config::KeywordScope;

/// Placeholder values portals and spreadsheets use for "no date".
const ABSENT_MARKERS: [&str; 5] = ["none", "nan", "n/a", "null", "-"];

/// One funding opportunity.
///
/// Immutable once parsed; later stages attach verdicts next to it
/// instead of changing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub title: String,
    /// Unique key within a run.
    pub url: String,
    pub status: String,
    pub open_date: Option<String>,
    pub deadline: Option<String>,
    /// Summary text carried by the input itself, when it has one.
    #[serde(default)]
    pub description: Option<String>,
}

impl Listing {
    /// Create a listing with no dates.
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            status: status.into(),
            open_date: None,
            deadline: None,
            description: None,
        }
    }

    /// Set the opening date; blank or placeholder values stay absent.
    pub fn with_open_date(mut self, date: impl AsRef<str>) -> Self {
        self.open_date = normalize_optional(date.as_ref());
        self
    }

    /// Set the deadline; blank or placeholder values stay absent.
    pub fn with_deadline(mut self, date: impl AsRef<str>) -> Self {
        self.deadline = normalize_optional(date.as_ref());
        self
    }

    pub fn with_description(mut self, description: impl AsRef<str>) -> Self {
        self.description = normalize_optional(description.as_ref());
        self
    }

    /// Text the keyword stage searches.
    ///
    /// Title first, then the url when the scope asks for it, then any
    /// description fragment, separated by single spaces.
    pub fn searchable_text(&self, scope: KeywordScope, description: Option<&str>) -> String {
        let mut haystack = self.title.clone();
        if scope == KeywordScope::TitleAndUrl {
            haystack.push(' ');
            haystack.push_str(&self.url);
        }
        if let Some(description) = description.map(str::trim).filter(|d| !d.is_empty()) {
            haystack.push(' ');
            haystack.push_str(description);
        }
        haystack
    }
}

/// A listing record as it arrives from a lister or a tabular file.
///
/// Every field is optional here; [`crate::parser`] decides what is
/// malformed and which input column feeds which field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub open_date: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl RawRecord {
    /// Create a raw record from a title and url.
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_open_date(mut self, date: impl Into<String>) -> Self {
        self.open_date = Some(date.into());
        self
    }

    pub fn with_deadline(mut self, date: impl Into<String>) -> Self {
        self.deadline = Some(date.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Trim a scraped value; blank and placeholder values become `None`.
pub fn normalize_optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty()
        || ABSENT_MARKERS
            .iter()
            .any(|marker| trimmed.eq_ignore_ascii_case(marker))
    {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_dates_are_absent() {
        let listing = Listing::new("A", "http://x", "open")
            .with_open_date("None")
            .with_deadline("  ");

        assert_eq!(listing.open_date, None);
        assert_eq!(listing.deadline, None);
    }

    #[test]
    fn test_real_dates_are_trimmed() {
        let listing = Listing::new("A", "http://x", "open").with_deadline(" 2024-02-01 ");
        assert_eq!(listing.deadline.as_deref(), Some("2024-02-01"));
    }

    #[test]
    fn test_searchable_text_scopes() {
        let listing = Listing::new("Deeptech call", "https://ec.europa.eu/incubation", "open");

        assert_eq!(
            listing.searchable_text(KeywordScope::Title, None),
            "Deeptech call"
        );
        assert_eq!(
            listing.searchable_text(KeywordScope::TitleAndUrl, Some(" more ")),
            "Deeptech call https://ec.europa.eu/incubation more"
        );
    }

    #[test]
    fn test_blank_description_is_absent() {
        let listing = Listing::new("A", "http://x", "open").with_description(" n/a ");
        assert_eq!(listing.description, None);
    }
}
