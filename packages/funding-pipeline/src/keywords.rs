//! Keyword stage: bilingual dictionary and substring classification.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::LoadResult;
use crate::export;
use crate::types::verdict::KeywordVerdict;

/// Ordered English → French keyword dictionary.
///
/// Matching uses the English keys; insertion order decides the order of
/// `matched_terms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordTable(IndexMap<String, String>);

impl KeywordTable {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Add a term; re-inserting an existing key keeps its position.
    pub fn insert(&mut self, term: impl Into<String>, translation: impl Into<String>) {
        self.0.insert(term.into(), translation.into());
    }

    pub fn with_term(mut self, term: impl Into<String>, translation: impl Into<String>) -> Self {
        self.insert(term, translation);
        self
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn translation(&self, term: &str) -> Option<&str> {
        self.0.get(term).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Load a table from a JSON object file. Key order is preserved.
    pub fn load_json(path: &Path) -> LoadResult<Self> {
        export::load_json(path)
    }
}

impl Default for KeywordTable {
    fn default() -> Self {
        [
            ("strategic consulting", "conseil stratégique"),
            ("technical assistance", "assistance technique"),
            ("institutional support", "appui institutionnel"),
            ("innovation support", "accompagnement à l'innovation"),
            ("capacity building", "développement de capacités"),
            ("project management", "gestion de projet"),
            ("deeptech", "deeptech"),
            ("biotechnology", "biotechnologie"),
            ("artificial intelligence", "intelligence artificielle"),
            ("machine learning", "machine learning"),
            ("sustainable development", "développement durable"),
            ("digital transformation", "transformation numérique"),
            ("startup ecosystem", "écosystème startup"),
            ("entrepreneurship", "entrepreneuriat"),
            ("incubation", "incubation"),
            ("acceleration", "accélération"),
        ]
        .into_iter()
        .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for KeywordTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Classify text against the table.
///
/// Case-insensitive substring match of every key; no stemming. Blank keys
/// never match.
pub fn classify(text: &str, table: &KeywordTable) -> KeywordVerdict {
    let haystack = text.to_lowercase();
    let matched = table
        .terms()
        .filter(|term| !term.trim().is_empty())
        .filter(|term| haystack.contains(&term.to_lowercase()))
        .map(str::to_string)
        .collect();
    KeywordVerdict::from_matches(matched)
}
