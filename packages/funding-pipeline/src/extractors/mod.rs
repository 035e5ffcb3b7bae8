//! Extractor implementations.

pub mod http;

pub use http::{extract_text, HttpExtractor, SelectorGroup};
