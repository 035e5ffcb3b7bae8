//! Lister implementations.

pub mod html;

pub use html::{parse_listing_page, HtmlLister, ListingPage};
