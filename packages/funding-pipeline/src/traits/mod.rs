//! Collaborator traits.
//!
//! The pipeline owns no I/O of its own: listings, page text and judge
//! answers all come through these seams, so tests inject mocks and the
//! server injects HTTP-backed implementations.

pub mod extractor;
pub mod handles;
pub mod judge;
pub mod lister;
