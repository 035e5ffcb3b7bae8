//! Per-listing collaborator handles for the worker pool.

use std::sync::Arc;

use super::extractor::Extractor;
use super::judge::Judge;

/// The extractor and judge one in-flight listing works with.
#[derive(Clone)]
pub struct Collaborators {
    pub extractor: Arc<dyn Extractor>,
    pub judge: Arc<dyn Judge>,
}

impl Collaborators {
    pub fn new(extractor: Arc<dyn Extractor>, judge: Arc<dyn Judge>) -> Self {
        Self { extractor, judge }
    }
}

/// Hands out collaborators to each in-flight listing.
///
/// Implementations backed by non-shareable resources (a browser session,
/// a per-connection client) create a fresh pair per call; stateless HTTP
/// collaborators can share one pair, see [`SharedHandles`].
pub trait HandleFactory: Send + Sync {
    fn handles(&self) -> Collaborators;
}

impl<F> HandleFactory for F
where
    F: Fn() -> Collaborators + Send + Sync,
{
    fn handles(&self) -> Collaborators {
        self()
    }
}

/// Factory that gives every listing the same shared pair.
#[derive(Clone)]
pub struct SharedHandles(Collaborators);

impl SharedHandles {
    pub fn new(extractor: Arc<dyn Extractor>, judge: Arc<dyn Judge>) -> Self {
        Self(Collaborators::new(extractor, judge))
    }
}

impl HandleFactory for SharedHandles {
    fn handles(&self) -> Collaborators {
        self.0.clone()
    }
}
