//! Accumulator for result identifiers gathered across page fetches.

use std::sync::{PoisonError, RwLock};

/// Append-only, thread-safe list of result identifiers.
///
/// Duplicates are kept: overlapping pages produce repeated entries.
#[derive(Debug, Default)]
pub struct LinkCollector {
    links: RwLock<Vec<String>>,
}

impl LinkCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_links<I>(&self, new_links: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.links
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(new_links);
    }

    /// Snapshot of every collected identifier in append order.
    pub fn links(&self) -> Vec<String> {
        self.links
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn count(&self) -> usize {
        self.links.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn into_links(self) -> Vec<String> {
        self.links.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}
