//! Change detection across successive snapshots.

use std::collections::BTreeSet;

use crate::aggregate::Nations;

/// Remembers which nations were collapsed in the previous snapshot.
///
/// The remembered set is replaced by every snapshot, never merged into. A
/// nation that recovers is forgotten and is reported again if it collapses
/// a second time.
#[derive(Debug, Default)]
pub struct CollapseTracker {
    known_collapsed: BTreeSet<String>,
}

impl CollapseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn known_collapsed(&self) -> &BTreeSet<String> {
        &self.known_collapsed
    }

    /// Returns the nations collapsed in `nations` that were not collapsed in
    /// the previous snapshot, then makes `nations` the previous snapshot.
    pub fn detect_new_collapses(&mut self, nations: &Nations) -> BTreeSet<String> {
        let current: BTreeSet<String> = nations
            .iter()
            .filter(|(_, n)| n.collapsed)
            .map(|(name, _)| name.clone())
            .collect();

        let new = current.difference(&self.known_collapsed).cloned().collect();
        self.known_collapsed = current;
        new
    }
}
