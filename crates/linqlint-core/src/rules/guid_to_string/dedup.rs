//! Per-run suppression of repeated reports at the same range.

use std::collections::HashSet;

/// `(line, column, end_line, end_column)` of a reported range.
pub type DedupKey = (usize, usize, usize, usize);

/// Drops repeated reports of the same range within one run.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<DedupKey>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` the first time `key` is offered.
    pub fn first_sighting(&mut self, key: DedupKey) -> bool {
        self.seen.insert(key)
    }
}
