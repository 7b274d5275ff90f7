//! Search configuration.

use serde::{Deserialize, Serialize};

/// Caps and execution knobs for graph-wide searches.
///
/// The default runs sequentially with no caps and keeps every match.
/// Missing fields deserialize to their defaults, so callers can embed a
/// partial `SearchOptions` in their own config files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Stop after this many seeds have produced at least one match.
    pub seed_limit: Option<usize>,
    /// Keep at most this many matches per seed.
    pub matches_per_seed: Option<usize>,
    /// Search seeds on the rayon thread pool.
    pub parallel: bool,
    /// Drop matches of a seed that bind the same element set as an earlier one.
    pub deduplicate: bool,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed_limit(mut self, limit: usize) -> Self {
        self.seed_limit = Some(limit);
        self
    }

    pub fn with_matches_per_seed(mut self, limit: usize) -> Self {
        self.matches_per_seed = Some(limit);
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn deduplicate(mut self, deduplicate: bool) -> Self {
        self.deduplicate = deduplicate;
        self
    }
}
