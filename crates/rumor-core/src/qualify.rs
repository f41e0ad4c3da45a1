//! Digest selection: dedupe → score → relative threshold → ranked top-N.

use crate::dedupe::dedupe;
use crate::item::{Item, Preference};
use crate::scoring::{ScoredItem, score};

/// Parameters of one qualification run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Qualification {
    /// Multiple of the population mean an item must reach.
    pub threshold: f64,
    /// Maximum number of items selected.
    pub limit: usize,
}

impl Default for Qualification {
    fn default() -> Self {
        Self {
            threshold: 1.5,
            limit: 10,
        }
    }
}

/// Arithmetic mean of the modified scores; `0.0` for an empty population.
pub fn mean_score(scored: &[ScoredItem]) -> f64 {
    let total: f64 = scored.iter().map(|s| s.modified_score).sum();
    total / scored.len().max(1) as f64
}

/// Select items scoring at least `mean * threshold`, best first, at most
/// `limit` of them.
///
/// The sort is stable, so items with equal modified scores keep their input
/// order.
pub fn qualify(scored: Vec<ScoredItem>, threshold: f64, limit: usize) -> Vec<ScoredItem> {
    let cutoff = mean_score(&scored) * threshold;

    let mut selected: Vec<ScoredItem> = scored
        .into_iter()
        .filter(|s| s.modified_score >= cutoff)
        .collect();
    selected.sort_by(|a, b| b.modified_score.total_cmp(&a.modified_score));
    selected.truncate(limit);
    selected
}

/// Run the full selection over raw items and the current preferences.
pub fn select_digest(
    items: impl IntoIterator<Item = Item>,
    preferences: &[Preference],
    params: Qualification,
) -> Vec<ScoredItem> {
    let unique = dedupe(items);
    let scored = score(unique, preferences);
    qualify(scored, params.threshold, params.limit)
}
