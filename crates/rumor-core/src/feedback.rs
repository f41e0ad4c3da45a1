//! Engagement feedback: grow the weight of every keyword in a clicked title.
//!
//! Each engaged title is tokenized and each of its keywords gains a fixed
//! increment. Weights only ever grow and preferences are never removed, so a
//! lost concurrent update delays convergence without corrupting state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants::{FEEDBACK_INCREMENT, UNSEEN_KEYWORD_WEIGHT};
use crate::item::{Preference, PreferenceUpdate};
use crate::tokenizer::extract_keywords;

/// A shortened feedback link as reported by the link service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: String,
    pub link: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// Click count for one time bucket of a link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickSample {
    pub clicks: u64,
    /// Start of the bucket, Unix seconds.
    pub at: u64,
}

/// Whether any bucket strictly after `since` recorded a click.
pub fn is_engaged(samples: &[ClickSample], since: u64) -> bool {
    samples.iter().any(|s| s.clicks > 0 && s.at > since)
}

/// Links with engagement after `since`, each listed once.
pub fn engaged_links<'a>(
    observed: &'a [(Link, Vec<ClickSample>)],
    since: u64,
) -> Vec<&'a Link> {
    observed
        .iter()
        .filter(|(_, samples)| is_engaged(samples, since))
        .map(|(link, _)| link)
        .collect()
}

/// Outcome of adapting weights to a batch of engaged titles.
#[derive(Debug, Default)]
pub struct Adaptation {
    /// Weights to persist, in the order they were derived.
    pub updates: Vec<PreferenceUpdate>,
    /// Titles that produced no keywords and were skipped.
    pub skipped: Vec<String>,
}

/// Derive preference updates from the titles of engaged items.
///
/// Keywords without a stored preference start from `1.0`. The working
/// weights are carried across titles, so a keyword engaged twice in one
/// batch rises by two increments.
pub fn adapt_weights<S: AsRef<str>>(
    engaged_titles: &[S],
    preferences: &[Preference],
) -> Adaptation {
    let mut weights: HashMap<String, f64> = preferences
        .iter()
        .map(|p| (p.keyword.clone(), p.weight))
        .collect();
    let mut result = Adaptation::default();

    for title in engaged_titles {
        let title = title.as_ref();
        let keywords = extract_keywords(title);
        if keywords.is_empty() {
            result.skipped.push(title.to_string());
            continue;
        }

        for keyword in keywords {
            let current = weights
                .get(&keyword)
                .copied()
                .unwrap_or(UNSEEN_KEYWORD_WEIGHT);
            let weight = current + FEEDBACK_INCREMENT;
            weights.insert(keyword.clone(), weight);
            result.updates.push(PreferenceUpdate { keyword, weight });
        }
    }

    result
}
