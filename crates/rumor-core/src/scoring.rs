use serde::{Deserialize, Serialize};

use crate::item::{Item, Preference};

/// An item with its preference-adjusted score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    pub item: Item,
    pub modified_score: f64,
}

impl ScoredItem {
    /// Display-only difference between the adjusted and raw score.
    pub fn score_bonus(&self) -> f64 {
        self.modified_score - self.item.raw_score
    }
}

/// Product of the weights of every preference whose keyword the item carries.
/// `1.0` when nothing matches.
pub fn score_modifier(item: &Item, preferences: &[Preference]) -> f64 {
    preferences
        .iter()
        .filter(|p| item.has_keyword(&p.keyword))
        .map(|p| p.weight)
        .product()
}

/// Apply preference weights multiplicatively to each item's raw score.
pub fn score(items: impl IntoIterator<Item = Item>, preferences: &[Preference]) -> Vec<ScoredItem> {
    items
        .into_iter()
        .map(|item| {
            let modified_score = item.raw_score * score_modifier(&item, preferences);
            ScoredItem {
                item,
                modified_score,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_no_match_keeps_raw_score() {
        let items = vec![Item::new("1", "Gardening tips", "u", 42.0, 0)];
        let prefs = vec![Preference::new("rust", 2.0)];
        let scored = score(items, &prefs);
        assert_eq!(scored[0].modified_score, 42.0);
        assert_eq!(scored[0].score_bonus(), 0.0);
    }

    #[test]
    fn test_no_preferences() {
        let scored = score(vec![Item::new("1", "Rust", "u", 7.0, 0)], &[]);
        assert_eq!(scored[0].modified_score, 7.0);
    }

    #[test]
    fn test_matches_compound_multiplicatively() {
        let items = vec![Item::new("1", "alpha beta", "u", 10.0, 0)];
        let prefs = vec![Preference::new("alpha", 1.5), Preference::new("beta", 2.0)];
        let scored = score(items, &prefs);
        assert_relative_eq!(scored[0].modified_score, 30.0);
        assert_relative_eq!(scored[0].score_bonus(), 20.0);
    }

    #[test]
    fn test_preference_order_irrelevant() {
        let item = Item::new("1", "alpha beta gamma", "u", 3.0, 0);
        let forward = vec![
            Preference::new("alpha", 1.25),
            Preference::new("beta", 1.5),
            Preference::new("gamma", 2.0),
        ];
        let mut backward = forward.clone();
        backward.reverse();
        assert_relative_eq!(
            score_modifier(&item, &forward),
            score_modifier(&item, &backward)
        );
    }
}
