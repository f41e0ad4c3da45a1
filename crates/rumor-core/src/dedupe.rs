use std::collections::HashMap;

use crate::item::Item;

/// Collapse repeated items sharing an id, keeping the highest raw score.
///
/// Output preserves the order in which each id was first seen. A later
/// duplicate only replaces the kept item when its score is strictly greater,
/// so ties keep the first arrival.
pub fn dedupe(items: impl IntoIterator<Item = Item>) -> Vec<Item> {
    let mut kept: Vec<Item> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in items {
        match index.get(&item.id) {
            Some(&slot) => {
                if item.raw_score > kept[slot].raw_score {
                    kept[slot] = item;
                }
            }
            None => {
                index.insert(item.id.clone(), kept.len());
                kept.push(item);
            }
        }
    }

    kept
}
