//! Cross-module scenarios: tokenize → dedupe → score → qualify → report,
//! and the feedback loop feeding the next selection.

use approx::assert_relative_eq;
use proptest::prelude::*;
use rumor_core::{
    Item, Preference, Qualification, Report, ReportConfig, adapt_weights, dedupe,
    format_report, mean_score, qualify, score, select_digest,
};
use rumor_core::tokenizer::{extract_keywords, is_stop_word};

fn config() -> ReportConfig {
    ReportConfig {
        news_item_max_age_hours: 48,
        evaluation_period_hours: 72,
        qualification_threshold: 1.5,
        qualification_limit: 10,
    }
}

/// Five items, two preferred keywords: only the boosted items clear 1.5x mean.
#[test]
fn end_to_end_qualification() {
    let scores = [1000.0, 101.0, 1002.0, 103.0, 1004.0];
    let items: Vec<Item> = scores
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let title = format!("k{}", "x".repeat(i + 1));
            Item::new(i.to_string(), title, "u", *s, 0)
        })
        .collect();
    let prefs = vec![Preference::new("kx", 1.5), Preference::new("kxxxxx", 1.5)];

    let params = Qualification {
        threshold: 1.5,
        limit: 10,
    };
    let digest = select_digest(items, &prefs, params);

    let ids: Vec<&str> = digest.iter().map(|s| s.item.id.as_str()).collect();
    assert_eq!(ids, vec!["4", "0"]);
    assert_relative_eq!(digest[0].modified_score, 1506.0);
    assert_relative_eq!(digest[1].modified_score, 1500.0);
}

#[test]
fn feedback_raises_future_score() {
    let items = vec![
        Item::new("1", "Postgres vacuum explained", "u", 100.0, 0),
        Item::new("2", "Gardening in winter", "u", 100.0, 0),
    ];
    let before = score(items.clone(), &[]);
    assert_eq!(before[0].modified_score, before[1].modified_score);

    let adaptation = adapt_weights(&["Why Postgres needs vacuum"], &[]);
    let prefs: Vec<Preference> = adaptation.updates.into_iter().map(Into::into).collect();

    let after = score(items, &prefs);
    assert!(after[0].modified_score > after[1].modified_score);
    // postgres and vacuum both matched at 1.25
    assert_relative_eq!(after[0].modified_score, 156.25);
}

#[test]
fn report_renders_digest() {
    let items = vec![
        Item::new("a", "Rust async runtime", "https://a", 300.0, 0),
        Item::new("b", "Cooking pasta", "https://b", 10.0, 0),
    ];
    let prefs = vec![Preference::new("rust", 2.0)];
    let params = Qualification {
        threshold: 1.0,
        limit: 10,
    };
    let digest = select_digest(items, &prefs, params);
    let report = Report::new(0, &digest, Vec::new(), config());
    let text = format_report(&report);
    assert!(text.contains("[300 + 300] Rust async runtime\nhttps://a\n"));
    assert!(!text.contains("Cooking"));
}

fn arb_items() -> impl Strategy<Value = Vec<Item>> {
    prop::collection::vec((0u8..8, 0u32..1000, "[a-z ]{0,20}"), 0..40).prop_map(|rows| {
        rows.into_iter()
            .map(|(id, s, title)| {
                Item::new(id.to_string(), title, "u", s as f64, 0)
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn dedupe_is_idempotent(items in arb_items()) {
        let once = dedupe(items);
        let twice = dedupe(once.clone());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn dedupe_keeps_max_per_id(items in arb_items()) {
        let unique = dedupe(items.clone());
        for kept in &unique {
            let max = items
                .iter()
                .filter(|i| i.id == kept.id)
                .map(|i| i.raw_score)
                .fold(f64::MIN, f64::max);
            prop_assert_eq!(kept.raw_score, max);
        }
    }

    #[test]
    fn qualify_respects_limit_and_cutoff(
        items in arb_items(),
        threshold in 0.0f64..3.0,
        limit in 0usize..12,
    ) {
        let prefs = vec![Preference::new("ab", 1.5), Preference::new("cd", 2.0)];
        let scored = score(dedupe(items), &prefs);
        let cutoff = mean_score(&scored) * threshold;
        let selected = qualify(scored, threshold, limit);
        prop_assert!(selected.len() <= limit);
        for s in &selected {
            prop_assert!(s.modified_score >= cutoff);
        }
        for pair in selected.windows(2) {
            prop_assert!(pair[0].modified_score >= pair[1].modified_score);
        }
    }

    #[test]
    fn weights_never_decrease(
        titles in prop::collection::vec("[a-z ]{0,30}", 0..10),
        start in 0.5f64..5.0,
    ) {
        let prefs: Vec<Preference> = ["rust", "kernel", "go"]
            .iter()
            .map(|k| Preference::new(k, start))
            .collect();
        let adaptation = adapt_weights(titles.as_slice(), &prefs);
        for update in &adaptation.updates {
            let floor = prefs
                .iter()
                .find(|p| p.keyword == update.keyword)
                .map_or(1.0, |p| p.weight);
            prop_assert!(update.weight > floor);
        }
    }

    #[test]
    fn keywords_are_lowercase_alphabetic_runs(text in "[A-Za-zÀ-ÿ0-9 .,'!?-]{0,60}") {
        for keyword in extract_keywords(&text) {
            prop_assert_eq!(keyword.to_lowercase(), keyword.clone());
            prop_assert!(keyword.chars().count() >= 2);
            prop_assert!(keyword.chars().all(char::is_alphabetic));
            prop_assert!(!is_stop_word(&keyword));
        }
    }

    #[test]
    fn unmatched_preferences_leave_scores_unchanged(items in arb_items()) {
        // Keywords containing digits or hyphens never come out of the tokenizer.
        let prefs = vec![Preference::new("k8s", 3.0), Preference::new("no-match", 0.5)];
        for scored in score(items, &prefs) {
            prop_assert_eq!(scored.modified_score, scored.item.raw_score);
            prop_assert_eq!(scored.score_bonus(), 0.0);
        }
    }

    #[test]
    fn modified_scores_are_non_negative(
        items in arb_items(),
        prefs in prop::collection::vec(("[a-z]{2,4}", 0.01f64..10.0), 0..8),
    ) {
        let prefs: Vec<Preference> = prefs
            .into_iter()
            .map(|(keyword, weight)| Preference::new(keyword, weight))
            .collect();
        for scored in score(items, &prefs) {
            prop_assert!(scored.modified_score >= 0.0);
        }
    }
}
