use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

use regex::Regex;

static WORD_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\p{Alphabetic}{2,}").unwrap());

static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    include_str!("stopwords.txt")
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .collect()
});

/// Extract the keyword set of a piece of text.
///
/// Candidates are runs of two or more alphabetic characters, so digits,
/// punctuation and single letters never form keywords and `"Keyword!?"`
/// yields `keyword`. Candidates are lower-cased and the stop-list removed.
pub fn extract_keywords(text: &str) -> BTreeSet<String> {
    WORD_RUN
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|w| !is_stop_word(w))
        .collect()
}

/// Whether a lowercase word is on the stop-list.
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}
