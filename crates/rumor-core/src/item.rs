use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::tokenizer::extract_keywords;

/// A candidate piece of content with its popularity signal.
///
/// `keywords` is always derived from `title`; use [`Item::set_title`] to
/// change the title so the two never disagree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub id: String,
    title: String,
    pub url: String,
    pub raw_score: f64,
    pub created_at: u64,
    keywords: BTreeSet<String>,
}

impl Item {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
        raw_score: f64,
        created_at: u64,
    ) -> Self {
        let title = title.into();
        let keywords = extract_keywords(&title);
        Self {
            id: id.into(),
            title,
            url: url.into(),
            raw_score,
            created_at,
            keywords,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn keywords(&self) -> &BTreeSet<String> {
        &self.keywords
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.keywords = extract_keywords(&self.title);
    }

    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.contains(keyword)
    }
}

/// Wire shape of an item; deserialising always goes through [`Item::new`]
/// so stored or queued keyword lists can never override the title.
#[derive(Deserialize)]
struct ItemFields {
    id: String,
    title: String,
    url: String,
    raw_score: f64,
    created_at: u64,
}

impl<'de> Deserialize<'de> for Item {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let f = ItemFields::deserialize(deserializer)?;
        Ok(Item::new(f.id, f.title, f.url, f.raw_score, f.created_at))
    }
}

/// A keyword preference: the learned weight the scorer multiplies in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preference {
    pub keyword: String,
    pub weight: f64,
}

impl Preference {
    pub fn new(keyword: impl AsRef<str>, weight: f64) -> Self {
        Self {
            keyword: normalize_keyword(keyword.as_ref()),
            weight,
        }
    }
}

/// Instruction to persist a new weight for a keyword.
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceUpdate {
    pub keyword: String,
    pub weight: f64,
}

impl From<PreferenceUpdate> for Preference {
    fn from(u: PreferenceUpdate) -> Self {
        Preference {
            keyword: u.keyword,
            weight: u.weight,
        }
    }
}

/// Keys are stored lower-cased and trimmed.
pub fn normalize_keyword(keyword: &str) -> String {
    keyword.trim().to_lowercase()
}
