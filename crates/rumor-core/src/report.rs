//! Evaluation reports: an immutable snapshot of one qualification run and
//! its plain-text rendering for notification bodies.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::REPORT_VERSION;
use crate::scoring::ScoredItem;
use crate::time::unix_to_pretty;

/// One qualifying item as recorded in a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub id: String,
    pub title: String,
    pub url: String,
    pub score: f64,
    pub modified_score: f64,
    pub score_bonus: f64,
    #[serde(default)]
    pub feedback_url: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl ReportEntry {
    pub fn from_scored(scored: &ScoredItem, feedback_url: Option<String>) -> Self {
        Self {
            id: scored.item.id.clone(),
            title: scored.item.title().to_string(),
            url: scored.item.url.clone(),
            score: scored.item.raw_score,
            modified_score: scored.modified_score,
            score_bonus: scored.score_bonus(),
            feedback_url,
            keywords: scored.item.keywords().iter().cloned().collect(),
        }
    }
}

/// Parameters a report was produced with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    pub news_item_max_age_hours: u64,
    pub evaluation_period_hours: u64,
    pub qualification_threshold: f64,
    pub qualification_limit: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: Uuid,
    pub created_at: u64,
    pub entries: Vec<ReportEntry>,
    pub config: ReportConfig,
    pub version: String,
}

impl Report {
    /// Snapshot a ranked selection. `feedback_urls` pairs up with `ranked`
    /// by position; missing positions get no feedback link.
    pub fn new(
        created_at: u64,
        ranked: &[ScoredItem],
        feedback_urls: Vec<Option<String>>,
        config: ReportConfig,
    ) -> Self {
        let mut urls = feedback_urls.into_iter();
        let entries = ranked
            .iter()
            .map(|s| ReportEntry::from_scored(s, urls.next().flatten()))
            .collect();
        Self {
            id: Uuid::new_v4(),
            created_at,
            entries,
            config,
            version: REPORT_VERSION.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Render a report as notification text.
///
/// ```text
/// Created 2026-02-21 13:05:09+00:00 (UTC)
///
/// [120 + 30] Some title
/// https://example.com/post
///
/// ```
pub fn format_report(report: &Report) -> String {
    let mut out = format!("Created {}\n\n", unix_to_pretty(report.created_at));
    for entry in &report.entries {
        let _ = write!(
            out,
            "[{} + {}] {}\n{}\n\n",
            format_score(entry.score),
            format_score(entry.score_bonus),
            entry.title,
            entry.url
        );
    }
    out
}

/// Scores print without a fractional part when whole and with at most two
/// decimals otherwise.
pub fn format_score(score: f64) -> String {
    let rounded = (score * 100.0).round() / 100.0;
    if rounded == rounded.trunc() {
        format!("{}", rounded as i64)
    } else {
        let s = format!("{rounded:.2}");
        s.trim_end_matches('0').to_string()
    }
}
