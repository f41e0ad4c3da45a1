//! Rumor curation engine.
//!
//! Extracts keywords from item titles, scores items against learned keyword
//! preferences, selects a ranked digest relative to the population mean, and
//! grows preference weights from engagement feedback.
//!
//! Zero I/O: every function here takes already-fetched records and returns
//! new ones. Queues, storage and HTTP live in the callers.

pub mod constants;
pub mod dedupe;
pub mod feedback;
pub mod item;
pub mod qualify;
pub mod report;
pub mod scoring;
pub mod time;
pub mod tokenizer;

pub use constants::{
    DEFAULT_PREFERENCE_WEIGHT, FEEDBACK_INCREMENT, PREFERENCE_TYPE_KEYWORD, REPORT_SUBJECT,
    UNSEEN_KEYWORD_WEIGHT, valid_batch_size,
};
pub use dedupe::dedupe;
pub use feedback::{Adaptation, ClickSample, Link, adapt_weights, engaged_links, is_engaged};
pub use item::{Item, Preference, PreferenceUpdate, normalize_keyword};
pub use qualify::{Qualification, mean_score, qualify, select_digest};
pub use report::{Report, ReportConfig, ReportEntry, format_report, format_score};
pub use scoring::{ScoredItem, score, score_modifier};
pub use time::{now_unix_secs, unix_to_date, unix_to_iso8601};
pub use tokenizer::extract_keywords;
