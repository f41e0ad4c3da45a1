/// Weight given to a keyword preference created without feedback history.
pub const DEFAULT_PREFERENCE_WEIGHT: f64 = 1.25;

/// Weight assumed for a keyword that has no stored preference yet.
pub const UNSEEN_KEYWORD_WEIGHT: f64 = 1.0;

/// Fixed step added to a keyword's weight for each engaged title containing it.
pub const FEEDBACK_INCREMENT: f64 = 0.25;

/// Queue batch sizes outside `MIN_BATCH_SIZE..=MAX_BATCH_SIZE` are rejected.
pub const MIN_BATCH_SIZE: usize = 1;
pub const MAX_BATCH_SIZE: usize = 10;

/// Partition value shared by every keyword preference.
pub const PREFERENCE_TYPE_KEYWORD: &str = "KEYWORD";

/// Schema version stamped on every persisted report.
pub const REPORT_VERSION: &str = "1";

/// Subject line used when publishing a report.
pub const REPORT_SUBJECT: &str = "Rumor Report";

/// Click analytics granularity used when looking for engagement.
pub const CLICK_UNIT: &str = "hour";
pub const CLICK_UNITS: u32 = 24;

/// Stored items expire after this multiple of the item max age.
pub const ITEM_TTL_FACTOR: u64 = 3;

pub const SECS_PER_HOUR: u64 = 3600;
pub const SECS_PER_DAY: u64 = 86_400;

/// Whether a queue batch size is acceptable.
pub fn valid_batch_size(batch_size: usize) -> bool {
    (MIN_BATCH_SIZE..=MAX_BATCH_SIZE).contains(&batch_size)
}
