//! Pipeline configuration: defaults, then an optional TOML file, then
//! `RUMOR_*` environment variables (`RUMOR_QUALIFICATION_LIMIT` sets
//! `qualification_limit`). Command-line flags are applied by the individual
//! commands on top of the result.

use std::path::Path;

use anyhow::{Context, Result};
use ::config::builder::DefaultState;
use ::config::{ConfigBuilder, Environment, File, FileFormat};
use serde::Deserialize;

/// Configuration file looked up inside the data directory.
pub const CONFIG_FILE_NAME: &str = "rumor.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RumorConfig {
    pub discovery_target_api_url: String,
    pub discovery_limit: usize,
    pub collection_queue_name: String,
    pub classification_queue_name: String,
    pub inspection_batch_size: i64,
    pub classification_batch_size: i64,
    pub news_item_max_age_hours: u64,
    pub evaluation_period_hours: u64,
    pub qualification_threshold: f64,
    pub qualification_limit: usize,
    pub news_item_table_name: String,
    pub evaluation_report_table_name: String,
    pub preference_table_name: String,
    pub report_period_hours: u64,
    pub notification_topic_name: String,
    pub notification_webhook_url: Option<String>,
    pub feedback_period_hours: u64,
    pub feedback_max_age_hours: u64,
    pub bitly_access_token: Option<String>,
    pub bitly_api_url: String,
}

impl Default for RumorConfig {
    fn default() -> Self {
        Self {
            discovery_target_api_url: "https://hacker-news.firebaseio.com".to_string(),
            discovery_limit: 5,
            collection_queue_name: "rumor-dev-collection-queue".to_string(),
            classification_queue_name: "rumor-dev-classification-queue".to_string(),
            inspection_batch_size: 2,
            classification_batch_size: 2,
            news_item_max_age_hours: 48,
            evaluation_period_hours: 72,
            qualification_threshold: 1.5,
            qualification_limit: 10,
            news_item_table_name: "rumor-dev-news-items".to_string(),
            evaluation_report_table_name: "rumor-dev-evaluation-reports".to_string(),
            preference_table_name: "rumor-dev-preferences".to_string(),
            report_period_hours: 24,
            notification_topic_name: "rumor-dev-notification-topic".to_string(),
            notification_webhook_url: None,
            feedback_period_hours: 24,
            feedback_max_age_hours: 720,
            bitly_access_token: None,
            bitly_api_url: "https://api-ssl.bitly.com/v4".to_string(),
        }
    }
}

impl RumorConfig {
    /// Load from `explicit` if given, else `<data_dir>/rumor.toml` when it
    /// exists, then apply the process environment.
    pub fn load(explicit: Option<&Path>, data_dir: &Path) -> Result<Self> {
        let file = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Some(data_dir.join(CONFIG_FILE_NAME)).filter(|p| p.is_file()),
        };

        let mut builder = ::config::Config::builder();
        if let Some(path) = &file {
            builder = builder.add_source(File::from(path.as_path()).format(FileFormat::Toml));
        }
        Self::from_builder(builder, environment())
            .with_context(|| match &file {
                Some(path) => format!("invalid config {}", path.display()),
                None => "invalid config in environment".to_string(),
            })
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>, env: Environment) -> Result<Self> {
        let settings = builder.add_source(env).build()?;
        Ok(settings.try_deserialize()?)
    }
}

fn environment() -> Environment {
    Environment::with_prefix("RUMOR")
        .prefix_separator("_")
        .ignore_empty(true)
}
