use serde::{Deserialize, Serialize};

use rumor_core::Item;

use super::{UpstreamError, check_status, http_client};
use crate::ports::ContentFeed;

/// An item record as served by the feed and carried on the queues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    /// Creation time, Unix seconds.
    #[serde(default)]
    pub time: u64,
}

impl FeedItem {
    /// Convert into a core item; records without a url or title have
    /// nothing to link to or classify.
    pub fn into_item(self) -> Option<Item> {
        let url = self.url?;
        let title = self.title?;
        Some(Item::new(
            self.id.to_string(),
            title,
            url,
            self.score.unwrap_or(0.0).max(0.0),
            self.time,
        ))
    }
}

/// Client for the Hacker News Firebase API.
pub struct HackerNews {
    client: reqwest::Client,
}

impl HackerNews {
    pub fn new() -> Result<Self, UpstreamError> {
        Ok(Self {
            client: http_client()?,
        })
    }
}

impl ContentFeed for HackerNews {
    async fn top_ids(&self, feed_url: &str) -> Result<Vec<u64>, UpstreamError> {
        let url = format!("{}/v0/topstories.json", feed_url.trim_end_matches('/'));
        let response = self.client.get(&url).send().await?;
        Ok(check_status("GET", response, &[200])?.json().await?)
    }

    async fn fetch_item(
        &self,
        id: &str,
        feed_url: &str,
    ) -> Result<Option<FeedItem>, UpstreamError> {
        let url = format!("{}/v0/item/{id}.json", feed_url.trim_end_matches('/'));
        let response = self.client.get(&url).send().await?;
        Ok(check_status("GET", response, &[200])?.json().await?)
    }
}
