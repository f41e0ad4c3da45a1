use anyhow::{Context, Result};

use super::Discovered;
use crate::config::RumorConfig;
use crate::ports::{ContentFeed, MessageQueue};

/// Queue the feed's current top `limit` ids for inspection.
pub async fn discover<F: ContentFeed, Q: MessageQueue>(
    feed: &F,
    queue: &Q,
    config: &RumorConfig,
    limit: usize,
) -> Result<usize> {
    let ids = feed
        .top_ids(&config.discovery_target_api_url)
        .await
        .context("failed to fetch top ids")?;

    let bodies = ids
        .iter()
        .take(limit)
        .map(|id| {
            serde_json::to_string(&Discovered {
                news_item_id: id.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    queue.send(
        &config.collection_queue_name,
        &bodies,
        rumor_core::constants::MAX_BATCH_SIZE,
    )?;
    tracing::info!(
        "Sent {} messages on queue {}",
        bodies.len(),
        config.collection_queue_name
    );
    Ok(bodies.len())
}
