use anyhow::{Context, Result};

use super::{Discovered, checked_batch_size, hours_before};
use crate::config::RumorConfig;
use crate::ports::{ContentFeed, MessageQueue};

#[derive(Debug, Default, PartialEq)]
pub struct Inspection {
    pub received: usize,
    pub forwarded: usize,
}

/// Fetch each discovered id from the feed and forward fresh, linkable
/// items to the classification queue.
///
/// Items without a url, or created at or before `now - max_age`, are
/// dropped. Collection messages are deleted only after forwarding
/// succeeded; an upstream failure leaves them for redelivery.
pub async fn inspect<Q: MessageQueue, F: ContentFeed>(
    queue: &Q,
    feed: &F,
    config: &RumorConfig,
    batch_size: i64,
    now: u64,
) -> Result<Inspection> {
    let Some(batch_size) = checked_batch_size(batch_size) else {
        tracing::warn!("Invalid batch size: {batch_size}");
        return Ok(Inspection::default());
    };

    let collection = &config.collection_queue_name;
    let messages = queue.receive(collection, batch_size)?;
    if messages.is_empty() {
        tracing::info!("Queue is empty");
        return Ok(Inspection::default());
    }

    let cutoff = hours_before(now, config.news_item_max_age_hours);
    let mut forward = Vec::new();
    for message in &messages {
        let discovered: Discovered = match serde_json::from_str(&message.body) {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!("skipping malformed message {}: {e}", message.id);
                continue;
            }
        };

        let item = feed
            .fetch_item(&discovered.news_item_id, &config.discovery_target_api_url)
            .await
            .with_context(|| {
                format!("failed to fetch item {}", discovered.news_item_id)
            })?;

        let Some(item) = item else {
            tracing::debug!("item {} not found", discovered.news_item_id);
            continue;
        };
        if item.url.is_none() {
            continue;
        }
        if item.time <= cutoff {
            continue;
        }
        forward.push(serde_json::to_string(&item)?);
    }

    let classification = &config.classification_queue_name;
    if forward.is_empty() {
        tracing::info!("No messages to send");
    } else {
        queue.send(classification, &forward, batch_size)?;
        tracing::info!("Sent {} messages on queue {classification}", forward.len());
    }

    queue.delete(collection, &messages)?;
    tracing::info!("Read {} messages from queue {collection}", messages.len());

    Ok(Inspection {
        received: messages.len(),
        forwarded: forward.len(),
    })
}
