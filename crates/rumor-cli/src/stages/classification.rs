use anyhow::Result;
use rumor_store::StoredItem;

use super::checked_batch_size;
use crate::config::RumorConfig;
use crate::ports::{ItemStore, MessageQueue};
use crate::upstream::FeedItem;

/// Persist queued feed items with their keywords, then acknowledge them.
///
/// Returns the number of items stored. Bodies that cannot be decoded are
/// logged and acknowledged anyway, since redelivery cannot repair them.
pub fn classify<Q: MessageQueue, S: ItemStore>(
    queue: &Q,
    store: &S,
    config: &RumorConfig,
    batch_size: i64,
    now: u64,
) -> Result<usize> {
    let Some(batch_size) = checked_batch_size(batch_size) else {
        tracing::warn!("Invalid batch size: {batch_size}");
        return Ok(0);
    };

    let source = &config.classification_queue_name;
    let messages = queue.receive(source, batch_size)?;
    if messages.is_empty() {
        tracing::info!("Queue is empty");
        return Ok(0);
    }

    let table = &config.news_item_table_name;
    let mut stored = 0;
    for message in &messages {
        let feed_item: FeedItem = match serde_json::from_str(&message.body) {
            Ok(item) => item,
            Err(e) => {
                tracing::warn!("skipping malformed message {}: {e}", message.id);
                continue;
            }
        };
        let Some(item) = feed_item.into_item() else {
            tracing::warn!("skipping message {} without url or title", message.id);
            continue;
        };
        tracing::debug!("classified item {} as {:?}", item.id, item.keywords());
        store.put_item(
            table,
            &StoredItem::new(item, now, config.news_item_max_age_hours),
        )?;
        stored += 1;
    }

    store.purge_expired(table, now)?;
    queue.delete(source, &messages)?;
    tracing::info!("Read {} messages from queue {source}", messages.len());
    Ok(stored)
}
