use rusqlite::params;

use rumor_core::constants::{ITEM_TTL_FACTOR, SECS_PER_HOUR};
use rumor_core::{Item, unix_to_date};

use crate::error::{Result, StoreError};
use crate::store::Store;

/// An item as persisted: partitioned by creation date, expiring at `ttl`.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredItem {
    pub item: Item,
    pub created_at_date: String,
    pub updated_at: u64,
    pub ttl: u64,
}

impl StoredItem {
    /// Normalise a classified item. It expires three max-ages after `now`.
    pub fn new(item: Item, now: u64, max_age_hours: u64) -> Self {
        let created_at_date = unix_to_date(item.created_at);
        Self {
            item,
            created_at_date,
            updated_at: now,
            ttl: now + ITEM_TTL_FACTOR * max_age_hours * SECS_PER_HOUR,
        }
    }
}

impl Store {
    pub fn put_item(&self, table: &str, stored: &StoredItem) -> Result<()> {
        let item = &stored.item;
        let keywords = serde_json::to_string(item.keywords())?;
        self.conn().execute(
            "INSERT OR REPLACE INTO news_items
                (table_name, created_at_date, news_item_id, created_at, updated_at, ttl,
                 score, url, title, keywords)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                table,
                stored.created_at_date,
                item.id,
                item.created_at as i64,
                stored.updated_at as i64,
                stored.ttl as i64,
                item.raw_score,
                item.url,
                item.title(),
                keywords,
            ],
        )?;
        Ok(())
    }

    /// Items with `from <= created_at <= to`, read partition by partition.
    ///
    /// The same id may appear more than once when it was stored under
    /// different partitions; callers dedupe.
    pub fn items_between(&self, table: &str, from: u64, to: u64) -> Result<Vec<Item>> {
        let mut stmt = self.conn().prepare(
            "SELECT news_item_id, title, url, score, created_at FROM news_items
             WHERE table_name = ?1 AND created_at_date = ?2 AND created_at BETWEEN ?3 AND ?4
             ORDER BY created_at, news_item_id",
        )?;

        let mut items = Vec::new();
        for date in rumor_core::time::dates_between(from, to) {
            let rows = stmt
                .query_map(params![table, date, from as i64, to as i64], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, f64>(3)?,
                        row.get::<_, i64>(4)?,
                    ))
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            for (id, title, url, score, created_at) in rows {
                let created_at = u64::try_from(created_at)
                    .map_err(|_| {
                        StoreError::InvalidData(format!("negative created_at on item {id}"))
                    })?;
                items.push(Item::new(id, title, url, score, created_at));
            }
        }

        tracing::info!("Found {} news items to evaluate", items.len());
        Ok(items)
    }

    /// Delete items whose ttl has passed.
    pub fn purge_expired_items(&self, table: &str, now: u64) -> Result<usize> {
        let n = self.conn().execute(
            "DELETE FROM news_items WHERE table_name = ?1 AND ttl < ?2",
            params![table, now as i64],
        )?;
        if n > 0 {
            tracing::debug!("purged {n} expired items from {table}");
        }
        Ok(n)
    }
}
