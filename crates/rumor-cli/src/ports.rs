//! Collaborator interfaces the pipeline stages talk through.
//!
//! Stages never reach for a database handle or HTTP client directly; they
//! take these traits so the pure core runs between explicit I/O steps and
//! tests can substitute in-memory fakes.

use anyhow::Result;
use rumor_core::{ClickSample, Item, Link, Preference, Report, now_unix_secs};
use rumor_store::{Message, Store, StoredItem};

use crate::upstream::{FeedItem, UpstreamError};

pub trait MessageQueue {
    fn receive(&self, queue: &str, max: usize) -> Result<Vec<Message>>;
    fn delete(&self, queue: &str, messages: &[Message]) -> Result<()>;
    fn send(&self, queue: &str, bodies: &[String], batch_size: usize) -> Result<()>;
}

pub trait ItemStore {
    fn items_between(&self, table: &str, from: u64, to: u64) -> Result<Vec<Item>>;
    fn put_item(&self, table: &str, item: &StoredItem) -> Result<()>;
    fn purge_expired(&self, table: &str, now: u64) -> Result<usize>;
}

pub trait PreferenceStore {
    fn preferences(&self, table: &str) -> Result<Vec<Preference>>;
    fn put_preference(&self, table: &str, preference: &Preference) -> Result<()>;
}

pub trait ReportStore {
    fn reports_between(&self, table: &str, from: u64, to: u64) -> Result<Vec<Report>>;
    fn put_report(&self, table: &str, report: &Report) -> Result<()>;
}

pub trait ContentFeed {
    async fn top_ids(&self, feed_url: &str) -> Result<Vec<u64>, UpstreamError>;
    /// `None` when the feed has no record for the id.
    async fn fetch_item(
        &self,
        id: &str,
        feed_url: &str,
    ) -> Result<Option<FeedItem>, UpstreamError>;
}

pub trait LinkService {
    async fn shorten(&self, url: &str, title: &str) -> Result<Link, UpstreamError>;
    async fn group_id(&self) -> Result<String, UpstreamError>;
    async fn list_links(&self, group_id: &str, since: u64) -> Result<Vec<Link>, UpstreamError>;
    async fn clicks(
        &self,
        link_id: &str,
        unit: &str,
        units: u32,
    ) -> Result<Vec<ClickSample>, UpstreamError>;
}

pub trait NotificationSink {
    async fn publish(
        &self,
        topic_hint: &str,
        text: &str,
        subject: &str,
    ) -> Result<(), UpstreamError>;
}

// --- SQLite adapters ---

impl MessageQueue for Store {
    fn receive(&self, queue: &str, max: usize) -> Result<Vec<Message>> {
        Ok(self.receive_messages(queue, max, now_unix_secs())?)
    }

    fn delete(&self, queue: &str, messages: &[Message]) -> Result<()> {
        let deleted = self.delete_messages(queue, messages)?;
        if deleted < messages.len() {
            tracing::warn!(
                "{} of {} messages on {queue} were already redelivered",
                messages.len() - deleted,
                messages.len()
            );
        }
        Ok(())
    }

    fn send(&self, queue: &str, bodies: &[String], batch_size: usize) -> Result<()> {
        Ok(self.send_messages(queue, bodies, batch_size)?)
    }
}

impl ItemStore for Store {
    fn items_between(&self, table: &str, from: u64, to: u64) -> Result<Vec<Item>> {
        Ok(Store::items_between(self, table, from, to)?)
    }

    fn put_item(&self, table: &str, item: &StoredItem) -> Result<()> {
        Ok(Store::put_item(self, table, item)?)
    }

    fn purge_expired(&self, table: &str, now: u64) -> Result<usize> {
        Ok(self.purge_expired_items(table, now)?)
    }
}

impl PreferenceStore for Store {
    fn preferences(&self, table: &str) -> Result<Vec<Preference>> {
        Ok(Store::preferences(self, table)?)
    }

    fn put_preference(&self, table: &str, preference: &Preference) -> Result<()> {
        Ok(Store::put_preference(self, table, preference)?)
    }
}

impl ReportStore for Store {
    fn reports_between(&self, table: &str, from: u64, to: u64) -> Result<Vec<Report>> {
        Ok(Store::reports_between(self, table, from, to)?)
    }

    fn put_report(&self, table: &str, report: &Report) -> Result<()> {
        Ok(Store::put_report(self, table, report)?)
    }
}
