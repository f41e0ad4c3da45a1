//! Pipeline stages. Each one fetches through the collaborator traits, runs
//! the pure core, then commits: received messages are only deleted once
//! everything derived from them has been forwarded or stored.

pub mod classification;
pub mod discovery;
pub mod evaluation;
pub mod feedback;
pub mod inspection;
pub mod report;

use rumor_core::constants::SECS_PER_HOUR;
use rumor_core::valid_batch_size;
use serde::{Deserialize, Serialize};

pub use classification::classify;
pub use discovery::discover;
pub use evaluation::evaluate;
pub use feedback::process_feedback;
pub use inspection::inspect;
pub use report::send_reports;

/// Record placed on the collection queue by discovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discovered {
    pub news_item_id: String,
}

/// `Some(batch_size)` when it lies within the accepted queue batch range.
pub(crate) fn checked_batch_size(batch_size: i64) -> Option<usize> {
    usize::try_from(batch_size)
        .ok()
        .filter(|b| valid_batch_size(*b))
}

pub(crate) fn hours_before(now: u64, hours: u64) -> u64 {
    now.saturating_sub(hours.saturating_mul(SECS_PER_HOUR))
}

#[cfg(test)]
pub(crate) mod fakes {
    //! In-memory collaborators for stage tests.

    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use anyhow::Result;
    use rumor_core::{ClickSample, Item, Link, Preference, Report};
    use rumor_store::{Message, StoredItem};

    use crate::ports::*;
    use crate::upstream::{FeedItem, UpstreamError};

    #[derive(Default)]
    pub struct FakeQueue {
        pub queues: RefCell<HashMap<String, Vec<String>>>,
        pub deleted: RefCell<Vec<(String, usize)>>,
        pub receive_calls: Cell<usize>,
    }

    impl FakeQueue {
        pub fn with(queue: &str, bodies: Vec<String>) -> Self {
            let fake = Self::default();
            fake.queues.borrow_mut().insert(queue.to_string(), bodies);
            fake
        }

        pub fn bodies(&self, queue: &str) -> Vec<String> {
            self.queues.borrow().get(queue).cloned().unwrap_or_default()
        }
    }

    impl MessageQueue for FakeQueue {
        fn receive(&self, queue: &str, max: usize) -> Result<Vec<Message>> {
            self.receive_calls.set(self.receive_calls.get() + 1);
            Ok(self
                .bodies(queue)
                .into_iter()
                .take(max)
                .enumerate()
                .map(|(i, body)| Message {
                    id: i as i64,
                    receipt_handle: format!("{queue}-{i}"),
                    body,
                })
                .collect())
        }

        fn delete(&self, queue: &str, messages: &[Message]) -> Result<()> {
            let mut queues = self.queues.borrow_mut();
            if let Some(bodies) = queues.get_mut(queue) {
                bodies.drain(..messages.len().min(bodies.len()));
            }
            self.deleted
                .borrow_mut()
                .push((queue.to_string(), messages.len()));
            Ok(())
        }

        fn send(&self, queue: &str, bodies: &[String], _batch_size: usize) -> Result<()> {
            self.queues
                .borrow_mut()
                .entry(queue.to_string())
                .or_default()
                .extend(bodies.iter().cloned());
            Ok(())
        }
    }

    #[derive(Default)]
    pub struct FakeStore {
        pub items: RefCell<Vec<StoredItem>>,
        pub preferences: RefCell<Vec<Preference>>,
        pub reports: RefCell<Vec<Report>>,
        pub purged_at: Cell<Option<u64>>,
    }

    impl ItemStore for FakeStore {
        fn items_between(&self, _table: &str, from: u64, to: u64) -> Result<Vec<Item>> {
            Ok(self
                .items
                .borrow()
                .iter()
                .filter(|s| (from..=to).contains(&s.item.created_at))
                .map(|s| s.item.clone())
                .collect())
        }

        fn put_item(&self, _table: &str, item: &StoredItem) -> Result<()> {
            self.items.borrow_mut().push(item.clone());
            Ok(())
        }

        fn purge_expired(&self, _table: &str, now: u64) -> Result<usize> {
            self.purged_at.set(Some(now));
            Ok(0)
        }
    }

    impl PreferenceStore for FakeStore {
        fn preferences(&self, _table: &str) -> Result<Vec<Preference>> {
            Ok(self.preferences.borrow().clone())
        }

        fn put_preference(&self, _table: &str, preference: &Preference) -> Result<()> {
            let mut prefs = self.preferences.borrow_mut();
            match prefs.iter_mut().find(|p| p.keyword == preference.keyword) {
                Some(existing) => existing.weight = preference.weight,
                None => prefs.push(preference.clone()),
            }
            Ok(())
        }
    }

    impl ReportStore for FakeStore {
        fn reports_between(&self, _table: &str, from: u64, to: u64) -> Result<Vec<Report>> {
            Ok(self
                .reports
                .borrow()
                .iter()
                .filter(|r| r.created_at >= from && r.created_at < to)
                .cloned()
                .collect())
        }

        fn put_report(&self, _table: &str, report: &Report) -> Result<()> {
            self.reports.borrow_mut().push(report.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    pub struct FakeFeed {
        pub top: Vec<u64>,
        pub items: HashMap<String, FeedItem>,
        pub failing: bool,
    }

    impl ContentFeed for FakeFeed {
        async fn top_ids(&self, _feed_url: &str) -> Result<Vec<u64>, UpstreamError> {
            if self.failing {
                return Err(UpstreamError::Decode("feed down".into()));
            }
            Ok(self.top.clone())
        }

        async fn fetch_item(
            &self,
            id: &str,
            _feed_url: &str,
        ) -> Result<Option<FeedItem>, UpstreamError> {
            if self.failing {
                return Err(UpstreamError::Decode("feed down".into()));
            }
            Ok(self.items.get(id).cloned())
        }
    }

    #[derive(Default)]
    pub struct FakeLinks {
        pub links: Vec<Link>,
        pub clicks: HashMap<String, Vec<ClickSample>>,
        pub shortened: RefCell<Vec<String>>,
        pub failing: bool,
    }

    impl LinkService for FakeLinks {
        async fn shorten(&self, url: &str, title: &str) -> Result<Link, UpstreamError> {
            if self.failing {
                return Err(UpstreamError::MissingGroup);
            }
            self.shortened.borrow_mut().push(url.to_string());
            let n = self.shortened.borrow().len();
            Ok(Link {
                id: format!("bit.ly/{n}"),
                link: format!("https://bit.ly/{n}"),
                title: Some(title.to_string()),
            })
        }

        async fn group_id(&self) -> Result<String, UpstreamError> {
            if self.failing {
                return Err(UpstreamError::MissingGroup);
            }
            Ok("group".to_string())
        }

        async fn list_links(
            &self,
            _group_id: &str,
            _since: u64,
        ) -> Result<Vec<Link>, UpstreamError> {
            Ok(self.links.clone())
        }

        async fn clicks(
            &self,
            link_id: &str,
            _unit: &str,
            _units: u32,
        ) -> Result<Vec<ClickSample>, UpstreamError> {
            Ok(self.clicks.get(link_id).cloned().unwrap_or_default())
        }
    }

    /// Formatted log output collected while a [`capture_logs`] guard lives.
    #[derive(Clone, Default)]
    pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        pub fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    pub fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        (buffer, tracing::subscriber::set_default(subscriber))
    }

    #[derive(Default)]
    pub struct FakeSink {
        pub published: RefCell<Vec<(String, String, String)>>,
    }

    impl NotificationSink for FakeSink {
        async fn publish(
            &self,
            topic_hint: &str,
            text: &str,
            subject: &str,
        ) -> Result<(), UpstreamError> {
            self.published.borrow_mut().push((
                topic_hint.to_string(),
                text.to_string(),
                subject.to_string(),
            ));
            Ok(())
        }
    }
}
