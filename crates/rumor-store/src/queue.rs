//! Durable at-least-once message queues.
//!
//! A received message stays invisible for [`VISIBILITY_TIMEOUT_SECS`] under a
//! fresh receipt handle. Deleting by that handle acknowledges it; otherwise it
//! becomes receivable again once the timeout lapses.

use rusqlite::params;
use uuid::Uuid;

use crate::error::Result;
use crate::store::Store;

pub const VISIBILITY_TIMEOUT_SECS: u64 = 30;

/// A message handed out by [`Store::receive_messages`].
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: i64,
    pub receipt_handle: String,
    pub body: String,
}

impl Store {
    /// Append records to a queue, committing at most `batch_size` per
    /// transaction.
    pub fn send_messages(&self, queue: &str, bodies: &[String], batch_size: usize) -> Result<()> {
        for chunk in bodies.chunks(batch_size.max(1)) {
            let tx = self.conn().unchecked_transaction()?;
            for body in chunk {
                tx.execute(
                    "INSERT INTO messages (queue_name, body, visible_at) VALUES (?1, ?2, 0)",
                    params![queue, body],
                )?;
            }
            tx.commit()?;
        }
        Ok(())
    }

    /// Receive up to `max` visible messages, oldest first.
    pub fn receive_messages(&self, queue: &str, max: usize, now: u64) -> Result<Vec<Message>> {
        let tx = self.conn().unchecked_transaction()?;

        let ids: Vec<(i64, String)> = {
            let mut stmt = tx.prepare(
                "SELECT id, body FROM messages
                 WHERE queue_name = ?1 AND visible_at <= ?2
                 ORDER BY id LIMIT ?3",
            )?;
            let rows = stmt
                .query_map(params![queue, now as i64, max as i64], |row| {
                    Ok((row.get(0)?, row.get(1)?))
                })?
                .collect::<std::result::Result<_, _>>()?;
            rows
        };

        let hidden_until = (now + VISIBILITY_TIMEOUT_SECS) as i64;
        let mut messages = Vec::with_capacity(ids.len());
        for (id, body) in ids {
            let receipt_handle = Uuid::new_v4().to_string();
            tx.execute(
                "UPDATE messages SET receipt_handle = ?1, visible_at = ?2 WHERE id = ?3",
                params![receipt_handle, hidden_until, id],
            )?;
            messages.push(Message {
                id,
                receipt_handle,
                body,
            });
        }

        tx.commit()?;
        Ok(messages)
    }

    /// Acknowledge messages. Stale receipt handles (the message was
    /// redelivered since) are ignored.
    pub fn delete_messages(&self, queue: &str, messages: &[Message]) -> Result<usize> {
        let tx = self.conn().unchecked_transaction()?;
        let mut deleted = 0;
        for message in messages {
            deleted += tx.execute(
                "DELETE FROM messages WHERE queue_name = ?1 AND receipt_handle = ?2",
                params![queue, message.receipt_handle],
            )?;
        }
        tx.commit()?;
        Ok(deleted)
    }

    /// Messages currently waiting in a queue, visible or in flight.
    pub fn queue_depth(&self, queue: &str) -> Result<u64> {
        self.count("SELECT COUNT(*) FROM messages WHERE queue_name = ?1", queue)
    }
}
