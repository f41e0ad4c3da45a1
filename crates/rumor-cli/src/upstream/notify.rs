use std::io::Write;

use super::{UpstreamError, check_status, http_client};
use crate::ports::NotificationSink;

/// Posts `{topic, subject, message}` as JSON to a webhook.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: &str) -> Result<Self, UpstreamError> {
        Ok(Self {
            client: http_client()?,
            url: url.to_string(),
        })
    }
}

impl NotificationSink for WebhookNotifier {
    async fn publish(
        &self,
        topic_hint: &str,
        text: &str,
        subject: &str,
    ) -> Result<(), UpstreamError> {
        let body = serde_json::json!({
            "topic": topic_hint,
            "subject": subject,
            "message": text,
        });
        let response = self.client.post(&self.url).json(&body).send().await?;
        check_status("POST", response, &[200, 201, 202, 204])?;
        Ok(())
    }
}

/// Prints notifications to stdout when no webhook is configured.
pub struct StdoutNotifier;

impl NotificationSink for StdoutNotifier {
    async fn publish(
        &self,
        topic_hint: &str,
        text: &str,
        subject: &str,
    ) -> Result<(), UpstreamError> {
        write_notification(&mut std::io::stdout().lock(), topic_hint, text, subject)?;
        Ok(())
    }
}

fn write_notification(
    out: &mut impl Write,
    topic_hint: &str,
    text: &str,
    subject: &str,
) -> std::io::Result<()> {
    writeln!(out, "== {subject} ({topic_hint}) ==")?;
    write!(out, "{text}")?;
    out.flush()
}
