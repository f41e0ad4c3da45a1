use anyhow::{Context, Result};
use rumor_core::{REPORT_SUBJECT, format_report};

use super::hours_before;
use crate::config::RumorConfig;
use crate::ports::{NotificationSink, ReportStore};

/// Publish every report created in the last `period_hours`.
pub async fn send_reports<S: ReportStore, N: NotificationSink>(
    store: &S,
    sink: &N,
    config: &RumorConfig,
    period_hours: u64,
    now: u64,
) -> Result<usize> {
    let from = hours_before(now, period_hours);
    let reports = store.reports_between(&config.evaluation_report_table_name, from, now)?;
    if reports.is_empty() {
        tracing::info!("No reports to send");
        return Ok(0);
    }

    for report in &reports {
        sink.publish(
            &config.notification_topic_name,
            &format_report(report),
            REPORT_SUBJECT,
        )
        .await
        .with_context(|| format!("failed to publish report {}", report.id))?;
    }
    tracing::info!("Sent {} report(s)", reports.len());
    Ok(reports.len())
}
