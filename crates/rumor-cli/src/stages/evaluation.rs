use anyhow::{Context, Result};
use rumor_core::{Qualification, Report, ReportConfig, select_digest};

use super::hours_before;
use crate::config::RumorConfig;
use crate::ports::{ItemStore, LinkService, PreferenceStore, ReportStore};

/// Select the digest for the evaluation window and record it as a report.
///
/// The window ends `news_item_max_age_hours` before `now` so scores have
/// settled, and spans `evaluation_period_hours`. A report is persisted only
/// when at least one item qualifies. Without a link service the entries
/// carry no feedback link.
pub async fn evaluate<S, L>(
    store: &S,
    links: Option<&L>,
    config: &RumorConfig,
    params: Qualification,
    now: u64,
) -> Result<Report>
where
    S: ItemStore + PreferenceStore + ReportStore,
    L: LinkService,
{
    let to = hours_before(now, config.news_item_max_age_hours);
    let from = hours_before(to, config.evaluation_period_hours);

    let items = store.items_between(&config.news_item_table_name, from, to)?;
    let preferences = store.preferences(&config.preference_table_name)?;
    let digest = select_digest(items, &preferences, params);
    tracing::info!("{} news items qualified", digest.len());

    let mut feedback_urls = Vec::with_capacity(digest.len());
    match links {
        Some(links) => {
            for scored in &digest {
                let link = links
                    .shorten(&scored.item.url, scored.item.title())
                    .await
                    .with_context(|| {
                        format!("failed to create feedback link for {}", scored.item.id)
                    })?;
                feedback_urls.push(Some(link.link));
            }
        }
        None if !digest.is_empty() => {
            tracing::warn!("no link service configured, report has no feedback links");
        }
        None => {}
    }

    let report = Report::new(
        now,
        &digest,
        feedback_urls,
        ReportConfig {
            news_item_max_age_hours: config.news_item_max_age_hours,
            evaluation_period_hours: config.evaluation_period_hours,
            qualification_threshold: params.threshold,
            qualification_limit: params.limit,
        },
    );

    if !report.is_empty() {
        store.put_report(&config.evaluation_report_table_name, &report)?;
        tracing::info!("Stored report");
    }
    Ok(report)
}
