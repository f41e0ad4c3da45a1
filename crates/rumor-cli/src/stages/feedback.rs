use anyhow::{Context, Result};
use rumor_core::constants::{CLICK_UNIT, CLICK_UNITS};
use rumor_core::{Preference, PreferenceUpdate, adapt_weights, engaged_links};

use super::hours_before;
use crate::config::RumorConfig;
use crate::ports::{LinkService, PreferenceStore};

/// Grow keyword weights from links that were clicked in the feedback window.
///
/// Returns the updates that were persisted, in derivation order.
pub async fn process_feedback<S, L>(
    store: &S,
    links: Option<&L>,
    config: &RumorConfig,
    now: u64,
) -> Result<Vec<PreferenceUpdate>>
where
    S: PreferenceStore,
    L: LinkService,
{
    let Some(links) = links else {
        tracing::warn!("feedback access token is not configured");
        return Ok(Vec::new());
    };

    let group = links.group_id().await.context("failed to resolve link group")?;
    let created_after = hours_before(now, config.feedback_max_age_hours);
    let listed = links
        .list_links(&group, created_after)
        .await
        .context("failed to list links")?;
    if listed.is_empty() {
        tracing::info!("Found no links");
        return Ok(Vec::new());
    }

    let mut observed = Vec::with_capacity(listed.len());
    for link in listed {
        let samples = links
            .clicks(&link.id, CLICK_UNIT, CLICK_UNITS)
            .await
            .with_context(|| format!("failed to fetch clicks for {}", link.id))?;
        observed.push((link, samples));
    }

    let since = hours_before(now, config.feedback_period_hours);
    let engaged = engaged_links(&observed, since);
    tracing::info!("{} clicked links in period", engaged.len());

    let titles: Vec<&str> = engaged
        .iter()
        .filter_map(|link| match link.title.as_deref() {
            Some(title) => Some(title),
            None => {
                tracing::warn!("No title found for link {}", link.id);
                None
            }
        })
        .collect();
    if titles.is_empty() {
        return Ok(Vec::new());
    }

    let table = &config.preference_table_name;
    let preferences = store.preferences(table)?;
    let adaptation = adapt_weights(&titles, &preferences);
    for title in &adaptation.skipped {
        tracing::warn!("No keywords found for link titled {title:?}");
    }

    for update in &adaptation.updates {
        tracing::debug!("keyword {} -> {}", update.keyword, update.weight);
        store.put_preference(table, &Preference::from(update.clone()))?;
    }
    tracing::info!("Updated {} keyword weights", adaptation.updates.len());
    Ok(adaptation.updates)
}
