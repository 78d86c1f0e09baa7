use anyhow::Result;
use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::config::SyncConfig;
use crate::document;
use crate::providers::{DocumentStore, IssueSource};
use crate::render::{render_issues_table, StatusFilter};

pub const PAGE_DESCRIPTION: &str = "Auto-generated issues list from JIRA";

/// One full sync pass: fetch, sort, render, reconcile, push.
pub async fn run(
    source: &dyn IssueSource,
    store: &dyn DocumentStore,
    config: &SyncConfig,
    now: DateTime<Local>,
) -> Result<()> {
    let mut issues = source.fetch_issues(&config.jira_project).await?;
    // Newest keys first
    issues.sort_by(|a, b| b.key.cmp(&a.key));
    info!(
        count = issues.len(),
        project = %config.jira_project,
        "Fetched issues from {}",
        source.name()
    );

    let filter = StatusFilter::from_flag(config.status_filter);
    let table = render_issues_table(&config.jira_url, &issues, filter);

    let existing = store.read(&config.md_file).await?;
    if existing.is_none() {
        warn!(
            "Target {} not found, a new file will be created",
            config.md_file
        );
    }

    let new_content = document::reconcile(
        existing.as_ref().map(|doc| doc.content.as_str()),
        &table,
        &config.commit_message,
        PAGE_DESCRIPTION,
        now,
    )?;

    let message = format!("{} {}", config.commit_message, now.format("%Y-%m-%d"));
    store
        .write(
            &config.md_file,
            &new_content,
            &message,
            existing.as_ref().map(|doc| doc.version.as_str()),
        )
        .await?;
    info!("Pushed {} to {}", config.md_file, store.name());

    Ok(())
}
