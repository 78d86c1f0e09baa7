use serde::{Deserialize, Serialize};

/// Snapshot of a single Jira issue, fetched once per run and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Tracker-assigned key, e.g. `PRJ-42`. Unique and lexicographically sortable.
    pub key: String,
    pub summary: String,
    pub priority: String,
    pub status: String,
}
