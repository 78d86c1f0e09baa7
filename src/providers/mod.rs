pub mod github;
pub mod jira;

use anyhow::Result;
use async_trait::async_trait;

use crate::model::issue::Issue;

/// A file read from the document store, with the version token the store
/// needs to accept a subsequent update.
#[derive(Debug, Clone)]
pub struct RemoteDocument {
    pub content: String,
    pub version: String,
}

#[async_trait]
pub trait IssueSource: Send + Sync {
    fn name(&self) -> &str;
    /// Fetch every issue of the given project. Result order is unspecified;
    /// the caller sorts before rendering.
    async fn fetch_issues(&self, project: &str) -> Result<Vec<Issue>>;
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    fn name(&self) -> &str;
    /// Read the file at `path`, or `None` if it does not exist yet.
    async fn read(&self, path: &str) -> Result<Option<RemoteDocument>>;
    /// Create or update the file at `path`. `previous_version` must be the
    /// token from the prior read when updating, and `None` when creating.
    async fn write(
        &self,
        path: &str,
        content: &str,
        message: &str,
        previous_version: Option<&str>,
    ) -> Result<()>;
}
