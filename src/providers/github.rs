use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use base64::Engine;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;

use super::{DocumentStore, RemoteDocument};

const API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("jira2wiki/", env!("CARGO_PKG_VERSION"));

/// Document store backed by the GitHub repository contents API. The blob sha
/// returned on read doubles as the optimistic-concurrency token for updates.
pub struct GitHubStore {
    token: String,
    repo: String,
    branch: String,
    client: reqwest::Client,
}

impl GitHubStore {
    pub fn new(token: String, repo: String, branch: String) -> Self {
        Self {
            token,
            repo,
            branch,
            client: reqwest::Client::new(),
        }
    }

    fn contents_url(&self, path: &str) -> String {
        format!("{API_BASE}/repos/{}/contents/{path}", self.repo)
    }
}

#[derive(Deserialize)]
struct ContentsResponse {
    content: String,
    sha: String,
}

/// The contents API returns base64 with embedded line breaks.
fn decode_content(raw: &str) -> Result<String> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact)
        .context("GitHub returned invalid base64 content")?;
    String::from_utf8(bytes).context("GitHub file content is not valid UTF-8")
}

#[async_trait]
impl DocumentStore for GitHubStore {
    fn name(&self) -> &str {
        "GitHub"
    }

    async fn read(&self, path: &str) -> Result<Option<RemoteDocument>> {
        let resp = self
            .client
            .get(self.contents_url(path))
            .query(&[("ref", self.branch.as_str())])
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .context("GitHub contents request failed")?;

        match resp.status() {
            StatusCode::NOT_FOUND => return Ok(None),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                bail!("GitHub authentication failed")
            }
            _ => {}
        }
        let resp = resp
            .error_for_status()
            .context("GitHub contents read returned an error")?;

        let contents: ContentsResponse = resp
            .json()
            .await
            .context("Failed to parse GitHub contents response")?;

        Ok(Some(RemoteDocument {
            content: decode_content(&contents.content)?,
            version: contents.sha,
        }))
    }

    async fn write(
        &self,
        path: &str,
        content: &str,
        message: &str,
        previous_version: Option<&str>,
    ) -> Result<()> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(content);
        let mut body = json!({
            "message": message,
            "content": encoded,
            "branch": self.branch,
        });
        if let Some(sha) = previous_version {
            body["sha"] = json!(sha);
        }

        let resp = self
            .client
            .put(self.contents_url(path))
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT)
            .json(&body)
            .send()
            .await
            .context("GitHub contents update failed")?;

        if matches!(
            resp.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            bail!("GitHub authentication failed");
        }
        resp.error_for_status()
            .context("GitHub rejected the file write")?;

        Ok(())
    }
}
