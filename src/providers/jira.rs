use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use base64::Engine;
use reqwest::StatusCode;
use serde::Deserialize;

use super::IssueSource;
use crate::model::issue::Issue;

const PAGE_SIZE: usize = 100;

pub struct JiraClient {
    base_url: String,
    auth_header: String,
    client: reqwest::Client,
}

impl JiraClient {
    pub fn new(base_url: String, user: String, password: String) -> Self {
        let creds = format!("{user}:{password}");
        let encoded = base64::engine::general_purpose::STANDARD.encode(creds);
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header: format!("Basic {encoded}"),
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    total: usize,
    issues: Vec<JiraIssue>,
}

#[derive(Deserialize)]
struct JiraIssue {
    key: String,
    fields: IssueFields,
}

#[derive(Deserialize)]
struct IssueFields {
    summary: Option<String>,
    status: Option<StatusField>,
    priority: Option<PriorityField>,
}

#[derive(Deserialize)]
struct StatusField {
    name: String,
}

#[derive(Deserialize)]
struct PriorityField {
    name: String,
}

impl From<JiraIssue> for Issue {
    fn from(issue: JiraIssue) -> Self {
        Issue {
            key: issue.key,
            summary: issue.fields.summary.unwrap_or_default(),
            priority: issue.fields.priority.map(|p| p.name).unwrap_or_default(),
            status: issue.fields.status.map(|s| s.name).unwrap_or_default(),
        }
    }
}

#[async_trait]
impl IssueSource for JiraClient {
    fn name(&self) -> &str {
        "Jira"
    }

    /// Pages through the search API until the whole project is fetched.
    async fn fetch_issues(&self, project: &str) -> Result<Vec<Issue>> {
        let jql = format!("project=\"{project}\"");
        let mut issues: Vec<Issue> = Vec::new();

        loop {
            let url = format!(
                "{}/rest/api/2/search?jql={}&startAt={}&maxResults={}&fields=summary,status,priority",
                self.base_url,
                urlencoding::encode(&jql),
                issues.len(),
                PAGE_SIZE,
            );

            let resp = self
                .client
                .get(&url)
                .header("Authorization", &self.auth_header)
                .header("Accept", "application/json")
                .send()
                .await
                .context("Jira API request failed")?;

            if matches!(
                resp.status(),
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
            ) {
                bail!("Jira server authentication failed");
            }
            let resp = resp
                .error_for_status()
                .context("Jira search returned an error")?;

            let page: SearchResponse =
                resp.json().await.context("Failed to parse Jira response")?;
            let page_len = page.issues.len();
            issues.extend(page.issues.into_iter().map(Issue::from));

            if issues.len() >= page.total || page_len == 0 {
                break;
            }
        }

        Ok(issues)
    }
}
