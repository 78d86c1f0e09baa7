use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "jira2wiki.toml";

#[derive(Debug, Deserialize)]
pub struct SyncConfig {
    /// Base URL of the Jira server, e.g. `https://jira.example.com`.
    pub jira_url: String,
    /// Project whose issues are synced.
    pub jira_project: String,
    /// When true, only open and in-progress statuses are rendered.
    #[serde(default)]
    pub status_filter: bool,
    /// Personal access token for the target repository.
    pub git_token: String,
    /// Repository in `owner/name` form.
    pub git_repo: String,
    #[serde(default = "default_branch")]
    pub git_branch: String,
    /// Path of the generated page inside the repository.
    pub md_file: String,
    /// Commit message prefix; also used as the page title.
    pub commit_message: String,
}

fn default_branch() -> String {
    "master".to_string()
}

pub fn load_config(path: &Path) -> Result<SyncConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: SyncConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
jira_url = "https://jira.example.com"
jira_project = "PRJ"
status_filter = true
git_token = "ghp_secret"
git_repo = "acme/wiki"
md_file = "docs/issues.md"
commit_message = "Issue list update"
"#;

    #[test]
    fn parses_full_config() {
        let config: SyncConfig = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.jira_url, "https://jira.example.com");
        assert_eq!(config.jira_project, "PRJ");
        assert!(config.status_filter);
        assert_eq!(config.git_repo, "acme/wiki");
        assert_eq!(config.git_branch, "master");
        assert_eq!(config.md_file, "docs/issues.md");
    }

    #[test]
    fn status_filter_defaults_to_all() {
        let trimmed = SAMPLE.replace("status_filter = true\n", "");
        let config: SyncConfig = toml::from_str(&trimmed).unwrap();
        assert!(!config.status_filter);
    }

    #[test]
    fn missing_required_field_fails() {
        let broken = SAMPLE.replace("jira_project = \"PRJ\"\n", "");
        assert!(toml::from_str::<SyncConfig>(&broken).is_err());
    }

    #[test]
    fn load_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.jira_project, "PRJ");
    }

    #[test]
    fn load_missing_file_fails() {
        let err = load_config(Path::new("/nonexistent/jira2wiki.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}
