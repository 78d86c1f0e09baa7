mod cli;
mod config;
mod document;
mod model;
mod providers;
mod render;
mod sync;

use std::path::Path;

use anyhow::Result;
use chrono::Local;
use tracing_subscriber::EnvFilter;

use providers::github::GitHubStore;
use providers::jira::JiraClient;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jira2wiki=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let raw_args: Vec<String> = std::env::args().skip(1).collect();
    let args = match cli::parse_args(&raw_args) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("Error: {err}\n");
            cli::print_help();
            std::process::exit(1);
        }
    };
    if args.help {
        cli::print_help();
        return Ok(());
    }

    let (user, password) = match cli::resolve_credentials(&args) {
        Ok(creds) => creds,
        Err(err) => {
            eprintln!("Error: {err}\n");
            cli::print_help();
            std::process::exit(1);
        }
    };

    let config_path = args
        .config_file
        .as_deref()
        .unwrap_or(config::DEFAULT_CONFIG_FILE);
    let config = config::load_config(Path::new(config_path))?;

    let jira = JiraClient::new(config.jira_url.clone(), user, password);
    let store = GitHubStore::new(
        config.git_token.clone(),
        config.git_repo.clone(),
        config.git_branch.clone(),
    );

    sync::run(&jira, &store, &config, Local::now()).await?;

    println!("Update pushed, all done!");
    Ok(())
}
