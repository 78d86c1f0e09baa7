use anyhow::{bail, Result};

/// Parsed command-line flags. Every flag is optional; credentials fall back
/// to the `JIRA_USR` / `JIRA_PWD` environment variables.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub user: Option<String>,
    pub password: Option<String>,
    pub config_file: Option<String>,
    pub help: bool,
}

pub fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut parsed = CliArgs::default();
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "-u" | "--user" => {
                parsed.user = Some(take_value(args, &mut i, "-u")?);
            }
            "-p" | "--password" => {
                parsed.password = Some(take_value(args, &mut i, "-p")?);
            }
            "-c" | "--config" => {
                parsed.config_file = Some(take_value(args, &mut i, "-c")?);
            }
            "-h" | "--help" => {
                parsed.help = true;
            }
            other => bail!("Unknown argument: {other}"),
        }
        i += 1;
    }

    Ok(parsed)
}

fn take_value(args: &[String], i: &mut usize, flag: &str) -> Result<String> {
    *i += 1;
    if *i < args.len() {
        Ok(args[*i].clone())
    } else {
        bail!("Missing value for {flag} flag")
    }
}

/// Flags win over environment variables, per field.
pub fn resolve_credentials(args: &CliArgs) -> Result<(String, String)> {
    resolve_from(
        args,
        std::env::var("JIRA_USR").ok(),
        std::env::var("JIRA_PWD").ok(),
    )
}

fn resolve_from(
    args: &CliArgs,
    env_user: Option<String>,
    env_password: Option<String>,
) -> Result<(String, String)> {
    let user = args.user.clone().or(env_user);
    let password = args.password.clone().or(env_password);
    match (user, password) {
        (Some(user), Some(password)) => Ok((user, password)),
        _ => bail!("server authentication information (user and/or password) is missing"),
    }
}

pub fn print_help() {
    println!("jira2wiki — sync a Jira project's issues into a wiki page on GitHub\n");
    println!("USAGE:");
    println!("  jira2wiki [-u <user>] [-p <password>] [-c <config_file>]");
    println!();
    println!("OPTIONS:");
    println!("  -u, --user <user>          Jira user name. Required if JIRA_USR is not set.");
    println!("  -p, --password <password>  Jira password. Required if JIRA_PWD is not set.");
    println!("  -c, --config <file>        Path to the config file. Defaults to ./jira2wiki.toml");
    println!("  -h, --help                 Show this help");
}
