mod report;

use anyhow::{Context, Result};
use clap::Parser;
use std::collections::HashSet;
use std::io::IsTerminal;
use std::path::PathBuf;

use sprintstats_core::{config, gather_stats, Issue, Settings};
use sprintstats_jira::{
    fetch_subtasks, find_custom_field, find_sprint, IssueProvider, JiraClient, StderrDots,
};

/// Display name of the custom field holding story point estimates.
const STORY_POINTS_FIELD: &str = "Story Points";

#[derive(Parser)]
#[command(name = "sprintstats")]
#[command(version, about = "Gather statistics about a JIRA sprint", long_about = None)]
struct Cli {
    /// JIRA user name used for authentication
    #[arg(short, long)]
    user: Option<String>,

    /// JIRA password used for authentication
    #[arg(short, long)]
    password: Option<String>,

    /// JIRA server URL, e.g. https://jira.example.com
    #[arg(short, long)]
    server: Option<String>,

    /// Alternate config file; falls back to the discovered files when missing
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Id of the board that houses the sprint (see --list-boards)
    #[arg(short, long)]
    board: Option<u64>,

    /// Name of the sprint to gather stats for
    #[arg(short = 't', long)]
    sprint: Option<String>,

    /// Story points assumed for issues that were never scored
    #[arg(short = 'd', long)]
    default_points: Option<f64>,

    /// List boards with their ids and exit
    #[arg(short, long)]
    list_boards: bool,
}

/// Connection settings after merging flags over config files. Flags always
/// win.
#[derive(Debug)]
struct Connection {
    server: String,
    user: String,
    password: String,
}

fn resolve_connection(cli: &Cli, settings: &Settings) -> Result<Connection> {
    let server = cli
        .server
        .clone()
        .or_else(|| settings.server.clone())
        .context("No JIRA server configured; pass --server or set `server` in the config file")?;
    let user = cli
        .user
        .clone()
        .or_else(|| settings.user.clone())
        .context("No JIRA user configured; pass --user or set `user` in the config file")?;
    let password = cli
        .password
        .clone()
        .or_else(|| settings.password.clone())
        .context("No JIRA password configured; pass --password or set `password` in the config file")?;

    Ok(Connection {
        server,
        user,
        password,
    })
}

/// The sub-task closure of every completed issue, deduplicated across
/// parents but otherwise in traversal order.
fn collect_subtasks(completed: &[Issue], provider: &dyn IssueProvider) -> Result<Vec<Issue>> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut subtasks = Vec::new();
    for issue in completed {
        for subtask in fetch_subtasks(issue, provider)? {
            if seen.insert(subtask.key.clone()) {
                subtasks.push(subtask);
            }
        }
    }
    Ok(subtasks)
}

/// Terminate the progress dot run with a newline so the report starts on a
/// fresh line.
fn finish_progress() {
    if std::io::stderr().is_terminal() {
        eprintln!();
    }
}

fn run(cli: &Cli) -> Result<()> {
    let settings = config::load_settings(cli.config.as_deref(), config::DEFAULT_CONFIG_PATHS)?;
    let connection = resolve_connection(cli, &settings)?;
    let client = JiraClient::new(&connection.server, &connection.user, &connection.password)
        .with_progress(Box::new(StderrDots));

    if cli.list_boards {
        let boards = client.boards()?;
        finish_progress();
        report::print_boards(&boards);
        return Ok(());
    }

    let board_id = cli
        .board
        .context("No board id supplied; use --board (see --list-boards)")?;
    let sprint_name = cli
        .sprint
        .as_deref()
        .context("No sprint name supplied; use --sprint")?;

    let sprint = find_sprint(sprint_name, board_id, &client)?
        .with_context(|| format!("Sprint '{sprint_name}' not found on board {board_id}"))?;

    let story_field = find_custom_field(STORY_POINTS_FIELD, &client)?
        .context("Could not find the Story Points custom field on this JIRA instance")?;
    log::debug!("Story points field resolved to {}", story_field.id);
    let client = client.with_story_field(story_field.id);

    let completed = client.completed_issues(board_id, sprint.id)?;
    let incomplete = client.incompleted_issues(board_id, sprint.id)?;
    let subtasks = collect_subtasks(&completed, &client)?;
    finish_progress();

    let default_points = cli
        .default_points
        .unwrap_or_else(|| settings.default_points());
    let stats = gather_stats(&completed, default_points);

    report::print_issues("Completed Issues", &completed);
    report::print_issues("Incomplete Issues", &incomplete);
    if !subtasks.is_empty() {
        report::print_subtasks("Completed Sub-tasks", &subtasks);
    }
    report::print_stats(&format!("Sprint Statistics: {}", sprint.name), &stats);

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();
    run(&cli)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli_with(server: Option<&str>, user: Option<&str>, password: Option<&str>) -> Cli {
        Cli {
            user: user.map(ToString::to_string),
            password: password.map(ToString::to_string),
            server: server.map(ToString::to_string),
            config: None,
            board: None,
            sprint: None,
            default_points: None,
            list_boards: false,
        }
    }

    fn settings_with(server: Option<&str>, user: Option<&str>, password: Option<&str>) -> Settings {
        Settings {
            user: user.map(ToString::to_string),
            password: password.map(ToString::to_string),
            server: server.map(ToString::to_string),
            default_points: None,
        }
    }

    #[test]
    fn test_flags_override_config_file() {
        let cli = cli_with(Some("https://flag.example.com"), Some("flag-user"), None);
        let settings = settings_with(
            Some("https://file.example.com"),
            Some("file-user"),
            Some("file-pass"),
        );

        let connection = resolve_connection(&cli, &settings).unwrap();
        assert_eq!(connection.server, "https://flag.example.com");
        assert_eq!(connection.user, "flag-user");
        assert_eq!(connection.password, "file-pass");
    }

    #[test]
    fn test_config_file_fills_missing_flags() {
        let cli = cli_with(None, None, None);
        let settings = settings_with(Some("https://file.example.com"), Some("u"), Some("p"));

        let connection = resolve_connection(&cli, &settings).unwrap();
        assert_eq!(connection.server, "https://file.example.com");
    }

    #[test]
    fn test_missing_credentials_are_an_error() {
        let cli = cli_with(Some("https://jira.example.com"), Some("user"), None);
        let settings = Settings::default();

        let err = resolve_connection(&cli, &settings).unwrap_err();
        assert!(err.to_string().contains("password"));
    }

    #[test]
    fn test_cli_parses_all_flags() {
        let cli = Cli::parse_from([
            "sprintstats",
            "--server",
            "https://jira.example.com",
            "-u",
            "user",
            "-p",
            "secret",
            "-b",
            "42",
            "-t",
            "Sprint 7",
            "-d",
            "3",
        ]);
        assert_eq!(cli.board, Some(42));
        assert_eq!(cli.sprint.as_deref(), Some("Sprint 7"));
        assert_eq!(cli.default_points, Some(3.0));
        assert!(!cli.list_boards);
    }

    #[test]
    fn test_cli_list_boards_mode() {
        let cli = Cli::parse_from(["sprintstats", "-s", "https://jira.example.com", "-l"]);
        assert!(cli.list_boards);
        assert!(cli.board.is_none());
    }
}
