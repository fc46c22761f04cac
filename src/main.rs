mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod services;
mod workflow;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{debug, trace};

use crate::cmd::cleanup::{self, CleanupCommandArgs};
use crate::config::{AppConfig, colocated_config_path, locate_config_file};
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::git::GitCli;
use crate::infra::jira::JiraClient;

#[derive(Parser)]
#[command(
    name = "branch-sweep",
    author,
    version,
    about = "Propose deletion of branches whose Jira tickets are done"
)]
struct Cli {
    /// INI configuration file. Ignored when branch-sweep.ini sits next to the executable.
    config: Option<PathBuf>,

    /// Only propose branches that name a ticket returned by the search.
    #[arg(long)]
    strict: bool,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(error) = run(cli).await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(io::stderr)
        .with_target(verbose >= 2)
        .init();

    debug!("branch-sweep started with verbosity level: {verbose}");
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());
}

async fn run(cli: Cli) -> AppResult<()> {
    let colocated = colocated_config_path();
    let path = locate_config_file(cli.config.as_deref(), colocated.as_deref())?;
    let config = AppConfig::load(&path)?;

    let git = Arc::new(GitCli::new(config.git_folder.clone()));
    let issue_tracker = Arc::new(JiraClient::new(config.host.clone(), config.token.clone()));
    let context = AppContext::new(config, git, issue_tracker);

    let mut stdout = io::stdout();
    cleanup::run(&context, CleanupCommandArgs { strict: cli.strict }, &mut stdout).await
}
