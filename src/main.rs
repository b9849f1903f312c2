//! bugprompt - turn a bug report into a ready-to-paste AI prompt
//!
//! Run without arguments to open the terminal form, or use subcommands
//! for scripted submissions and configuration.

use std::fs::OpenOptions;
use std::sync::Mutex;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use bugprompt::api::PromptClient;
use bugprompt::cli::commands::{Cli, Commands};
use bugprompt::cli::{config, submit};
use bugprompt::core::config::Config;
use bugprompt::error::{BugpromptError, Result};
use bugprompt::tui::App;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logging(cli.command.is_none());

    if let Err(e) = run(cli).await {
        handle_error(&e);
        std::process::exit(1);
    }
}

/// Initialize logging
///
/// The terminal UI owns the screen, so its logs go to a file in the
/// config directory. Subcommands log to stderr.
fn init_logging(tui: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    if !tui {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return;
    }

    let log_file = Config::log_path().ok().and_then(|path| {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok()?;
        }
        OpenOptions::new().create(true).append(true).open(path).ok()
    });

    match log_file {
        Some(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init(),
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::sink)
            .init(),
    }
}

fn handle_error(e: &BugpromptError) {
    match e {
        BugpromptError::Incomplete(messages) => {
            eprintln!("Error: {}", e);
            for message in messages {
                eprintln!("  - {}", message);
            }
        }
        _ => eprintln!("Error: {}", e),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let endpoint = cli.endpoint.as_deref();

    match cli.command {
        // No subcommand - launch TUI mode
        None => run_tui(endpoint).await,
        Some(Commands::Submit(args)) => submit::handle_submit(args, endpoint).await,
        Some(Commands::Config(args)) => config::handle_config(args.command),
    }
}

/// Run the TUI application
async fn run_tui(endpoint: Option<&str>) -> Result<()> {
    let config = Config::load()?.with_endpoint_override(endpoint)?;
    let client = PromptClient::from_config(&config)?;

    tracing::info!("Opening form against {}", client.endpoint());
    let mut app = App::new(client);
    app.run().await
}
