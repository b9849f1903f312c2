//! CLI command definitions using clap
//!
//! Defines the command structure for the `bugprompt` CLI tool.

use clap::{Args, Parser, Subcommand, ValueEnum};

/// bugprompt - turn a bug report into a ready-to-paste prompt
///
/// Run without arguments to open the terminal form.
#[derive(Parser, Debug)]
#[command(name = "bugprompt", version, about, long_about = None)]
pub struct Cli {
    /// Prompt endpoint for this run (overrides the configured one)
    #[arg(long, global = true, env = "BUGPROMPT_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Submit the form without the terminal UI and print the prompt
    Submit(SubmitArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Submit Command
// ─────────────────────────────────────────────────────────────────────────────

/// Form fields for a one-shot submission
#[derive(Args, Debug, Default)]
pub struct SubmitArgs {
    /// What you are trying to do
    #[arg(long, short, default_value = "")]
    pub request: String,

    /// A file whose content should go into the prompt (repeatable, up to 10)
    #[arg(long = "file", short = 'f', value_name = "PATH")]
    pub files: Vec<String>,

    /// Description of the current problem
    #[arg(long, short, default_value = "")]
    pub problem: String,

    /// Where the server writes the bug summary
    #[arg(long, value_name = "PATH", default_value = "")]
    pub bug_file: String,

    /// Where the server writes the proposed solution
    #[arg(long, value_name = "PATH", default_value = "")]
    pub solution_file: String,

    /// Also copy the prompt to the clipboard
    #[arg(long)]
    pub copy: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Config Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration commands
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Set a configuration value
    Set {
        /// Configuration key
        key: ConfigKey,

        /// Configuration value
        value: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key
        key: ConfigKey,
    },

    /// Reset a configuration value to its default
    Remove {
        /// Configuration key
        key: ConfigKey,
    },

    /// Print the configuration file location
    Path,
}

/// Available configuration keys
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ConfigKey {
    /// Prompt endpoint URL
    #[value(name = "endpoint")]
    Endpoint,

    /// Request timeout in seconds
    #[value(name = "timeout")]
    Timeout,
}
