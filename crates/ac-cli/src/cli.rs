use clap::{Parser, Subcommand};

/// ac-agent — a thin CLI wrapping the agent runtime core for development use.
#[derive(Debug, Parser)]
#[command(name = "ac-agent", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Send a single message to a fresh agent run and print the result.
    Run {
        /// The message to send.
        message: String,
        /// Print the full run summary as JSON instead of plain text.
        #[arg(long)]
        json: bool,
    },
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

/// Path to the config file: `AC_CONFIG` env var, or `config.toml` by default.
pub fn config_path() -> String {
    std::env::var("AC_CONFIG").unwrap_or_else(|_| "config.toml".into())
}
