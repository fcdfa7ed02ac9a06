mod cli;
mod commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ac_domain::config::Config;
use cli::{Cli, Command, ConfigCommand};

/// Exit codes: 0 success, 1 configuration/input error, 2 runtime error
/// inside the core.
#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Command::Run { message, json } => {
            init_tracing();
            let config = Config::load_or_default(&cli::config_path());
            match commands::run::run(config, message, json).await {
                Ok(()) => 0,
                Err(e) => {
                    eprintln!("error: {e}");
                    2
                }
            }
        }
        Command::Config(ConfigCommand::Validate) => {
            let path = cli::config_path();
            if commands::config::validate(&path) {
                0
            } else {
                1
            }
        }
        Command::Config(ConfigCommand::Show) => {
            let config = Config::load_or_default(&cli::config_path());
            commands::config::show(&config);
            0
        }
    };

    std::process::exit(exit_code);
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ac_cli=info,ac_loop=info")))
        .json()
        .init();
}
