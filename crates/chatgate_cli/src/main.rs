//! CLI entry point for chatgate.

mod cli;
mod commands;
mod output;

use clap::Parser;
use chatgate_observability::ObservabilityConfig;

use crate::cli::Cli;

/// Load the nearest `.env`, walking up from the working directory.
/// Variables already set in the environment win.
fn load_env_file() {
    let Ok(cwd) = std::env::current_dir() else {
        return;
    };
    for dir in cwd.ancestors().take(32) {
        let env_file = dir.join(".env");
        if env_file.exists() {
            let _ = dotenvy::from_path(&env_file);
            break;
        }
    }
}

fn init_tracing(verbose: bool) {
    let mut config = ObservabilityConfig::from_env().with_version(env!("CARGO_PKG_VERSION"));
    if config.log_level.is_none() {
        let level = if verbose { "info,chatgate_llms=debug" } else { "warn" };
        config = config.with_log_level(level);
    }
    if let Err(e) = chatgate_observability::init(config) {
        eprintln!("chatgate: {e}");
    }
}

#[tokio::main]
async fn main() {
    load_env_file();
    let cli = Cli::parse();
    output::init(cli.output);
    init_tracing(cli.verbose);

    let result = commands::handle(cli).await;
    chatgate_observability::shutdown();

    if let Err(e) = result {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
