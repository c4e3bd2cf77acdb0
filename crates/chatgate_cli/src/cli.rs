//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// One interface to a local model server and hosted chat APIs
#[derive(Parser)]
#[command(name = "chatgate", about, version, propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format: text (human-readable) or json (machine-readable)
    #[arg(short, long, global = true, default_value = "text")]
    pub output: OutputFormat,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// Colored terminal output for humans
    #[default]
    Text,
    /// Structured JSON for scripts
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show configuration and liveness of each backend
    Status {
        /// Only this backend (ollama, cohere, anthropic, gemini)
        #[arg(short, long)]
        backend: Option<String>,
    },
    /// Probe every backend concurrently
    Health,
    /// Generate a complete reply
    Chat(ChatArgs),
    /// Print a reply as it is generated
    Stream(ChatArgs),
}

#[derive(Args)]
pub struct ChatArgs {
    /// Backend to use (ollama, cohere, anthropic, gemini)
    #[arg(short, long, default_value = "ollama")]
    pub backend: String,

    /// System instruction
    #[arg(short, long)]
    pub system: Option<String>,

    /// JSON file with prior turns: [{"role": "user", "content": "..."}, ...]
    #[arg(long)]
    pub history: Option<PathBuf>,

    /// The message to send
    pub prompt: String,
}
