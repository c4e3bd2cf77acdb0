//! Command dispatch.

pub mod chat;
pub mod health;
pub mod status;

use chatgate_llms::AdapterRegistry;

use crate::cli::{Cli, Command};
use anyhow::Result;

pub async fn handle(cli: Cli) -> Result<()> {
    let registry = AdapterRegistry::from_env();

    match cli.command {
        Command::Status { backend } => status::handle(&registry, backend.as_deref()).await,
        Command::Health => health::handle(&registry).await,
        Command::Chat(args) => chat::generate(&registry, args).await,
        Command::Stream(args) => chat::stream(&registry, args).await,
    }
}
