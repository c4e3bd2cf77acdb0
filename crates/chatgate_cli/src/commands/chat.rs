//! `chatgate chat` and `chatgate stream`

use std::fs;
use std::future::Future;
use std::path::Path;

use anyhow::{Context, Result};
use chatgate_llms::{AdapterRegistry, ChatTurn};
use futures::{Stream, StreamExt};

use crate::cli::ChatArgs;
use crate::output;

fn load_history(path: Option<&Path>) -> Result<Vec<ChatTurn>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read history file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("History file {} is not a list of turns", path.display()))
}

pub async fn generate(registry: &AdapterRegistry, args: ChatArgs) -> Result<()> {
    let adapter = registry.get_by_id(&args.backend)?;
    let history = load_history(args.history.as_deref())?;

    let spinner = output::spinner(&format!("Waiting for {}...", adapter.backend().label()));
    let result = adapter
        .generate(&args.prompt, &history, args.system.as_deref())
        .await;
    output::spinner_clear(&spinner);

    let reply = result?;
    if output::is_json() {
        output::data(
            "reply",
            &serde_json::json!({ "backend": adapter.backend(), "text": reply }),
        );
    } else {
        println!("{reply}");
    }
    Ok(())
}

pub async fn stream(registry: &AdapterRegistry, args: ChatArgs) -> Result<()> {
    let adapter = registry.get_by_id(&args.backend)?;
    let history = load_history(args.history.as_deref())?;

    let mut fragments = adapter
        .generate_stream(&args.prompt, &history, args.system.as_deref())
        .await?;

    let end = relay(&mut fragments, tokio::signal::ctrl_c()).await;
    output::end_fragments();
    if matches!(end?, StreamEnd::Interrupted) {
        output::warning("Interrupted");
        return Ok(());
    }

    output::kv("fragments", &fragments.fragments().to_string());
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum StreamEnd {
    Completed,
    Interrupted,
}

/// Print fragments until the stream ends or `interrupt` resolves. The
/// interrupt future lives across every poll, so a signal that arrives while
/// a fragment is being printed still ends the loop.
async fn relay<S, I>(fragments: &mut S, interrupt: I) -> Result<StreamEnd>
where
    S: Stream<Item = chatgate_llms::Result<String>> + Unpin,
    I: Future,
{
    tokio::pin!(interrupt);

    loop {
        tokio::select! {
            next = fragments.next() => match next {
                Some(Ok(text)) => output::fragment(&text),
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(StreamEnd::Completed),
            },
            _ = &mut interrupt => return Ok(StreamEnd::Interrupted),
        }
    }
}
