//! `chatgate health`

use anyhow::Result;
use chatgate_llms::{AdapterRegistry, Liveness};
use comfy_table::{Cell, Color};
use serde_json::json;

use super::status::liveness_cell;
use crate::output;

pub async fn handle(registry: &AdapterRegistry) -> Result<()> {
    let spinner = output::spinner("Probing backends...");
    let results = registry.health_all().await;
    let healthy = results.iter().filter(|(_, ok)| *ok).count();
    output::spinner_success(&spinner, &format!("{healthy}/{} backends healthy", results.len()));

    if output::is_json() {
        let items: Vec<_> = results
            .iter()
            .map(|(backend, ok)| json!({ "backend": backend, "healthy": ok }))
            .collect();
        output::data("health", &items);
        return Ok(());
    }

    let mut table = output::table(&["Backend", "Liveness"]);
    for (backend, ok) in &results {
        // Unavailable adapters never probe, so their cache stays unknown.
        let liveness = match registry.get(*backend) {
            Ok(adapter) => adapter.health().liveness(),
            Err(_) => Liveness::from(*ok),
        };
        table.add_row(vec![
            Cell::new(backend.label()).fg(Color::Green),
            liveness_cell(liveness),
        ]);
    }
    println!("{table}");

    Ok(())
}
