//! `chatgate status`

use anyhow::Result;
use chatgate_llms::{AdapterRegistry, BackendStatus, Liveness};
use comfy_table::{Cell, Color};

use crate::output;

pub async fn handle(registry: &AdapterRegistry, backend: Option<&str>) -> Result<()> {
    let statuses = match backend {
        Some(id) => vec![registry.get_by_id(id)?.status().await],
        None => registry.status_all().await,
    };

    if output::is_json() {
        output::data("status", &statuses);
        return Ok(());
    }

    output::header("Backends");
    let mut table = output::table(&[
        "Backend", "Enabled", "Health", "Model", "Endpoint", "API key", "Temp", "Max tokens",
    ]);
    for status in &statuses {
        table.add_row(row(status));
    }
    println!("{table}");
    output::dim(&format!(
        "Health results are cached for {}s per backend.",
        statuses.first().map(|s| s.health_ttl_secs).unwrap_or(30)
    ));

    Ok(())
}

fn row(status: &BackendStatus) -> Vec<Cell> {
    let enabled = if status.enabled {
        output::state_cell("yes", Color::Green)
    } else {
        output::state_cell("no", Color::DarkGrey)
    };
    let key = match (status.backend.requires_api_key(), status.api_key_configured) {
        (false, _) => output::state_cell("not needed", Color::DarkGrey),
        (true, true) => output::state_cell("configured", Color::Green),
        (true, false) => output::state_cell("missing", Color::Yellow),
    };

    vec![
        Cell::new(status.backend.label()).fg(Color::Green),
        enabled,
        liveness_cell(status.liveness),
        Cell::new(&status.model),
        Cell::new(&status.base_url),
        key,
        Cell::new(format!("{:.2}", status.temperature)),
        Cell::new(status.max_tokens),
    ]
}

pub fn liveness_cell(liveness: Liveness) -> Cell {
    match liveness {
        Liveness::Healthy => output::state_cell("healthy", Color::Green),
        Liveness::Unhealthy => output::state_cell("unhealthy", Color::Red),
        Liveness::Unknown => output::state_cell("unavailable", Color::Yellow),
    }
}
