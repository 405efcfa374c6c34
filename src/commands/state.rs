use anyhow::{Context as _, Result};

use crate::Context;
use crate::resource;
use crate::state::ProviderState;
use crate::ui;

/// (label, kind, id) for every recorded resource
fn rows(state: &ProviderState) -> Vec<(String, &'static str, String)> {
    state
        .resources
        .iter()
        .map(|(label, entry)| {
            (
                label.clone(),
                resource::build(&entry.spec).resource_type(),
                entry.data.id().unwrap_or("-").to_string(),
            )
        })
        .collect()
}

pub fn list(ctx: &Context) -> Result<()> {
    let state = ProviderState::load(&ctx.state)?;
    ui::header("Managed Resources");

    let rows = rows(&state);
    if rows.is_empty() {
        ui::info("No resources recorded");
        return Ok(());
    }

    for (label, kind, id) in rows {
        println!("  {label:<24} {kind:<36} {id}");
    }
    println!();
    ui::dim(&format!(
        "Last updated {}",
        state.last_updated.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    Ok(())
}

pub fn show(ctx: &Context, label: &str) -> Result<()> {
    let state = ProviderState::load(&ctx.state)?;
    let entry = state
        .get(label)
        .with_context(|| format!("{label} is not in the state file"))?;

    ui::header(label);
    ui::kv("type", resource::build(&entry.spec).resource_type());
    ui::kv("id", entry.data.id().unwrap_or("-"));

    ui::section("Attributes");
    for (key, value) in entry.data.attributes() {
        ui::kv(key, &ui::format_attr(key, value));
    }
    Ok(())
}
