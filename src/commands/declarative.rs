//! plan / apply / refresh / import / destroy

use anyhow::{Result, bail};
use declarative::{AutoConfirm, ExecuteOptions, ExecuteSummary, Plan, execute};

use crate::Context;
use crate::config::ProviderConfig;
use crate::engine::{self, BarProgress, PromptConfirm};
use crate::manifest::Manifest;
use crate::providers::Providers;
use crate::state::ProviderState;
use crate::ui;

// ============================================================================
// Loading
// ============================================================================

fn connect(ctx: &Context) -> Result<Providers> {
    let config = ProviderConfig::load(ctx.config.as_deref())?;
    log::debug!("Using region {:?}, endpoint {}", config.region, config.endpoint);
    Providers::connect(&config, ctx.password.as_deref())
}

/// Refresh recorded state, reporting anything that disappeared remotely.
fn refreshed_state(ctx: &Context, providers: &Providers, target: Option<&str>) -> Result<ProviderState> {
    let mut state = ProviderState::load(&ctx.state)?;
    let vanished = engine::refresh(&mut state, providers, target)?;
    if vanished > 0 && !ctx.quiet {
        ui::warn(&format!("{vanished} recorded resources no longer exist and will be recreated"));
    }
    Ok(state)
}

fn run_plan(
    ctx: &Context,
    plan: &mut Plan<Providers>,
    providers: &Providers,
    auto_approve: bool,
) -> Result<ExecuteSummary> {
    let opts = ExecuteOptions::default();
    let mut progress = BarProgress::new(ctx.quiet);
    if auto_approve {
        execute(plan, providers, &opts, &mut progress, &mut AutoConfirm)
    } else {
        execute(plan, providers, &opts, &mut progress, &mut PromptConfirm)
    }
}

fn finish(summary: &ExecuteSummary) -> Result<()> {
    if summary.total_changes() == 0 && summary.failed == 0 && summary.skipped > 0 {
        println!();
        ui::warn("Cancelled, nothing was changed");
        return Ok(());
    }

    engine::print_summary(summary);
    if !summary.is_success() {
        bail!("{} resources failed to apply", summary.failed);
    }
    Ok(())
}

// ============================================================================
// Plan Command
// ============================================================================

pub fn plan(ctx: &Context, target: Option<&str>) -> Result<()> {
    ui::header("Plan");

    let manifest = Manifest::load(&ctx.manifest)?;
    let providers = connect(ctx)?;
    let state = refreshed_state(ctx, &providers, target)?;

    let plan = engine::build_plan(&manifest, &state, target)?;
    engine::display_plan(&plan);
    Ok(())
}

// ============================================================================
// Apply Command
// ============================================================================

pub fn apply(ctx: &Context, target: Option<&str>, auto_approve: bool) -> Result<()> {
    ui::header("Applying Configuration");

    let manifest = Manifest::load(&ctx.manifest)?;
    let providers = connect(ctx)?;
    let mut state = refreshed_state(ctx, &providers, target)?;

    let mut plan = engine::build_plan(&manifest, &state, target)?;
    engine::display_plan(&plan);

    let summary = run_plan(ctx, &mut plan, &providers, auto_approve)?;
    engine::record_results(&plan, &manifest, &mut state);
    state.save(&ctx.state)?;

    if plan.is_empty() {
        return Ok(());
    }
    finish(&summary)
}

// ============================================================================
// Refresh Command
// ============================================================================

pub fn refresh(ctx: &Context) -> Result<()> {
    ui::header("Refreshing State");

    let providers = connect(ctx)?;
    let mut state = refreshed_state(ctx, &providers, None)?;
    state.touch();
    state.save(&ctx.state)?;

    ui::success(&format!("Refreshed {} resources", state.resources.len()));
    Ok(())
}

// ============================================================================
// Import Command
// ============================================================================

pub fn import(ctx: &Context, label: &str, id: &str) -> Result<()> {
    let manifest = Manifest::load(&ctx.manifest)?;
    let providers = connect(ctx)?;
    let mut state = ProviderState::load(&ctx.state)?;

    let data = engine::import(&manifest, &mut state, &providers, label, id)?;
    state.touch();
    state.save(&ctx.state)?;

    ui::success(&format!(
        "Imported {label} ({})",
        data.id().unwrap_or(id)
    ));
    ui::dim("Run `mzprov plan` to see how it differs from the manifest");
    Ok(())
}

// ============================================================================
// Destroy Command
// ============================================================================

pub fn destroy(ctx: &Context, target: Option<&str>, auto_approve: bool) -> Result<()> {
    ui::header("Destroying Resources");

    let providers = connect(ctx)?;
    let mut state = refreshed_state(ctx, &providers, target)?;

    let mut plan = engine::destroy_plan(&state, target);
    engine::display_plan(&plan);

    let summary = run_plan(ctx, &mut plan, &providers, auto_approve)?;
    engine::record_results(&plan, &Manifest::default(), &mut state);
    state.save(&ctx.state)?;

    if plan.is_empty() {
        return Ok(());
    }
    finish(&summary)
}
