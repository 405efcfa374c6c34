//! Execution engine for mzprov
//!
//! The engine orchestrates:
//! 1. Refreshing - Re-read every recorded resource
//! 2. Planning - Classify declared and recorded labels
//! 3. Executing - Apply the plan and write outcomes back to state

pub mod differ;
pub mod executor;
pub mod planner;

pub use differ::display_plan;
pub use executor::{BarProgress, PromptConfirm, print_summary};
pub use planner::{build_plan, destroy_plan, import, refresh};

use declarative::{ApplyResult, Plan};

use crate::manifest::Manifest;
use crate::providers::Providers;
use crate::state::ProviderState;

/// Write every change's resulting data back into state.
///
/// A successful change records the declared spec; a failed one keeps the
/// spec it was recorded with, so the next run retries against the same
/// remote object. Records left without an id are dropped.
pub fn record_results(plan: &Plan<Providers>, manifest: &Manifest, state: &mut ProviderState) {
    for change in &plan.changes {
        let failed = matches!(change.result, Some(ApplyResult::Failed { .. }));
        let declared = manifest.resources.get(&change.label);
        let recorded = state.get(&change.label).map(|e| e.spec.clone());

        let spec = match (failed, declared, recorded) {
            (false, Some(declared), _) => declared.clone(),
            (_, _, Some(recorded)) => recorded,
            (true, Some(declared), None) => declared.clone(),
            (_, None, None) => continue,
        };
        state.record(&change.label, spec, change.data.clone());
    }
    state.touch();
}
