//! Execution engine - applies a plan in order

use crate::context::{ConfirmCallback, ProgressCallback};
use crate::planner::{Action, Plan, PlannedChange};
use crate::types::{ApplyResult, ExecuteOptions, ExecuteSummary, ResourceData};
use anyhow::Result;

/// Execute a plan with the given options and callbacks
///
/// Changes run sequentially in plan order. Each change's `data` is updated
/// in place and its `result` recorded, so the caller can persist whatever
/// state was reached even when some changes fail.
pub fn execute<C, P, F>(
    plan: &mut Plan<C>,
    client: &C,
    opts: &ExecuteOptions,
    progress: &mut P,
    confirm: &mut F,
) -> Result<ExecuteSummary>
where
    C: ?Sized,
    P: ProgressCallback,
    F: ConfirmCallback,
{
    let pending = plan.pending();
    if pending == 0 || opts.dry_run {
        return Ok(ExecuteSummary::default());
    }

    if !confirm.confirm("Apply changes?")? {
        for change in plan.changes.iter_mut().filter(|c| c.action.is_change()) {
            change.result = Some(ApplyResult::Skipped {
                reason: "declined".into(),
            });
        }
        return Ok(ExecuteSummary {
            skipped: pending,
            ..Default::default()
        });
    }

    let mut summary = ExecuteSummary::default();
    progress.on_start(pending);
    for change in plan.changes.iter_mut().filter(|c| c.action.is_change()) {
        progress.on_resource_start(&change.label, &change.resource.description());
        let result = apply_change(change, client);
        progress.on_resource_complete(&change.label, &result);
        summary.add_result(&result);
        change.result = Some(result);
    }
    progress.on_complete();

    Ok(summary)
}

/// Apply a single change
fn apply_change<C: ?Sized>(change: &mut PlannedChange<C>, client: &C) -> ApplyResult {
    let resource = change.resource.as_ref();
    let data = &mut change.data;

    let outcome = match &change.action {
        Action::NoChange => return ApplyResult::NoChange,
        Action::Create => resource.create(client, data).map(|()| ApplyResult::Created),
        Action::Update { changes } => resource
            .update(client, changes, data)
            .map(|()| ApplyResult::Modified),
        Action::Replace { .. } => resource.delete(client, data).and_then(|()| {
            *data = ResourceData::new();
            resource.create(client, data).map(|()| ApplyResult::Replaced)
        }),
        Action::Delete => resource.delete(client, data).map(|()| ApplyResult::Removed),
    };

    match outcome {
        Ok(result) => {
            log::info!("{}: {:?}", change.label, result);
            result
        }
        Err(e) => {
            log::error!("{}: {:#}", change.label, e);
            ApplyResult::Failed {
                error: format!("{e:#}"),
            }
        }
    }
}
