//! Plan construction: refresh recorded state, then classify every label.

use anyhow::{Context, Result, bail};
use declarative::{Plan, ResourceData, extract_region, transform_id};

use crate::manifest::Manifest;
use crate::providers::Providers;
use crate::resource;
use crate::state::ProviderState;

/// Re-read every recorded resource (or just `target`).
///
/// Resources that no longer exist remotely are dropped from the state, so
/// the next plan creates them again. Returns how many were dropped.
pub fn refresh(
    state: &mut ProviderState,
    providers: &Providers,
    target: Option<&str>,
) -> Result<usize> {
    let labels: Vec<String> = state
        .resources
        .keys()
        .filter(|label| target.is_none_or(|t| t == label.as_str()))
        .cloned()
        .collect();

    let mut vanished = 0;
    for label in labels {
        let Some(entry) = state.get(&label).cloned() else {
            continue;
        };
        let driver = resource::build(&entry.spec);
        let mut data = entry.data;
        driver
            .read(providers, &mut data)
            .with_context(|| format!("Failed to refresh {label}"))?;

        if !data.has_id() {
            log::info!("{label} ({}) no longer exists", driver.resource_type());
            vanished += 1;
        }
        state.record(&label, entry.spec, data);
    }

    Ok(vanished)
}

/// Classify declared and recorded resources against each other.
///
/// Declared labels plan create / update / replace / no change against their
/// recorded data; recorded labels the manifest no longer declares plan a
/// delete. Changing the kind behind a recorded label is refused.
pub fn build_plan(
    manifest: &Manifest,
    state: &ProviderState,
    target: Option<&str>,
) -> Result<Plan<Providers>> {
    let mut plan = Plan::new();

    for (label, spec) in &manifest.resources {
        let driver = resource::build(spec);
        let current = state.get(label);
        if let Some(entry) = current {
            let recorded = resource::build(&entry.spec);
            if recorded.resource_type() != driver.resource_type() {
                bail!(
                    "{label} is recorded as {} but declared as {}; destroy it before changing its type",
                    recorded.resource_type(),
                    driver.resource_type()
                );
            }
        }
        plan.add(label.as_str(), driver, current.map(|e| e.data.clone()));
    }

    for (label, entry) in &state.resources {
        if !manifest.resources.contains_key(label) {
            plan.add_delete(label.as_str(), resource::build(&entry.spec), entry.data.clone());
        }
    }

    Ok(plan.filter_by_label(target))
}

/// Plan a delete of every recorded resource (or just `target`).
pub fn destroy_plan(state: &ProviderState, target: Option<&str>) -> Plan<Providers> {
    let mut plan = Plan::new();
    for (label, entry) in &state.resources {
        plan.add_delete(label.as_str(), resource::build(&entry.spec), entry.data.clone());
    }
    plan.filter_by_label(target)
}

/// Adopt an existing remote object under a declared label.
///
/// A bare id for a SQL kind is prefixed with the configured region.
pub fn import(
    manifest: &Manifest,
    state: &mut ProviderState,
    providers: &Providers,
    label: &str,
    id: &str,
) -> Result<ResourceData> {
    let spec = manifest
        .resources
        .get(label)
        .with_context(|| format!("{label} is not declared in the manifest"))?;
    if state.get(label).is_some() {
        bail!("{label} is already managed");
    }

    let id = if spec.is_sql() && extract_region(id).is_none() {
        transform_id(providers.region(), id)
    } else {
        id.to_string()
    };

    let driver = resource::build(spec);
    let mut data = ResourceData::new();
    driver
        .import(providers, &id, &mut data)
        .with_context(|| format!("Failed to import {label}"))?;
    if !data.has_id() {
        bail!("{} {id} does not exist", driver.resource_type());
    }

    state.record(label, spec.clone(), data.clone());
    Ok(data)
}
