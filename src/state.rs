use crate::manifest::ResourceSpec;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use declarative::ResourceData;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

// ============================================================================
// State Structures
// ============================================================================

/// Recorded state of every managed resource, keyed by manifest label
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderState {
    #[serde(default)]
    pub resources: BTreeMap<String, StateEntry>,

    /// Last time the state was updated
    pub last_updated: DateTime<Utc>,
}

/// One managed resource
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct StateEntry {
    /// Configuration the resource was last applied with
    pub spec: ResourceSpec,

    /// Attributes as last read from the remote side
    pub data: ResourceData,
}

// ============================================================================
// ProviderState Implementation
// ============================================================================

impl ProviderState {
    /// Load state from disk, or return default if the file doesn't exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("State file does not exist, using default state");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read state file: {}", path.display()))?;

        let state: ProviderState = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse state file: {}", path.display()))?;

        log::debug!("Loaded state from {}", path.display());
        Ok(state)
    }

    /// Save state to disk
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create state directory: {}", dir.display()))?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize state")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write state file: {}", path.display()))?;

        log::debug!("Saved state to {}", path.display());
        Ok(())
    }

    /// Update the last_updated timestamp to now
    pub fn touch(&mut self) {
        self.last_updated = Utc::now();
    }

    pub fn get(&self, label: &str) -> Option<&StateEntry> {
        self.resources.get(label)
    }

    /// Record a resource; a record without an id is dropped instead.
    pub fn record(&mut self, label: &str, spec: ResourceSpec, data: ResourceData) {
        if data.has_id() {
            self.resources
                .insert(label.to_string(), StateEntry { spec, data });
        } else {
            self.resources.remove(label);
        }
    }
}

impl Default for ProviderState {
    fn default() -> Self {
        Self {
            resources: BTreeMap::new(),
            last_updated: Utc::now(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
