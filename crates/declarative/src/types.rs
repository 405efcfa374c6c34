//! Core types for declarative resource reconciliation

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One attribute value in a resource record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Text(String),
    List(Vec<String>),
}

impl AttrValue {
    /// Empty text and empty lists count as unset.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::List(l) => l.is_empty(),
            Self::Bool(_) | Self::Int(_) => false,
        }
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// Flat attribute record for one resource.
///
/// `id` is the remote identity; `None` means the resource does not exist
/// remotely (never created, deleted, or vanished on read).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default)]
    attributes: BTreeMap<String, AttrValue>,
}

impl ResourceData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn has_id(&self) -> bool {
        self.id.is_some()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    pub fn clear_id(&mut self) {
        self.id = None;
    }

    pub fn set(&mut self, key: &str, value: impl Into<AttrValue>) {
        self.attributes.insert(key.to_string(), value.into());
    }

    /// Set `key` when `value` is present, remove it otherwise.
    pub fn set_opt<T: Into<AttrValue>>(&mut self, key: &str, value: Option<T>) {
        match value {
            Some(v) => self.set(key, v),
            None => self.remove(key),
        }
    }

    /// Store an unordered set as a sorted, deduplicated list.
    pub fn set_set<I, S>(&mut self, key: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list: Vec<String> = values.into_iter().map(Into::into).collect();
        list.sort();
        list.dedup();
        self.set(key, list);
    }

    pub fn remove(&mut self, key: &str) {
        self.attributes.remove(key);
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.attributes.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.attributes.get(key) {
            Some(AttrValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get_str(key).map(str::to_string)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.attributes.get(key) {
            Some(AttrValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.attributes.get(key) {
            Some(AttrValue::Int(i)) => Some(*i),
            _ => None,
        }
    }

    /// List value of `key`; missing keys read as an empty list.
    pub fn get_list(&self, key: &str) -> Vec<String> {
        match self.attributes.get(key) {
            Some(AttrValue::List(l)) => l.clone(),
            _ => Vec::new(),
        }
    }

    pub fn attributes(&self) -> &BTreeMap<String, AttrValue> {
        &self.attributes
    }

    /// Copy `keys` from `previous` into `self`, overwriting.
    ///
    /// Used for write-once values the remote side never returns again.
    pub fn preserve(&mut self, previous: &ResourceData, keys: &[&str]) {
        for key in keys {
            match previous.get(key) {
                Some(value) => {
                    self.attributes.insert((*key).to_string(), value.clone());
                }
                None => self.remove(key),
            }
        }
    }

    /// Keys of `self` whose value differs from `current`.
    ///
    /// Only keys present in `self` are compared. A missing key equals an
    /// empty text or list value.
    pub fn changed_keys(&self, current: &ResourceData) -> Vec<String> {
        self.attributes
            .iter()
            .filter(|(key, desired)| match current.get(key) {
                Some(actual) => actual != *desired,
                None => !desired.is_empty(),
            })
            .map(|(key, _)| key.clone())
            .collect()
    }
}

/// Result of applying one planned change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplyResult {
    /// No changes needed
    NoChange,
    /// Resource was created
    Created,
    /// Resource was updated in place
    Modified,
    /// Resource was deleted and created again
    Replaced,
    /// Resource was deleted
    Removed,
    /// Apply failed
    Failed { error: String },
    /// Apply was skipped
    Skipped { reason: String },
}

impl ApplyResult {
    /// Check if the result represents success (no failure)
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    /// Check if the result represents a change
    pub fn is_change(&self) -> bool {
        matches!(
            self,
            Self::Created | Self::Modified | Self::Replaced | Self::Removed
        )
    }
}

/// Summary of execution results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecuteSummary {
    pub created: usize,
    pub modified: usize,
    pub replaced: usize,
    pub removed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub no_change: usize,
}

impl ExecuteSummary {
    /// Total number of actual changes made
    pub fn total_changes(&self) -> usize {
        self.created + self.modified + self.replaced + self.removed
    }

    /// Check if execution was fully successful (no failures)
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Total number of resources processed
    pub fn total(&self) -> usize {
        self.total_changes() + self.skipped + self.failed + self.no_change
    }

    /// Add a result to the summary
    pub fn add_result(&mut self, result: &ApplyResult) {
        match result {
            ApplyResult::NoChange => self.no_change += 1,
            ApplyResult::Created => self.created += 1,
            ApplyResult::Modified => self.modified += 1,
            ApplyResult::Replaced => self.replaced += 1,
            ApplyResult::Removed => self.removed += 1,
            ApplyResult::Failed { .. } => self.failed += 1,
            ApplyResult::Skipped { .. } => self.skipped += 1,
        }
    }
}

/// Options for execution
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Don't make changes, just show what would happen
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_opt_removes_on_none() {
        let mut data = ResourceData::new();
        data.set("comment", "hello");
        data.set_opt::<String>("comment", None);
        assert!(data.get("comment").is_none());
    }

    #[test]
    fn test_set_set_sorts_and_dedups() {
        let mut data = ResourceData::new();
        data.set_set("roles", ["Member", "Admin", "Member"]);
        assert_eq!(data.get_list("roles"), vec!["Admin", "Member"]);
    }

    #[test]
    fn test_changed_keys_compares_declared_keys_only() {
        let mut desired = ResourceData::new();
        desired.set("name", "conn");
        desired.set("comment", "");
        desired.set("port", 22_i64);

        let mut current = ResourceData::new();
        current.set("name", "old_conn");
        current.set("port", 22_i64);
        current.set("principal", "arn:aws:iam::123:role/x");

        assert_eq!(desired.changed_keys(&current), vec!["name"]);
    }

    #[test]
    fn test_preserve_write_once_keys() {
        let mut previous = ResourceData::new();
        previous.set("secret", "s3cr3t");
        let mut refreshed = ResourceData::new();
        refreshed.set("name", "token");
        refreshed.preserve(&previous, &["secret", "password"]);
        assert_eq!(refreshed.get_str("secret"), Some("s3cr3t"));
        assert!(refreshed.get("password").is_none());
    }

    #[test]
    fn test_untagged_values_round_trip() {
        let mut data = ResourceData::new();
        data.set_id("aws/us-east-1:u1");
        data.set("validate", true);
        data.set("port", 5432_i64);
        data.set("roles", vec!["Admin".to_string()]);
        let json = serde_json::to_string(&data).unwrap();
        let back: ResourceData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, data);
        assert_eq!(back.get_bool("validate"), Some(true));
        assert_eq!(back.get_int("port"), Some(5432));
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = ExecuteSummary::default();
        summary.add_result(&ApplyResult::Created);
        summary.add_result(&ApplyResult::Replaced);
        summary.add_result(&ApplyResult::Failed {
            error: "boom".into(),
        });
        assert_eq!(summary.total_changes(), 2);
        assert_eq!(summary.total(), 3);
        assert!(!summary.is_success());
    }
}
