//! Diff computation: set differences and plan statistics

use crate::planner::Action;
use std::collections::BTreeSet;

/// Membership changes that take `remote` to `desired`.
///
/// Apply `to_remove` before `to_add`; an empty side needs no remote call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetDiff {
    pub to_remove: Vec<String>,
    pub to_add: Vec<String>,
}

impl SetDiff {
    pub fn is_empty(&self) -> bool {
        self.to_remove.is_empty() && self.to_add.is_empty()
    }
}

/// Compute `remote - desired` and `desired - remote`, each sorted.
pub fn set_diff<R, D>(remote: R, desired: D) -> SetDiff
where
    R: IntoIterator,
    R::Item: Into<String>,
    D: IntoIterator,
    D::Item: Into<String>,
{
    let remote: BTreeSet<String> = remote.into_iter().map(Into::into).collect();
    let desired: BTreeSet<String> = desired.into_iter().map(Into::into).collect();
    SetDiff {
        to_remove: remote.difference(&desired).cloned().collect(),
        to_add: desired.difference(&remote).cloned().collect(),
    }
}

/// Diff summary statistics
#[derive(Debug, Clone, Default)]
pub struct DiffSummary {
    /// Number of resources to create
    pub additions: usize,
    /// Number of resources to delete
    pub removals: usize,
    /// Number of resources to update in place
    pub modifications: usize,
    /// Number of resources to delete and create again
    pub replacements: usize,
}

impl DiffSummary {
    /// Create a summary from planned actions
    pub fn from_actions<'a>(actions: impl IntoIterator<Item = &'a Action>) -> Self {
        let mut summary = Self::default();
        for action in actions {
            match action {
                Action::Create => summary.additions += 1,
                Action::Delete => summary.removals += 1,
                Action::Update { .. } => summary.modifications += 1,
                Action::Replace { .. } => summary.replacements += 1,
                Action::NoChange => {}
            }
        }
        summary
    }

    /// Total number of changes
    pub fn total(&self) -> usize {
        self.additions + self.removals + self.modifications + self.replacements
    }

    /// Check if there are any changes
    pub fn has_changes(&self) -> bool {
        self.total() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_diff_roles() {
        let diff = set_diff(["Member", "Viewer"], ["Admin", "Member"]);
        assert_eq!(diff.to_remove, vec!["Viewer"]);
        assert_eq!(diff.to_add, vec!["Admin"]);
    }

    #[test]
    fn test_set_diff_identical_sets_is_empty() {
        let diff = set_diff(vec!["a".to_string(), "b".to_string()], ["b", "a", "a"]);
        assert!(diff.is_empty());
    }

    #[test]
    fn test_set_diff_from_empty_remote() {
        let diff = set_diff(Vec::<String>::new(), ["u2", "u1"]);
        assert!(diff.to_remove.is_empty());
        assert_eq!(diff.to_add, vec!["u1", "u2"]);
    }

    #[test]
    fn test_summary_from_actions() {
        let actions = [
            Action::Create,
            Action::NoChange,
            Action::Replace {
                changes: vec!["schema_name".into()],
            },
        ];
        let summary = DiffSummary::from_actions(&actions);
        assert_eq!(summary.additions, 1);
        assert_eq!(summary.replacements, 1);
        assert_eq!(summary.total(), 2);
        assert!(summary.has_changes());
    }
}
