//! Execution planner - decides one action per resource label

use crate::diff::DiffSummary;
use crate::resource::Resource;
use crate::types::{ApplyResult, ResourceData};
use std::fmt;

/// What the executor will do for one resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Create,
    Update { changes: Vec<String> },
    Replace { changes: Vec<String> },
    Delete,
    NoChange,
}

impl Action {
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::NoChange)
    }

    /// Plan symbol, as shown in plan output
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Create => "+",
            Self::Update { .. } => "~",
            Self::Replace { .. } => "-/+",
            Self::Delete => "-",
            Self::NoChange => " ",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Update { changes } => write!(f, "update ({})", changes.join(", ")),
            Self::Replace { changes } => write!(f, "replace ({})", changes.join(", ")),
            Self::Delete => write!(f, "delete"),
            Self::NoChange => write!(f, "no change"),
        }
    }
}

/// Classify a declared resource against its recorded state.
///
/// No record, or a record without an id, plans a create. Otherwise the
/// changed keys decide between update and replace.
pub fn plan_action<C: ?Sized>(resource: &dyn Resource<C>, current: Option<&ResourceData>) -> Action {
    let Some(current) = current.filter(|d| d.has_id()) else {
        return Action::Create;
    };

    let changes = resource.changes(current);
    if changes.is_empty() {
        return Action::NoChange;
    }

    let immutable = resource.immutable_keys();
    if changes.iter().any(|key| immutable.contains(&key.as_str())) {
        Action::Replace { changes }
    } else {
        Action::Update { changes }
    }
}

/// One planned change
pub struct PlannedChange<C: ?Sized> {
    pub label: String,
    pub resource: Box<dyn Resource<C>>,
    pub action: Action,
    /// Recorded state before the change; the executor updates it in place.
    pub data: ResourceData,
    /// Filled in by the executor
    pub result: Option<ApplyResult>,
}

impl<C: ?Sized> fmt::Debug for PlannedChange<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlannedChange")
            .field("label", &self.label)
            .field("resource", &self.resource)
            .field("action", &self.action)
            .field("result", &self.result)
            .finish_non_exhaustive()
    }
}

/// An ordered list of planned changes
pub struct Plan<C: ?Sized> {
    pub changes: Vec<PlannedChange<C>>,
}

impl<C: ?Sized> fmt::Debug for Plan<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plan").field("changes", &self.changes).finish()
    }
}

impl<C: ?Sized> Plan<C> {
    /// Create a new empty plan
    pub fn new() -> Self {
        Self {
            changes: Vec::new(),
        }
    }

    /// Add a declared resource, planning its action against `current`
    pub fn add(
        &mut self,
        label: impl Into<String>,
        resource: Box<dyn Resource<C>>,
        current: Option<ResourceData>,
    ) {
        let action = plan_action(resource.as_ref(), current.as_ref());
        self.changes.push(PlannedChange {
            label: label.into(),
            resource,
            action,
            data: current.unwrap_or_default(),
            result: None,
        });
    }

    /// Add a recorded resource that is no longer declared
    pub fn add_delete(
        &mut self,
        label: impl Into<String>,
        resource: Box<dyn Resource<C>>,
        current: ResourceData,
    ) {
        let action = if current.has_id() {
            Action::Delete
        } else {
            Action::NoChange
        };
        self.changes.push(PlannedChange {
            label: label.into(),
            resource,
            action,
            data: current,
            result: None,
        });
    }

    /// Keep only the changes whose label matches
    #[must_use]
    pub fn filter_by_label(self, label: Option<&str>) -> Self {
        match label {
            None => self,
            Some(l) => Self {
                changes: self.changes.into_iter().filter(|c| c.label == l).collect(),
            },
        }
    }

    /// Number of changes that are not no-ops
    pub fn pending(&self) -> usize {
        self.changes.iter().filter(|c| c.action.is_change()).count()
    }

    /// Check if the plan changes nothing
    pub fn is_empty(&self) -> bool {
        self.pending() == 0
    }

    pub fn summary(&self) -> DiffSummary {
        DiffSummary::from_actions(self.changes.iter().map(|c| &c.action))
    }
}

impl<C: ?Sized> Default for Plan<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[derive(Debug)]
    struct Named {
        name: &'static str,
        schema: &'static str,
    }

    impl Resource<()> for Named {
        fn resource_type(&self) -> &'static str {
            "named"
        }
        fn description(&self) -> String {
            self.name.to_string()
        }
        fn desired(&self) -> ResourceData {
            let mut data = ResourceData::new();
            data.set("name", self.name);
            data.set("schema_name", self.schema);
            data
        }
        fn immutable_keys(&self) -> &'static [&'static str] {
            &["schema_name"]
        }
        fn create(&self, _: &(), _: &mut ResourceData) -> Result<()> {
            Ok(())
        }
        fn read(&self, _: &(), _: &mut ResourceData) -> Result<()> {
            Ok(())
        }
        fn update(&self, _: &(), _: &[String], _: &mut ResourceData) -> Result<()> {
            Ok(())
        }
        fn delete(&self, _: &(), _: &mut ResourceData) -> Result<()> {
            Ok(())
        }
    }

    fn recorded(name: &str, schema: &str) -> ResourceData {
        let mut data = ResourceData::new();
        data.set_id("u1");
        data.set("name", name);
        data.set("schema_name", schema);
        data
    }

    #[test]
    fn test_plan_create_without_id() {
        let resource = Named {
            name: "conn",
            schema: "public",
        };
        assert_eq!(plan_action::<()>(&resource, None), Action::Create);
        assert_eq!(
            plan_action::<()>(&resource, Some(&ResourceData::new())),
            Action::Create
        );
    }

    #[test]
    fn test_plan_update_and_replace() {
        let resource = Named {
            name: "conn",
            schema: "public",
        };
        assert_eq!(
            plan_action::<()>(&resource, Some(&recorded("old_conn", "public"))),
            Action::Update {
                changes: vec!["name".into()]
            }
        );
        assert_eq!(
            plan_action::<()>(&resource, Some(&recorded("conn", "other"))),
            Action::Replace {
                changes: vec!["schema_name".into()]
            }
        );
        assert_eq!(
            plan_action::<()>(&resource, Some(&recorded("conn", "public"))),
            Action::NoChange
        );
    }

    #[test]
    fn test_filter_and_pending() {
        let mut plan: Plan<()> = Plan::new();
        plan.add(
            "a",
            Box::new(Named {
                name: "a",
                schema: "public",
            }),
            None,
        );
        plan.add(
            "b",
            Box::new(Named {
                name: "b",
                schema: "public",
            }),
            Some(recorded("b", "public")),
        );
        plan.add_delete(
            "c",
            Box::new(Named {
                name: "c",
                schema: "public",
            }),
            recorded("c", "public"),
        );
        assert_eq!(plan.pending(), 2);
        let summary = plan.summary();
        assert_eq!(summary.additions, 1);
        assert_eq!(summary.removals, 1);

        let only_b = plan.filter_by_label(Some("b"));
        assert_eq!(only_b.changes.len(), 1);
        assert!(only_b.is_empty());
    }
}
