//! # Declarative
//!
//! A framework for declarative resource reconciliation.
//!
//! This crate provides the core abstractions for declaring desired state,
//! reading remote state, and converging the remote system to match.
//!
//! ## Core Concepts
//!
//! - **ResourceData**: the flat attribute record of one resource, plus its
//!   remote id once created
//! - **Resource**: CRUD driver for one declared resource, generic over the
//!   client it talks through
//! - **Plan**: one [`Action`] per resource label (create, update, replace,
//!   delete or no change)
//! - **Executor**: applies a plan in order, recording each outcome
//!
//! ## Example
//!
//! ```
//! use declarative::{
//!     AutoConfirm, ExecuteOptions, NoProgress, Plan, Resource, ResourceData, execute,
//! };
//!
//! #[derive(Debug)]
//! struct Note { text: String }
//!
//! impl Resource<Vec<String>> for Note {
//!     fn resource_type(&self) -> &'static str { "note" }
//!     fn description(&self) -> String { format!("note {:?}", self.text) }
//!     fn desired(&self) -> ResourceData {
//!         let mut data = ResourceData::new();
//!         data.set("text", self.text.as_str());
//!         data
//!     }
//!     fn create(&self, _log: &Vec<String>, data: &mut ResourceData) -> anyhow::Result<()> {
//!         data.set_id("n1");
//!         data.set("text", self.text.as_str());
//!         Ok(())
//!     }
//!     fn read(&self, _log: &Vec<String>, _data: &mut ResourceData) -> anyhow::Result<()> { Ok(()) }
//!     fn update(&self, _log: &Vec<String>, _changes: &[String], data: &mut ResourceData) -> anyhow::Result<()> {
//!         data.set("text", self.text.as_str());
//!         Ok(())
//!     }
//!     fn delete(&self, _log: &Vec<String>, data: &mut ResourceData) -> anyhow::Result<()> {
//!         data.clear_id();
//!         Ok(())
//!     }
//! }
//!
//! let mut plan = Plan::new();
//! plan.add("hello", Box::new(Note { text: "hi".into() }), None);
//! let summary = execute(&mut plan, &Vec::new(), &ExecuteOptions::default(), &mut NoProgress, &mut AutoConfirm)?;
//! assert_eq!(summary.created, 1);
//! assert_eq!(plan.changes[0].data.id(), Some("n1"));
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Provider Traits
//!
//! - [`ProgressCallback`]: receives progress updates
//! - [`ConfirmCallback`]: handles user confirmations
//!
//! This keeps the crate free of hard dependencies on a UI framework.

pub mod context;
pub mod diff;
pub mod executor;
pub mod id;
pub mod lifecycle;
pub mod planner;
pub mod resource;
pub mod types;

// Re-export main types at crate root
pub use context::{AutoConfirm, AutoDecline, ConfirmCallback, NoProgress, ProgressCallback};
pub use diff::{DiffSummary, SetDiff, set_diff};
pub use executor::execute;
pub use id::{extract_id, extract_region, transform_id};
pub use lifecycle::create_with_rollback;
pub use planner::{Action, Plan, PlannedChange, plan_action};
pub use resource::{BoxedResource, Resource};
pub use types::{ApplyResult, AttrValue, ExecuteOptions, ExecuteSummary, ResourceData};
