//! Resource trait for declarative reconciliation
//!
//! A Resource is the CRUD driver for one declared object. It owns the
//! desired configuration; the remote state lives in a [`ResourceData`]
//! record that the driver reads and writes.

use crate::types::ResourceData;
use anyhow::Result;
use std::fmt;

/// Core trait for declarative resources
///
/// `C` is the client the driver talks through (a SQL executor, a REST
/// client, or a bundle of both).
///
/// Drivers follow one state machine:
///
/// - `create` issues the remote create, stores the remote id with
///   [`ResourceData::set_id`] and finishes with a read
/// - `read` refreshes the record from the remote side; an object that no
///   longer exists clears the id instead of failing
/// - `update` receives the changed keys and applies only those
/// - `delete` removes the remote object and clears the id
pub trait Resource<C: ?Sized>: fmt::Debug {
    /// Resource type category, e.g. "connection_kafka" or "scim_group"
    fn resource_type(&self) -> &'static str;

    /// Human-readable description of the object
    fn description(&self) -> String;

    /// Desired attributes, as they will read back after a successful apply
    fn desired(&self) -> ResourceData;

    /// Attributes that cannot change in place.
    ///
    /// A change to any of these plans a replace (delete, then create).
    fn immutable_keys(&self) -> &'static [&'static str] {
        &[]
    }

    fn create(&self, client: &C, data: &mut ResourceData) -> Result<()>;

    fn read(&self, client: &C, data: &mut ResourceData) -> Result<()>;

    fn update(&self, client: &C, changes: &[String], data: &mut ResourceData) -> Result<()>;

    fn delete(&self, client: &C, data: &mut ResourceData) -> Result<()>;

    /// Adopt an existing remote object by id.
    fn import(&self, client: &C, id: &str, data: &mut ResourceData) -> Result<()> {
        data.set_id(id);
        self.read(client, data)
    }

    /// Keys whose desired value differs from `current`.
    fn changes(&self, current: &ResourceData) -> Vec<String> {
        self.desired().changed_keys(current)
    }
}

/// A boxed resource for type-erased storage
pub type BoxedResource<C> = Box<dyn Resource<C>>;
