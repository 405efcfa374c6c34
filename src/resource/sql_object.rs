//! Driver shared by every schema-scoped SQL object.
//!
//! The lifecycle is the same for connections, secrets, types and webhook
//! tables; [`SqlKind`] supplies the parts that differ.

use crate::manifest::SqlObjectSpec;
use crate::providers::Providers;
use anyhow::Result;
use declarative::{Resource, ResourceData, create_with_rollback, extract_id, transform_id};
use mzsql::{DdlBuilder, Executor, MaterializeObject, ObjectParams, ObjectType};
use std::fmt;

/// Keys that move an object between schemas or databases.
pub const LOCATION_KEYS: &[&str] = &["schema_name", "database_name"];

/// Kind-specific behavior of a SQL object.
pub trait SqlKind: fmt::Debug + Clone {
    const RESOURCE_TYPE: &'static str;
    const OBJECT_TYPE: ObjectType;

    /// Keys that force a replace when changed
    fn immutable_keys() -> &'static [&'static str] {
        LOCATION_KEYS
    }

    /// Reject configurations the server would refuse, before any statement.
    fn check(&self) -> mzsql::Result<()> {
        Ok(())
    }

    /// Issue the `CREATE` statement.
    fn create(&self, builder: &DdlBuilder<'_>) -> mzsql::Result<()>;

    /// Kind-specific desired attributes.
    fn desired(&self, data: &mut ResourceData);

    /// Read the object by catalog id, recording kind-specific attributes.
    fn scan(&self, exec: &dyn Executor, id: &str, data: &mut ResourceData)
    -> mzsql::Result<ObjectParams>;

    /// Apply changed kind-specific keys; the builder already addresses the
    /// object by its new name.
    fn alter(&self, _builder: &DdlBuilder<'_>, _changes: &[String]) -> mzsql::Result<()> {
        Ok(())
    }

    /// Changed keys the desired attributes cannot express, such as an
    /// option that was removed from the configuration.
    fn removed_keys(&self, _current: &ResourceData) -> Vec<String> {
        Vec::new()
    }
}

#[derive(Debug, Clone)]
pub struct SqlResource<K> {
    spec: SqlObjectSpec<K>,
}

impl<K: SqlKind> SqlResource<K> {
    pub fn new(spec: SqlObjectSpec<K>) -> Self {
        Self { spec }
    }

    fn object(&self) -> MaterializeObject {
        self.spec.object(K::OBJECT_TYPE)
    }

    /// The object as recorded, which is what exists before an update.
    fn recorded_object(&self, data: &ResourceData) -> MaterializeObject {
        let declared = self.object();
        MaterializeObject::new(
            K::OBJECT_TYPE,
            data.get_str("name").unwrap_or(declared.name.as_str()),
        )
        .with_schema(
            data.get_str("schema_name")
                .unwrap_or(declared.schema_name.as_str()),
        )
        .with_database(
            data.get_str("database_name")
                .unwrap_or(declared.database_name.as_str()),
        )
    }

    /// Ownership and comment, applied after the primary create.
    fn secondary(&self, builder: &DdlBuilder<'_>) -> mzsql::Result<()> {
        if let Some(role) = &self.spec.ownership_role {
            builder.alter_owner(role)?;
        }
        if let Some(comment) = &self.spec.comment {
            builder.comment(Some(comment))?;
        }
        Ok(())
    }
}

/// Record the columns every kind shares.
fn project(params: &ObjectParams, data: &mut ResourceData) {
    data.set_opt("name", params.name.clone());
    data.set_opt("schema_name", params.schema_name.clone());
    data.set_opt("database_name", params.database_name.clone());
    data.set("qualified_sql_name", params.qualified_name());
    data.set_opt("ownership_role", params.owner_name.clone());
    data.set_opt("comment", params.comment.clone());
}

impl<K: SqlKind> Resource<Providers> for SqlResource<K> {
    fn resource_type(&self) -> &'static str {
        K::RESOURCE_TYPE
    }

    fn description(&self) -> String {
        self.object().to_string()
    }

    fn desired(&self) -> ResourceData {
        let object = self.object();
        let mut data = ResourceData::new();
        data.set("name", object.name);
        data.set("schema_name", object.schema_name);
        data.set("database_name", object.database_name);
        data.set_opt("ownership_role", self.spec.ownership_role.clone());
        data.set_opt("comment", self.spec.comment.clone());
        self.spec.config.desired(&mut data);
        data
    }

    fn immutable_keys(&self) -> &'static [&'static str] {
        K::immutable_keys()
    }

    fn create(&self, providers: &Providers, data: &mut ResourceData) -> Result<()> {
        self.spec.config.check()?;
        let builder = DdlBuilder::new(providers.sql()?, self.object());

        create_with_rollback(
            || self.spec.config.create(&builder),
            || self.secondary(&builder),
            || builder.drop(),
        )?;

        let id = builder.read_id()?;
        // Values the catalog never reports survive from the declaration.
        *data = self.desired();
        data.set_id(transform_id(providers.region(), &id));
        self.read(providers, data)
    }

    fn read(&self, providers: &Providers, data: &mut ResourceData) -> Result<()> {
        let Some(id) = data.id().map(|id| extract_id(id).to_string()) else {
            return Ok(());
        };

        match self.spec.config.scan(providers.sql()?, &id, data) {
            Ok(params) => {
                project(&params, data);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                log::info!("{} {id} no longer exists, clearing id", K::RESOURCE_TYPE);
                data.clear_id();
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn update(&self, providers: &Providers, changes: &[String], data: &mut ResourceData) -> Result<()> {
        self.spec.config.check()?;
        let changed = |key: &str| changes.iter().any(|c| c == key);
        let mut builder = DdlBuilder::new(providers.sql()?, self.recorded_object(data));

        if changed("name") {
            builder.rename(&self.spec.name)?;
        }
        if changed("ownership_role")
            && let Some(role) = &self.spec.ownership_role
        {
            builder.alter_owner(role)?;
        }
        if changed("comment") {
            builder.comment(self.spec.comment.as_deref())?;
        }
        self.spec.config.alter(&builder, changes)?;

        let desired = self.desired();
        for key in changes {
            match desired.get(key) {
                Some(value) => data.set(key, value.clone()),
                None => data.remove(key),
            }
        }
        self.read(providers, data)
    }

    fn delete(&self, providers: &Providers, data: &mut ResourceData) -> Result<()> {
        let builder = DdlBuilder::new(providers.sql()?, self.recorded_object(data));
        builder.drop()?;
        data.clear_id();
        Ok(())
    }

    fn changes(&self, current: &ResourceData) -> Vec<String> {
        let mut keys = self.desired().changed_keys(current);
        // A comment dropped from the declaration is cleared remotely.
        if self.spec.comment.is_none()
            && current.get_str("comment").is_some_and(|c| !c.is_empty())
        {
            keys.push("comment".to_string());
        }
        for key in self.spec.config.removed_keys(current) {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }
}
