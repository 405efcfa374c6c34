//! Object descriptors and name references.

use crate::error::{Error, Result};
use crate::quote::{qualified_name, quote_string};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Schema used when a name is given without one.
pub const DEFAULT_SCHEMA: &str = "public";

/// Database used when a name is given without one.
pub const DEFAULT_DATABASE: &str = "materialize";

/// Kind of a schema-scoped catalog object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectType {
    Connection,
    Secret,
    Type,
    Table,
}

impl ObjectType {
    /// SQL keyword used in DDL for this kind.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Connection => "CONNECTION",
            Self::Secret => "SECRET",
            Self::Type => "TYPE",
            Self::Table => "TABLE",
        }
    }

    /// Value of `object_type` in `mz_internal.mz_comments`.
    pub fn comment_type(&self) -> &'static str {
        match self {
            Self::Connection => "connection",
            Self::Secret => "secret",
            Self::Type => "type",
            Self::Table => "table",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Identifies one remote object by kind and three-part name.
///
/// Lives only for the duration of a single reconciliation call; the
/// qualified name is recomputed whenever it is needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializeObject {
    pub object_type: ObjectType,
    pub name: String,
    pub schema_name: String,
    pub database_name: String,
}

impl MaterializeObject {
    /// Create a descriptor in the default schema and database.
    pub fn new(object_type: ObjectType, name: impl Into<String>) -> Self {
        Self {
            object_type,
            name: name.into(),
            schema_name: DEFAULT_SCHEMA.to_string(),
            database_name: DEFAULT_DATABASE.to_string(),
        }
    }

    /// Override the schema. Empty values keep the default.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        let schema = schema.into();
        if !schema.is_empty() {
            self.schema_name = schema;
        }
        self
    }

    /// Override the database. Empty values keep the default.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        let database = database.into();
        if !database.is_empty() {
            self.database_name = database;
        }
        self
    }

    /// `"database"."schema"."name"`
    pub fn qualified_name(&self) -> String {
        qualified_name(&[&self.database_name, &self.schema_name, &self.name])
    }

    /// Same database and schema under a different name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Reject descriptors that cannot be rendered into a reference.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::Validation(format!(
                "{} name must not be empty",
                self.object_type.comment_type()
            )));
        }
        Ok(())
    }
}

impl fmt::Display for MaterializeObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.object_type, self.qualified_name())
    }
}

/// Reference to another named object, such as a secret or an SSH tunnel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierSchema {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_name: Option<String>,
}

impl IdentifierSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema_name: None,
            database_name: None,
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema_name = Some(schema.into());
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database_name = Some(database.into());
        self
    }

    pub fn schema(&self) -> &str {
        self.schema_name.as_deref().unwrap_or(DEFAULT_SCHEMA)
    }

    pub fn database(&self) -> &str {
        self.database_name.as_deref().unwrap_or(DEFAULT_DATABASE)
    }

    pub fn qualified_name(&self) -> String {
        qualified_name(&[self.database(), self.schema(), &self.name])
    }

    /// `SECRET "database"."schema"."name"`
    pub fn secret_sql(&self) -> String {
        format!("SECRET {}", self.qualified_name())
    }
}

/// A value that is either inline text or read from a secret.
///
/// Exactly one form is populated; [`ValueSecret::to_sql`] is the only
/// place that decides how each form renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSecret {
    Text(String),
    Secret(IdentifierSchema),
}

impl ValueSecret {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn secret(reference: IdentifierSchema) -> Self {
        Self::Secret(reference)
    }

    /// `'literal'` or `SECRET "db"."schema"."name"`.
    pub fn to_sql(&self) -> String {
        match self {
            Self::Text(text) => quote_string(text),
            Self::Secret(reference) => reference.secret_sql(),
        }
    }

    /// Plain representation kept in recorded state.
    pub fn describe(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Secret(reference) => reference.secret_sql(),
        }
    }
}
