//! Catalog reads shared by every object kind.

use crate::connection;
use crate::custom_type;
use crate::error::Result;
use crate::executor::{Executor, Row};
use crate::object::{MaterializeObject, ObjectType};
use crate::query::{BaseQuery, fetch_one};
use crate::quote::qualified_name;
use crate::secret;
use crate::webhook;

/// Columns every per-kind params query selects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectParams {
    pub id: String,
    pub name: Option<String>,
    pub schema_name: Option<String>,
    pub database_name: Option<String>,
    pub owner_name: Option<String>,
    pub comment: Option<String>,
}

impl ObjectParams {
    pub fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.required_text("id")?,
            name: row.text("name")?,
            schema_name: row.text("schema_name")?,
            database_name: row.text("database_name")?,
            owner_name: row.text("owner_name")?,
            comment: row.text("comment")?,
        })
    }

    /// Recomputed from the row on every read.
    pub fn qualified_name(&self) -> String {
        qualified_name(&[
            self.database_name.as_deref().unwrap_or_default(),
            self.schema_name.as_deref().unwrap_or_default(),
            self.name.as_deref().unwrap_or_default(),
        ])
    }
}

/// The common select list plus joins for a catalog relation.
///
/// `relation` is the catalog table (`mz_secrets`, `mz_types`, ...) and
/// `extra` carries kind-specific columns and joins.
pub(crate) fn object_query(
    relation: &str,
    object_type: ObjectType,
    extra_columns: &[&str],
    extra_joins: &[&str],
) -> BaseQuery {
    let mut columns = vec![
        format!("{relation}.id"),
        format!("{relation}.name"),
        "mz_schemas.name AS schema_name".to_string(),
        "mz_databases.name AS database_name".to_string(),
        "mz_roles.name AS owner_name".to_string(),
        "comments.comment AS comment".to_string(),
    ];
    columns.extend(extra_columns.iter().map(|c| (*c).to_string()));

    let mut sql = format!(
        "SELECT\n\t{}\nFROM {relation}\n\
         JOIN mz_schemas\n\tON {relation}.schema_id = mz_schemas.id\n\
         JOIN mz_databases\n\tON mz_schemas.database_id = mz_databases.id\n\
         JOIN mz_roles\n\tON {relation}.owner_id = mz_roles.id\n",
        columns.join(",\n\t")
    );
    for join in extra_joins {
        sql.push_str(join);
        sql.push('\n');
    }
    sql.push_str(&format!(
        "LEFT JOIN (\n\
         \tSELECT id, comment\n\
         \tFROM mz_internal.mz_comments\n\
         \tWHERE object_type = '{}' AND object_sub_id IS NULL\n\
         ) comments\n\tON {relation}.id = comments.id",
        object_type.comment_type()
    ));
    BaseQuery::new(sql)
}

/// Id of the object named by `object` in `relation`.
pub(crate) fn lookup_id(
    exec: &dyn Executor,
    query: &BaseQuery,
    relation: &str,
    object: &MaterializeObject,
) -> Result<String> {
    let name_column = format!("{relation}.name");
    let sql = query.query_predicate(&[
        (name_column.as_str(), object.name.as_str()),
        ("mz_schemas.name", object.schema_name.as_str()),
        ("mz_databases.name", object.database_name.as_str()),
    ]);
    fetch_one(exec, &sql, &object.to_string())?.required_text("id")
}

/// Look up a catalog id by kind and qualified name.
pub fn read_id(exec: &dyn Executor, object: &MaterializeObject) -> Result<String> {
    match object.object_type {
        ObjectType::Connection => connection::connection_id(exec, object),
        ObjectType::Secret => secret::secret_id(exec, object),
        ObjectType::Type => custom_type::type_id(exec, object),
        ObjectType::Table => webhook::table_id(exec, object),
    }
}
