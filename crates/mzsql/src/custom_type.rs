//! Custom types: list, map and row.

use crate::catalog::{ObjectParams, lookup_id, object_query};
use crate::ddl::CreateStatement;
use crate::error::{Error, Result};
use crate::executor::Executor;
use crate::object::{MaterializeObject, ObjectType};
use crate::query::{BaseQuery, fetch_one};
use crate::quote::quote_identifier;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListProperties {
    pub element_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapProperties {
    pub key_type: String,
    pub value_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowField {
    pub field_name: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

/// Exactly one of the property blocks must be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeConfig {
    #[serde(default)]
    pub list_properties: Option<ListProperties>,
    #[serde(default)]
    pub map_properties: Option<MapProperties>,
    #[serde(default)]
    pub row_properties: Option<Vec<RowField>>,
}

impl TypeConfig {
    pub fn check(&self) -> Result<()> {
        let blocks = [
            self.list_properties.is_some(),
            self.map_properties.is_some(),
            self.row_properties.is_some(),
        ];
        match blocks.iter().filter(|set| **set).count() {
            1 => Ok(()),
            _ => Err(Error::Validation(
                "type needs exactly one of list_properties, map_properties or row_properties"
                    .to_string(),
            )),
        }
    }

    /// Catalog category the created type will report.
    pub fn category(&self) -> &'static str {
        if self.list_properties.is_some() {
            "list"
        } else if self.map_properties.is_some() {
            "map"
        } else {
            "row"
        }
    }
}

impl CreateStatement for TypeConfig {
    fn create_statement(&self, object: &MaterializeObject) -> String {
        let body = if let Some(list) = &self.list_properties {
            format!("LIST (ELEMENT TYPE = {})", list.element_type)
        } else if let Some(map) = &self.map_properties {
            format!(
                "MAP (KEY TYPE = {}, VALUE TYPE = {})",
                map.key_type, map.value_type
            )
        } else {
            let fields: Vec<String> = self
                .row_properties
                .iter()
                .flatten()
                .map(|f| format!("{} {}", quote_identifier(&f.field_name), f.field_type))
                .collect();
            format!("({})", fields.join(", "))
        };
        format!("CREATE TYPE {} AS {body};", object.qualified_name())
    }
}

/// Remote state of a type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeParams {
    pub object: ObjectParams,
    pub category: Option<String>,
}

fn type_query() -> BaseQuery {
    object_query("mz_types", ObjectType::Type, &["mz_types.category"], &[])
}

pub fn type_id(exec: &dyn Executor, object: &MaterializeObject) -> Result<String> {
    lookup_id(exec, &type_query(), "mz_types", object)
}

pub fn scan_type(exec: &dyn Executor, id: &str) -> Result<TypeParams> {
    let sql = type_query().query_predicate(&[("mz_types.id", id)]);
    let row = fetch_one(exec, &sql, &format!("type {id}"))?;
    Ok(TypeParams {
        object: ObjectParams::from_row(&row)?,
        category: row.text("category")?,
    })
}
