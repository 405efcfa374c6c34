//! Custom list, map and row types.
//!
//! Only the name, owner and comment can be altered; every property forces
//! a replace.

use super::sql_object::SqlKind;
use declarative::ResourceData;
use mzsql::custom_type::{TypeConfig, scan_type};
use mzsql::{DdlBuilder, Executor, ObjectParams, ObjectType};

const IMMUTABLE: &[&str] = &[
    "schema_name",
    "database_name",
    "category",
    "element_type",
    "key_type",
    "value_type",
    "row_fields",
];

impl SqlKind for TypeConfig {
    const RESOURCE_TYPE: &'static str = "type";
    const OBJECT_TYPE: ObjectType = ObjectType::Type;

    fn immutable_keys() -> &'static [&'static str] {
        IMMUTABLE
    }

    fn check(&self) -> mzsql::Result<()> {
        TypeConfig::check(self)
    }

    fn create(&self, builder: &DdlBuilder<'_>) -> mzsql::Result<()> {
        builder.create(self)
    }

    fn desired(&self, data: &mut ResourceData) {
        data.set("category", self.category());
        if let Some(list) = &self.list_properties {
            data.set("element_type", list.element_type.as_str());
        }
        if let Some(map) = &self.map_properties {
            data.set("key_type", map.key_type.as_str());
            data.set("value_type", map.value_type.as_str());
        }
        if let Some(fields) = &self.row_properties {
            let fields: Vec<String> = fields
                .iter()
                .map(|f| format!("{} {}", f.field_name, f.field_type))
                .collect();
            data.set("row_fields", fields);
        }
    }

    fn scan(&self, exec: &dyn Executor, id: &str, data: &mut ResourceData) -> mzsql::Result<ObjectParams> {
        let params = scan_type(exec, id)?;
        data.set_opt("category", params.category);
        Ok(params.object)
    }
}
