//! Secrets. The value is write-through: the catalog never returns it.

use super::sql_object::SqlKind;
use crate::manifest::SecretSpec;
use declarative::ResourceData;
use mzsql::secret::{SecretValue, alter_value_statement, scan_secret};
use mzsql::{DdlBuilder, Executor, ObjectParams, ObjectType};

impl SecretSpec {
    fn secret_value(&self) -> SecretValue {
        SecretValue(self.value.clone())
    }
}

impl SqlKind for SecretSpec {
    const RESOURCE_TYPE: &'static str = "secret";
    const OBJECT_TYPE: ObjectType = ObjectType::Secret;

    fn create(&self, builder: &DdlBuilder<'_>) -> mzsql::Result<()> {
        builder.create(&self.secret_value())
    }

    fn desired(&self, data: &mut ResourceData) {
        data.set("value", self.value.as_str());
    }

    fn scan(&self, exec: &dyn Executor, id: &str, _data: &mut ResourceData) -> mzsql::Result<ObjectParams> {
        scan_secret(exec, id)
    }

    fn alter(&self, builder: &DdlBuilder<'_>, changes: &[String]) -> mzsql::Result<()> {
        if changes.iter().any(|key| key == "value") {
            builder.exec(&alter_value_statement(builder.object(), &self.secret_value()))?;
        }
        Ok(())
    }
}
