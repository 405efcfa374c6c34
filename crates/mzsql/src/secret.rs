//! Secrets.

use crate::catalog::{ObjectParams, lookup_id, object_query};
use crate::ddl::CreateStatement;
use crate::error::Result;
use crate::executor::Executor;
use crate::object::{MaterializeObject, ObjectType};
use crate::query::{BaseQuery, fetch_one};
use crate::quote::quote_string;

/// Secret contents. Never read back from the catalog.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretValue(pub String);

impl std::fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretValue(..)")
    }
}

impl CreateStatement for SecretValue {
    fn create_statement(&self, object: &MaterializeObject) -> String {
        format!(
            "CREATE SECRET {} AS {};",
            object.qualified_name(),
            quote_string(&self.0)
        )
    }
}

/// `ALTER SECRET <qn> AS '<value>';`
pub fn alter_value_statement(object: &MaterializeObject, value: &SecretValue) -> String {
    format!(
        "ALTER SECRET {} AS {};",
        object.qualified_name(),
        quote_string(&value.0)
    )
}

fn secret_query() -> BaseQuery {
    object_query("mz_secrets", ObjectType::Secret, &[], &[])
}

pub fn secret_id(exec: &dyn Executor, object: &MaterializeObject) -> Result<String> {
    lookup_id(exec, &secret_query(), "mz_secrets", object)
}

pub fn scan_secret(exec: &dyn Executor, id: &str) -> Result<ObjectParams> {
    let sql = secret_query().query_predicate(&[("mz_secrets.id", id)]);
    ObjectParams::from_row(&fetch_one(exec, &sql, &format!("secret {id}"))?)
}
