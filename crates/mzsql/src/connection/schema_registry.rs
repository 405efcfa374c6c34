//! `CREATE CONNECTION ... TO CONFLUENT SCHEMA REGISTRY`

use super::postgres::TlsAndPath;
use super::{ConnectionOption, ConnectionOptions, OptionList, OptionValue, finish_create, opt};
use crate::ddl::CreateStatement;
use crate::object::{IdentifierSchema, MaterializeObject, ValueSecret};
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaRegistryConfig {
    pub url: String,
    #[serde(default)]
    pub username: Option<ValueSecret>,
    #[serde(default)]
    pub password: Option<IdentifierSchema>,
    #[serde(flatten)]
    pub tls: TlsAndPath,
    #[serde(default = "default_true")]
    pub validate: bool,
}

impl CreateStatement for SchemaRegistryConfig {
    fn create_statement(&self, object: &MaterializeObject) -> String {
        let clauses: Vec<String> = self
            .options()
            .into_iter()
            .filter_map(|(option, value)| {
                let value = value?.to_sql();
                Some(match option {
                    ConnectionOption::Url
                    | ConnectionOption::SshTunnel
                    | ConnectionOption::AwsPrivatelink => format!("{option} {value}"),
                    _ => format!("{option} = {value}"),
                })
            })
            .collect();
        let sql = format!(
            "CREATE CONNECTION {} TO CONFLUENT SCHEMA REGISTRY ({})",
            object.qualified_name(),
            clauses.join(", ")
        );
        finish_create(sql, self.validate)
    }
}

impl ConnectionOptions for SchemaRegistryConfig {
    fn options(&self) -> OptionList {
        let mut list = OptionList::new();
        list.push((ConnectionOption::Url, Some(OptionValue::Text(self.url.clone()))));
        opt(&mut list, ConnectionOption::Username, self.username.clone(), OptionValue::Value);
        opt(&mut list, ConnectionOption::Password, self.password.clone(), OptionValue::Secret);
        self.tls.push_tls(&mut list);
        self.tls.push_path(&mut list);
        list
    }

    fn validate(&self) -> bool {
        self.validate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectType;

    #[test]
    fn test_create_schema_registry() {
        let object = MaterializeObject::new(ObjectType::Connection, "csr_conn")
            .with_schema("schema")
            .with_database("database");
        let config = SchemaRegistryConfig {
            url: "http://localhost:8081".into(),
            username: Some(ValueSecret::text("user")),
            password: Some(IdentifierSchema::new("password").with_schema("schema").with_database("database")),
            tls: TlsAndPath {
                ssl_key: Some(IdentifierSchema::new("key")),
                ..Default::default()
            },
            validate: true,
        };
        assert_eq!(
            config.create_statement(&object),
            r#"CREATE CONNECTION "database"."schema"."csr_conn" TO CONFLUENT SCHEMA REGISTRY (URL 'http://localhost:8081', USERNAME = 'user', PASSWORD = SECRET "database"."schema"."password", SSL KEY = SECRET "materialize"."public"."key");"#
        );
    }
}
