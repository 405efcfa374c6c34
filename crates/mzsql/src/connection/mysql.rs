//! `CREATE CONNECTION ... TO MYSQL`

use super::postgres::{TlsAndPath, spaced_clauses};
use super::{ConnectionOption, ConnectionOptions, OptionList, OptionValue, finish_create, opt};
use crate::ddl::CreateStatement;
use crate::object::{IdentifierSchema, MaterializeObject, ValueSecret};
use serde::{Deserialize, Serialize};
use std::fmt;

fn default_true() -> bool {
    true
}

/// Accepted values for MySQL `SSL MODE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MySqlSslMode {
    Disabled,
    Required,
    VerifyCa,
    VerifyIdentity,
}

impl fmt::Display for MySqlSslMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Disabled => "disabled",
            Self::Required => "required",
            Self::VerifyCa => "verify-ca",
            Self::VerifyIdentity => "verify-identity",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MySqlConfig {
    pub host: String,
    #[serde(default)]
    pub port: Option<i64>,
    pub user: ValueSecret,
    #[serde(default)]
    pub password: Option<IdentifierSchema>,
    #[serde(default)]
    pub ssl_mode: Option<MySqlSslMode>,
    #[serde(flatten)]
    pub tls: TlsAndPath,
    #[serde(default = "default_true")]
    pub validate: bool,
}

impl CreateStatement for MySqlConfig {
    fn create_statement(&self, object: &MaterializeObject) -> String {
        let sql = format!(
            "CREATE CONNECTION {} TO MYSQL ({})",
            object.qualified_name(),
            spaced_clauses(self.options())
        );
        finish_create(sql, self.validate)
    }
}

impl ConnectionOptions for MySqlConfig {
    fn options(&self) -> OptionList {
        let mut list = OptionList::new();
        list.push((ConnectionOption::Host, Some(OptionValue::Text(self.host.clone()))));
        opt(&mut list, ConnectionOption::Port, self.port, OptionValue::Int);
        list.push((ConnectionOption::User, Some(OptionValue::Value(self.user.clone()))));
        opt(&mut list, ConnectionOption::Password, self.password.clone(), OptionValue::Secret);
        opt(&mut list, ConnectionOption::SslMode, self.ssl_mode, |m| {
            OptionValue::Text(m.to_string())
        });
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
    fn test_create_mysql() {
        let object = MaterializeObject::new(ObjectType::Connection, "mysql_conn")
            .with_schema("schema")
            .with_database("database");
        let config = MySqlConfig {
            host: "mysql_host".into(),
            port: Some(3306),
            user: ValueSecret::text("user"),
            password: Some(IdentifierSchema::new("password")),
            ssl_mode: Some(MySqlSslMode::Required),
            tls: TlsAndPath {
                aws_privatelink: Some(IdentifierSchema::new("pl")),
                ..Default::default()
            },
            validate: true,
        };
        assert_eq!(
            config.create_statement(&object),
            r#"CREATE CONNECTION "database"."schema"."mysql_conn" TO MYSQL (HOST 'mysql_host', PORT 3306, USER 'user', PASSWORD SECRET "materialize"."public"."password", SSL MODE 'required', AWS PRIVATELINK "materialize"."public"."pl");"#
        );
    }

    #[test]
    fn test_ssl_mode_names() {
        assert_eq!(MySqlSslMode::VerifyIdentity.to_string(), "verify-identity");
        let mode: MySqlSslMode = serde_json::from_str("\"verify-ca\"").unwrap();
        assert_eq!(mode, MySqlSslMode::VerifyCa);
    }
}
