//! `CREATE CONNECTION ... TO POSTGRES`

use super::{ConnectionOption, ConnectionOptions, OptionList, OptionValue, finish_create, opt};
use crate::ddl::CreateStatement;
use crate::object::{IdentifierSchema, MaterializeObject, ValueSecret};
use serde::{Deserialize, Serialize};
use std::fmt;

fn default_true() -> bool {
    true
}

/// Accepted values for Postgres `SSL MODE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PostgresSslMode {
    Disable,
    Require,
    VerifyCa,
    VerifyFull,
}

impl fmt::Display for PostgresSslMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Disable => "disable",
            Self::Require => "require",
            Self::VerifyCa => "verify-ca",
            Self::VerifyFull => "verify-full",
        })
    }
}

/// Shared TLS and network-path options for Postgres-protocol connections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsAndPath {
    #[serde(default)]
    pub ssl_certificate_authority: Option<ValueSecret>,
    #[serde(default)]
    pub ssl_certificate: Option<ValueSecret>,
    #[serde(default)]
    pub ssl_key: Option<IdentifierSchema>,
    #[serde(default)]
    pub ssh_tunnel: Option<IdentifierSchema>,
    #[serde(default)]
    pub aws_privatelink: Option<IdentifierSchema>,
}

impl TlsAndPath {
    pub(crate) fn push_tls(&self, list: &mut OptionList) {
        opt(
            list,
            ConnectionOption::SslCertificateAuthority,
            self.ssl_certificate_authority.clone(),
            OptionValue::Value,
        );
        opt(list, ConnectionOption::SslCertificate, self.ssl_certificate.clone(), OptionValue::Value);
        opt(list, ConnectionOption::SslKey, self.ssl_key.clone(), OptionValue::Secret);
    }

    pub(crate) fn push_path(&self, list: &mut OptionList) {
        opt(list, ConnectionOption::SshTunnel, self.ssh_tunnel.clone(), OptionValue::Object);
        opt(list, ConnectionOption::AwsPrivatelink, self.aws_privatelink.clone(), OptionValue::Object);
    }
}

/// Render `OPTION value` clauses, the form Postgres-protocol targets use.
pub(crate) fn spaced_clauses(list: OptionList) -> String {
    list.into_iter()
        .filter_map(|(option, value)| value.map(|v| format!("{option} {}", v.to_sql())))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostgresConfig {
    pub host: String,
    #[serde(default)]
    pub port: Option<i64>,
    pub user: ValueSecret,
    #[serde(default)]
    pub password: Option<IdentifierSchema>,
    pub database: String,
    #[serde(default)]
    pub ssl_mode: Option<PostgresSslMode>,
    #[serde(flatten)]
    pub tls: TlsAndPath,
    #[serde(default = "default_true")]
    pub validate: bool,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: None,
            user: ValueSecret::text(""),
            password: None,
            database: String::new(),
            ssl_mode: None,
            tls: TlsAndPath::default(),
            validate: true,
        }
    }
}

impl CreateStatement for PostgresConfig {
    fn create_statement(&self, object: &MaterializeObject) -> String {
        let sql = format!(
            "CREATE CONNECTION {} TO POSTGRES ({})",
            object.qualified_name(),
            spaced_clauses(self.options())
        );
        finish_create(sql, self.validate)
    }
}

impl ConnectionOptions for PostgresConfig {
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
        list.push((
            ConnectionOption::Database,
            Some(OptionValue::Text(self.database.clone())),
        ));
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

    fn object() -> MaterializeObject {
        MaterializeObject::new(ObjectType::Connection, "pg_conn")
            .with_schema("schema")
            .with_database("database")
    }

    #[test]
    fn test_create_postgres() {
        let config = PostgresConfig {
            host: "postgres_host".into(),
            port: Some(5432),
            user: ValueSecret::text("user"),
            password: Some(IdentifierSchema::new("password").with_database("database").with_schema("schema")),
            database: "default".into(),
            ..Default::default()
        };
        assert_eq!(
            config.create_statement(&object()),
            r#"CREATE CONNECTION "database"."schema"."pg_conn" TO POSTGRES (HOST 'postgres_host', PORT 5432, USER 'user', PASSWORD SECRET "database"."schema"."password", DATABASE 'default');"#
        );
    }

    #[test]
    fn test_create_postgres_full() {
        let config = PostgresConfig {
            host: "postgres_host".into(),
            user: ValueSecret::secret(IdentifierSchema::new("user")),
            database: "default".into(),
            ssl_mode: Some(PostgresSslMode::VerifyFull),
            tls: TlsAndPath {
                ssl_certificate_authority: Some(ValueSecret::text("ca")),
                ssl_certificate: Some(ValueSecret::secret(IdentifierSchema::new("cert"))),
                ssl_key: Some(IdentifierSchema::new("key")),
                ssh_tunnel: Some(IdentifierSchema::new("tunnel").with_schema("schema").with_database("database")),
                aws_privatelink: None,
            },
            validate: false,
            ..Default::default()
        };
        assert_eq!(
            config.create_statement(&object()),
            concat!(
                r#"CREATE CONNECTION "database"."schema"."pg_conn" TO POSTGRES ("#,
                r#"HOST 'postgres_host', USER SECRET "materialize"."public"."user", SSL MODE 'verify-full', "#,
                r#"SSL CERTIFICATE AUTHORITY 'ca', SSL CERTIFICATE SECRET "materialize"."public"."cert", "#,
                r#"SSL KEY SECRET "materialize"."public"."key", SSH TUNNEL "database"."schema"."tunnel", "#,
                r#"DATABASE 'default') WITH (VALIDATE = false);"#
            )
        );
    }

    #[test]
    fn test_deserialize_flattened_tls() {
        let config: PostgresConfig = serde_json::from_str(
            r#"{"host": "h", "user": {"text": "u"}, "database": "d", "ssl_mode": "require", "ssh_tunnel": {"name": "t"}}"#,
        )
        .unwrap();
        assert_eq!(config.ssl_mode, Some(PostgresSslMode::Require));
        assert_eq!(config.tls.ssh_tunnel, Some(IdentifierSchema::new("t")));
        assert!(config.validate);
    }
}
