//! Connections: shared option model, `ALTER CONNECTION`, catalog reads.
//!
//! Each connection target lives in its own module with a configuration
//! struct that renders `CREATE CONNECTION ... TO <TARGET> (...)` and lists
//! its alterable options in grammar order.

pub mod aws;
pub mod aws_privatelink;
pub mod kafka;
pub mod mysql;
pub mod postgres;
pub mod schema_registry;
pub mod ssh_tunnel;

use crate::catalog::{ObjectParams, lookup_id, object_query};
use crate::error::Result;
use crate::executor::Executor;
use crate::object::{IdentifierSchema, MaterializeObject, ObjectType, ValueSecret};
use crate::query::{BaseQuery, fetch_one};
use crate::quote::{bool_literal, quote_string};
use std::fmt;

pub use aws::AwsConfig;
pub use aws_privatelink::AwsPrivatelinkConfig;
pub use kafka::{KafkaBroker, KafkaConfig, SaslMechanism, SecurityProtocol};
pub use mysql::{MySqlConfig, MySqlSslMode};
pub use self::postgres::{PostgresConfig, PostgresSslMode, TlsAndPath};
pub use schema_registry::SchemaRegistryConfig;
pub use ssh_tunnel::SshTunnelConfig;

/// Option names accepted by `CREATE/ALTER CONNECTION`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionOption {
    AccessKeyId,
    AssumeRoleArn,
    AssumeRoleSessionName,
    AvailabilityZones,
    AwsConnection,
    AwsPrivatelink,
    Brokers,
    Database,
    Endpoint,
    Host,
    Password,
    Port,
    ProgressTopic,
    ProgressTopicReplicationFactor,
    Region,
    SaslMechanisms,
    SaslPassword,
    SaslUsername,
    SecretAccessKey,
    SecurityProtocol,
    ServiceName,
    SessionToken,
    SshTunnel,
    SslCertificate,
    SslCertificateAuthority,
    SslKey,
    SslMode,
    Url,
    User,
    Username,
}

impl ConnectionOption {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::AccessKeyId => "ACCESS KEY ID",
            Self::AssumeRoleArn => "ASSUME ROLE ARN",
            Self::AssumeRoleSessionName => "ASSUME ROLE SESSION NAME",
            Self::AvailabilityZones => "AVAILABILITY ZONES",
            Self::AwsConnection => "AWS CONNECTION",
            Self::AwsPrivatelink => "AWS PRIVATELINK",
            Self::Brokers => "BROKERS",
            Self::Database => "DATABASE",
            Self::Endpoint => "ENDPOINT",
            Self::Host => "HOST",
            Self::Password => "PASSWORD",
            Self::Port => "PORT",
            Self::ProgressTopic => "PROGRESS TOPIC",
            Self::ProgressTopicReplicationFactor => "PROGRESS TOPIC REPLICATION FACTOR",
            Self::Region => "REGION",
            Self::SaslMechanisms => "SASL MECHANISMS",
            Self::SaslPassword => "SASL PASSWORD",
            Self::SaslUsername => "SASL USERNAME",
            Self::SecretAccessKey => "SECRET ACCESS KEY",
            Self::SecurityProtocol => "SECURITY PROTOCOL",
            Self::ServiceName => "SERVICE NAME",
            Self::SessionToken => "SESSION TOKEN",
            Self::SshTunnel => "SSH TUNNEL",
            Self::SslCertificate => "SSL CERTIFICATE",
            Self::SslCertificateAuthority => "SSL CERTIFICATE AUTHORITY",
            Self::SslKey => "SSL KEY",
            Self::SslMode => "SSL MODE",
            Self::Url => "URL",
            Self::User => "USER",
            Self::Username => "USERNAME",
        }
    }

    /// Attribute key this option is recorded under, e.g. `ssl_certificate`.
    pub fn key(&self) -> String {
        self.as_sql().to_lowercase().replace(' ', "_")
    }
}

impl fmt::Display for ConnectionOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A value assigned to a connection option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// Quoted string literal.
    Text(String),
    Int(i64),
    Bool(bool),
    /// Literal or secret, rendered by [`ValueSecret::to_sql`].
    Value(ValueSecret),
    /// Always read from a secret.
    Secret(IdentifierSchema),
    /// Reference to another object, rendered as its qualified name.
    Object(IdentifierSchema),
    /// Parenthesized list of string literals.
    TextList(Vec<String>),
    /// Pre-rendered SQL fragment.
    Raw(String),
}

impl OptionValue {
    pub fn to_sql(&self) -> String {
        match self {
            Self::Text(text) => quote_string(text),
            Self::Int(n) => n.to_string(),
            Self::Bool(b) => bool_literal(*b).to_string(),
            Self::Value(value) => value.to_sql(),
            Self::Secret(reference) => reference.secret_sql(),
            Self::Object(reference) => reference.qualified_name(),
            Self::TextList(items) => format!(
                "({})",
                items
                    .iter()
                    .map(|i| quote_string(i))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Self::Raw(sql) => sql.clone(),
        }
    }
}

/// Alterable options of a connection, in grammar order.
///
/// `None` marks an option that is currently unset.
pub type OptionList = Vec<(ConnectionOption, Option<OptionValue>)>;

/// Connection configurations expose their options for `ALTER` and state.
pub trait ConnectionOptions {
    fn options(&self) -> OptionList;

    /// Whether the server should validate the connection on create/alter.
    fn validate(&self) -> bool {
        true
    }
}

/// Helper for option lists: push `Some` values, keep `None` as unset.
pub(crate) fn opt<T>(
    list: &mut OptionList,
    option: ConnectionOption,
    value: Option<T>,
    f: impl FnOnce(T) -> OptionValue,
) {
    list.push((option, value.map(f)));
}

/// An ordered set of `SET`/`DROP` actions for one `ALTER CONNECTION`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionAlter {
    pub set: Vec<(ConnectionOption, OptionValue)>,
    pub drop: Vec<ConnectionOption>,
    pub validate: bool,
}

impl Default for ConnectionAlter {
    fn default() -> Self {
        Self {
            set: Vec::new(),
            drop: Vec::new(),
            validate: true,
        }
    }
}

impl ConnectionAlter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, option: ConnectionOption, value: OptionValue) -> Self {
        self.set.push((option, value));
        self
    }

    pub fn drop(mut self, option: ConnectionOption) -> Self {
        self.drop.push(option);
        self
    }

    pub fn with_validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Actions for the options whose recorded key is in `changed`.
    ///
    /// Options with a value are set, unset options are dropped.
    pub fn for_changed_keys(config: &dyn ConnectionOptions, changed: &[String]) -> Self {
        let mut alter = Self::new().with_validate(config.validate());
        for (option, value) in config.options() {
            if !changed.iter().any(|key| *key == option.key()) {
                continue;
            }
            alter = match value {
                Some(value) => alter.set(option, value),
                None => alter.drop(option),
            };
        }
        alter
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.drop.is_empty()
    }

    /// Render the statement, or `None` when there is nothing to change.
    pub fn alter_statement(&self, object: &MaterializeObject) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let actions: Vec<String> = self
            .set
            .iter()
            .map(|(option, value)| format!("SET ({option} = {})", value.to_sql()))
            .chain(self.drop.iter().map(|option| format!("DROP ({option})")))
            .collect();

        let mut sql = format!(
            "ALTER CONNECTION {} {}",
            object.qualified_name(),
            actions.join(", ")
        );
        if !self.validate {
            sql.push_str(" WITH (VALIDATE = false)");
        }
        sql.push(';');
        Some(sql)
    }
}

/// Append ` WITH (VALIDATE = false)` when validation is disabled.
pub(crate) fn finish_create(mut sql: String, validate: bool) -> String {
    if !validate {
        sql.push_str(" WITH (VALIDATE = false)");
    }
    sql.push(';');
    sql
}

// =============================================================================
// Catalog
// =============================================================================

/// Remote state of a connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionParams {
    pub object: ObjectParams,
    pub connection_type: Option<String>,
    pub public_key_1: Option<String>,
    pub public_key_2: Option<String>,
    pub principal: Option<String>,
}

fn connection_query() -> BaseQuery {
    object_query(
        "mz_connections",
        ObjectType::Connection,
        &[
            "mz_connections.type AS connection_type",
            "mz_ssh_tunnel_connections.public_key_1",
            "mz_ssh_tunnel_connections.public_key_2",
            "mz_aws_privatelink_connections.principal",
        ],
        &[
            "LEFT JOIN mz_ssh_tunnel_connections\n\tON mz_connections.id = mz_ssh_tunnel_connections.id",
            "LEFT JOIN mz_aws_privatelink_connections\n\tON mz_connections.id = mz_aws_privatelink_connections.id",
        ],
    )
}

pub fn connection_id(exec: &dyn Executor, object: &MaterializeObject) -> Result<String> {
    lookup_id(exec, &connection_query(), "mz_connections", object)
}

pub fn scan_connection(exec: &dyn Executor, id: &str) -> Result<ConnectionParams> {
    let sql = connection_query().query_predicate(&[("mz_connections.id", id)]);
    let row = fetch_one(exec, &sql, &format!("connection {id}"))?;
    Ok(ConnectionParams {
        object: ObjectParams::from_row(&row)?,
        connection_type: row.text("connection_type")?,
        public_key_1: row.text("public_key_1")?,
        public_key_2: row.text("public_key_2")?,
        principal: row.text("principal")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::Row;
    use crate::mock::MockExecutor;

    fn object() -> MaterializeObject {
        MaterializeObject::new(ObjectType::Connection, "conn")
            .with_schema("schema")
            .with_database("database")
    }

    #[test]
    fn test_option_keys() {
        assert_eq!(ConnectionOption::SslCertificateAuthority.key(), "ssl_certificate_authority");
        assert_eq!(ConnectionOption::AccessKeyId.key(), "access_key_id");
        assert_eq!(ConnectionOption::Host.key(), "host");
    }

    #[test]
    fn test_option_values() {
        assert_eq!(OptionValue::Text("h".into()).to_sql(), "'h'");
        assert_eq!(OptionValue::Int(22).to_sql(), "22");
        assert_eq!(OptionValue::Bool(false).to_sql(), "FALSE");
        assert_eq!(
            OptionValue::TextList(vec!["a".into(), "b".into()]).to_sql(),
            "('a', 'b')"
        );
        assert_eq!(
            OptionValue::Object(IdentifierSchema::new("t")).to_sql(),
            r#""materialize"."public"."t""#
        );
        assert_eq!(
            OptionValue::Secret(IdentifierSchema::new("pw")).to_sql(),
            r#"SECRET "materialize"."public"."pw""#
        );
    }

    #[test]
    fn test_alter_statement_order() {
        let alter = ConnectionAlter::new()
            .set(ConnectionOption::Port, OptionValue::Int(5433))
            .set(ConnectionOption::Host, OptionValue::Text("db".into()))
            .drop(ConnectionOption::SslKey);
        assert_eq!(
            alter.alter_statement(&object()).unwrap(),
            r#"ALTER CONNECTION "database"."schema"."conn" SET (PORT = 5433), SET (HOST = 'db'), DROP (SSL KEY);"#
        );
    }

    #[test]
    fn test_alter_statement_without_validation() {
        let alter = ConnectionAlter::new()
            .set(ConnectionOption::Host, OptionValue::Text("db".into()))
            .with_validate(false);
        assert_eq!(
            alter.alter_statement(&object()).unwrap(),
            r#"ALTER CONNECTION "database"."schema"."conn" SET (HOST = 'db') WITH (VALIDATE = false);"#
        );
    }

    #[test]
    fn test_alter_statement_empty() {
        assert!(ConnectionAlter::new().alter_statement(&object()).is_none());
    }

    #[test]
    fn test_for_changed_keys() {
        let config = SshTunnelConfig {
            host: "bastion".into(),
            user: "mz".into(),
            port: 2222,
            validate: true,
        };
        let alter = ConnectionAlter::for_changed_keys(&config, &["port".to_string()]);
        assert_eq!(alter.set, vec![(ConnectionOption::Port, OptionValue::Int(2222))]);
        assert!(alter.drop.is_empty());

        let pg = PostgresConfig {
            host: "pg".into(),
            database: "db".into(),
            user: ValueSecret::text("u"),
            ..Default::default()
        };
        let alter = ConnectionAlter::for_changed_keys(&pg, &["ssl_key".to_string(), "host".to_string()]);
        assert_eq!(alter.set, vec![(ConnectionOption::Host, OptionValue::Text("pg".into()))]);
        assert_eq!(alter.drop, vec![ConnectionOption::SslKey]);
    }

    #[test]
    fn test_scan_connection() {
        let mock = MockExecutor::new().on_query(
            "mz_connections.id = 'u1'",
            vec![
                Row::new()
                    .with("id", "u1")
                    .with("name", "conn")
                    .with("schema_name", "schema")
                    .with("database_name", "database")
                    .with("owner_name", "mz_system")
                    .with("comment", Option::<&str>::None)
                    .with("connection_type", "ssh-tunnel")
                    .with("public_key_1", "ssh-ed25519 AAA1")
                    .with("public_key_2", "ssh-ed25519 AAA2")
                    .with("principal", Option::<&str>::None),
            ],
        );

        let params = scan_connection(&mock, "u1").unwrap();
        assert_eq!(params.object.name.as_deref(), Some("conn"));
        assert_eq!(params.connection_type.as_deref(), Some("ssh-tunnel"));
        assert_eq!(params.public_key_2.as_deref(), Some("ssh-ed25519 AAA2"));
        assert_eq!(params.principal, None);

        let err = scan_connection(&mock, "u2").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_connection_id_query() {
        let mock = MockExecutor::new().on_query("mz_connections", vec![Row::new().with("id", "u1")]);
        assert_eq!(connection_id(&mock, &object()).unwrap(), "u1");
        let sql = &mock.queries()[0];
        assert!(sql.contains(
            "WHERE mz_connections.name = 'conn'\nAND mz_schemas.name = 'schema'\nAND mz_databases.name = 'database';"
        ));
    }
}
