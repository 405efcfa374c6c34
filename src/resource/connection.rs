//! Connection kinds.
//!
//! Options are recorded under their lowercase names (`ssl_mode`,
//! `sasl_username`, ...). The catalog does not report option values, so
//! they are carried over from the declaration.

use super::sql_object::SqlKind;
use declarative::{AttrValue, ResourceData};
use mzsql::connection::{
    AwsConfig, AwsPrivatelinkConfig, ConnectionAlter, ConnectionOptions, ConnectionParams,
    KafkaConfig, MySqlConfig, OptionValue, PostgresConfig, SchemaRegistryConfig, SshTunnelConfig,
    scan_connection,
};
use mzsql::{DdlBuilder, Executor, ObjectParams, ObjectType};

fn attr(value: &OptionValue) -> AttrValue {
    match value {
        OptionValue::Text(text) | OptionValue::Raw(text) => AttrValue::Text(text.clone()),
        OptionValue::Int(n) => AttrValue::Int(*n),
        OptionValue::Bool(b) => AttrValue::Bool(*b),
        OptionValue::Value(value) => AttrValue::Text(value.describe()),
        OptionValue::Secret(reference) | OptionValue::Object(reference) => {
            AttrValue::Text(reference.qualified_name())
        }
        OptionValue::TextList(items) => AttrValue::List(items.clone()),
    }
}

/// Record every set option.
fn option_attrs(config: &dyn ConnectionOptions, data: &mut ResourceData) {
    for (option, value) in config.options() {
        if let Some(value) = value {
            data.set(&option.key(), attr(&value));
        }
    }
}

/// Unset options that are still recorded with a value.
fn removed_options(config: &dyn ConnectionOptions, current: &ResourceData) -> Vec<String> {
    config
        .options()
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(option, _)| option.key())
        .filter(|key| current.get(key).is_some_and(|v| !v.is_empty()))
        .collect()
}

/// One `ALTER CONNECTION` for every changed option.
fn alter_options(
    config: &dyn ConnectionOptions,
    builder: &DdlBuilder<'_>,
    changes: &[String],
) -> mzsql::Result<()> {
    let alter = ConnectionAlter::for_changed_keys(config, changes);
    match alter.alter_statement(builder.object()) {
        Some(sql) => builder.exec(&sql),
        None => Ok(()),
    }
}

fn scan(exec: &dyn Executor, id: &str) -> mzsql::Result<ConnectionParams> {
    scan_connection(exec, id)
}

impl SqlKind for SshTunnelConfig {
    const RESOURCE_TYPE: &'static str = "connection_ssh_tunnel";
    const OBJECT_TYPE: ObjectType = ObjectType::Connection;

    fn create(&self, builder: &DdlBuilder<'_>) -> mzsql::Result<()> {
        builder.create(self)
    }

    fn desired(&self, data: &mut ResourceData) {
        option_attrs(self, data);
    }

    fn scan(&self, exec: &dyn Executor, id: &str, data: &mut ResourceData) -> mzsql::Result<ObjectParams> {
        let params = scan(exec, id)?;
        data.set_opt("public_key_1", params.public_key_1);
        data.set_opt("public_key_2", params.public_key_2);
        Ok(params.object)
    }

    fn alter(&self, builder: &DdlBuilder<'_>, changes: &[String]) -> mzsql::Result<()> {
        alter_options(self, builder, changes)
    }
}

impl SqlKind for AwsPrivatelinkConfig {
    const RESOURCE_TYPE: &'static str = "connection_aws_privatelink";
    const OBJECT_TYPE: ObjectType = ObjectType::Connection;

    fn create(&self, builder: &DdlBuilder<'_>) -> mzsql::Result<()> {
        builder.create(self)
    }

    fn desired(&self, data: &mut ResourceData) {
        option_attrs(self, data);
    }

    fn scan(&self, exec: &dyn Executor, id: &str, data: &mut ResourceData) -> mzsql::Result<ObjectParams> {
        let params = scan(exec, id)?;
        data.set_opt("principal", params.principal);
        Ok(params.object)
    }

    fn alter(&self, builder: &DdlBuilder<'_>, changes: &[String]) -> mzsql::Result<()> {
        alter_options(self, builder, changes)
    }
}

impl SqlKind for AwsConfig {
    const RESOURCE_TYPE: &'static str = "connection_aws";
    const OBJECT_TYPE: ObjectType = ObjectType::Connection;

    fn create(&self, builder: &DdlBuilder<'_>) -> mzsql::Result<()> {
        builder.create(self)
    }

    fn desired(&self, data: &mut ResourceData) {
        option_attrs(self, data);
    }

    fn scan(&self, exec: &dyn Executor, id: &str, _data: &mut ResourceData) -> mzsql::Result<ObjectParams> {
        Ok(scan(exec, id)?.object)
    }

    fn alter(&self, builder: &DdlBuilder<'_>, changes: &[String]) -> mzsql::Result<()> {
        alter_options(self, builder, changes)
    }

    fn removed_keys(&self, current: &ResourceData) -> Vec<String> {
        removed_options(self, current)
    }
}

impl SqlKind for KafkaConfig {
    const RESOURCE_TYPE: &'static str = "connection_kafka";
    const OBJECT_TYPE: ObjectType = ObjectType::Connection;

    fn check(&self) -> mzsql::Result<()> {
        KafkaConfig::check(self)
    }

    fn create(&self, builder: &DdlBuilder<'_>) -> mzsql::Result<()> {
        builder.create(self)
    }

    fn desired(&self, data: &mut ResourceData) {
        option_attrs(self, data);
    }

    fn scan(&self, exec: &dyn Executor, id: &str, _data: &mut ResourceData) -> mzsql::Result<ObjectParams> {
        Ok(scan(exec, id)?.object)
    }

    fn alter(&self, builder: &DdlBuilder<'_>, changes: &[String]) -> mzsql::Result<()> {
        alter_options(self, builder, changes)
    }

    fn removed_keys(&self, current: &ResourceData) -> Vec<String> {
        removed_options(self, current)
    }
}

impl SqlKind for PostgresConfig {
    const RESOURCE_TYPE: &'static str = "connection_postgres";
    const OBJECT_TYPE: ObjectType = ObjectType::Connection;

    fn create(&self, builder: &DdlBuilder<'_>) -> mzsql::Result<()> {
        builder.create(self)
    }

    fn desired(&self, data: &mut ResourceData) {
        option_attrs(self, data);
    }

    fn scan(&self, exec: &dyn Executor, id: &str, _data: &mut ResourceData) -> mzsql::Result<ObjectParams> {
        Ok(scan(exec, id)?.object)
    }

    fn alter(&self, builder: &DdlBuilder<'_>, changes: &[String]) -> mzsql::Result<()> {
        alter_options(self, builder, changes)
    }

    fn removed_keys(&self, current: &ResourceData) -> Vec<String> {
        removed_options(self, current)
    }
}

impl SqlKind for MySqlConfig {
    const RESOURCE_TYPE: &'static str = "connection_mysql";
    const OBJECT_TYPE: ObjectType = ObjectType::Connection;

    fn create(&self, builder: &DdlBuilder<'_>) -> mzsql::Result<()> {
        builder.create(self)
    }

    fn desired(&self, data: &mut ResourceData) {
        option_attrs(self, data);
    }

    fn scan(&self, exec: &dyn Executor, id: &str, _data: &mut ResourceData) -> mzsql::Result<ObjectParams> {
        Ok(scan(exec, id)?.object)
    }

    fn alter(&self, builder: &DdlBuilder<'_>, changes: &[String]) -> mzsql::Result<()> {
        alter_options(self, builder, changes)
    }

    fn removed_keys(&self, current: &ResourceData) -> Vec<String> {
        removed_options(self, current)
    }
}

impl SqlKind for SchemaRegistryConfig {
    const RESOURCE_TYPE: &'static str = "connection_confluent_schema_registry";
    const OBJECT_TYPE: ObjectType = ObjectType::Connection;

    fn create(&self, builder: &DdlBuilder<'_>) -> mzsql::Result<()> {
        builder.create(self)
    }

    fn desired(&self, data: &mut ResourceData) {
        option_attrs(self, data);
    }

    fn scan(&self, exec: &dyn Executor, id: &str, _data: &mut ResourceData) -> mzsql::Result<ObjectParams> {
        Ok(scan(exec, id)?.object)
    }

    fn alter(&self, builder: &DdlBuilder<'_>, changes: &[String]) -> mzsql::Result<()> {
        alter_options(self, builder, changes)
    }

    fn removed_keys(&self, current: &ResourceData) -> Vec<String> {
        removed_options(self, current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::SqlObjectSpec;
    use crate::resource::sql_object::SqlResource;
    use crate::resource::testing;
    use declarative::Resource;
    use mzsql::connection::{KafkaBroker, TlsAndPath};
    use mzsql::mock::MockExecutor;
    use mzsql::{IdentifierSchema, Row, ValueSecret};

    fn located<T>(name: &str, config: T) -> SqlObjectSpec<T> {
        SqlObjectSpec {
            name: name.into(),
            schema_name: Some("schema".into()),
            database_name: Some("database".into()),
            ownership_role: None,
            comment: None,
            config,
        }
    }

    fn tunnel() -> IdentifierSchema {
        IdentifierSchema::new("tunnel")
            .with_schema("schema")
            .with_database("database")
    }

    fn connection_row(name: &str) -> Row {
        Row::new()
            .with("id", "u1")
            .with("name", name)
            .with("schema_name", "schema")
            .with("database_name", "database")
            .with("owner_name", "mz_system")
            .with("comment", Option::<&str>::None)
            .with("connection_type", "postgres")
            .with("public_key_1", Option::<&str>::None)
            .with("public_key_2", Option::<&str>::None)
            .with("principal", Option::<&str>::None)
    }

    fn postgres() -> PostgresConfig {
        PostgresConfig {
            host: "db.internal".into(),
            port: None,
            user: ValueSecret::text("replicator"),
            password: Some(IdentifierSchema::new("pg_password")),
            database: "app".into(),
            ssl_mode: None,
            tls: TlsAndPath {
                ssh_tunnel: Some(tunnel()),
                ..TlsAndPath::default()
            },
            validate: true,
        }
    }

    #[test]
    fn test_create_through_ssh_tunnel() {
        let exec = MockExecutor::new().on_query("mz_connections", vec![connection_row("conn")]);
        let providers = testing::sql(&exec);
        let resource = SqlResource::new(located("conn", postgres()));

        let mut data = ResourceData::new();
        resource.create(&providers, &mut data).unwrap();

        let statements = exec.statements();
        assert_eq!(statements.len(), 1);
        assert!(statements[0].starts_with(r#"CREATE CONNECTION "database"."schema"."conn" TO POSTGRES ("#));
        assert!(statements[0].contains(r#"SSH TUNNEL "database"."schema"."tunnel""#));

        let queries = exec.queries();
        assert_eq!(queries.len(), 2);
        assert!(queries[0].contains("WHERE mz_connections.name = 'conn'\nAND mz_schemas.name = 'schema'\nAND mz_databases.name = 'database';"));
        assert!(queries[1].contains("WHERE mz_connections.id = 'u1'"));

        assert_eq!(data.id(), Some("aws/us-east-1:u1"));
        assert_eq!(data.get_str("ssh_tunnel"), Some(r#""database"."schema"."tunnel""#));
        assert_eq!(data.get_str("password"), Some(r#""materialize"."public"."pg_password""#));
        assert_eq!(data.get_str("user"), Some("replicator"));
    }

    #[test]
    fn test_ssh_tunnel_records_public_keys() {
        let row = connection_row("tunnel")
            .with("public_key_1", "ssh-ed25519 AAA1")
            .with("public_key_2", "ssh-ed25519 AAA2");
        let exec = MockExecutor::new().on_query("mz_connections", vec![row]);
        let providers = testing::sql(&exec);
        let resource = SqlResource::new(located(
            "tunnel",
            SshTunnelConfig {
                host: "bastion".into(),
                user: "mz".into(),
                port: 2222,
                validate: true,
            },
        ));

        let mut data = ResourceData::new();
        resource.create(&providers, &mut data).unwrap();
        assert_eq!(data.get_str("public_key_1"), Some("ssh-ed25519 AAA1"));
        assert_eq!(data.get_int("port"), Some(2222));
    }

    #[test]
    fn test_changed_and_removed_options_alter_in_one_statement() {
        let exec = MockExecutor::new().on_query("mz_connections", vec![connection_row("conn")]);
        let providers = testing::sql(&exec);

        let mut recorded = ResourceData::new();
        recorded.set_id("u1");
        recorded.set("name", "conn");
        recorded.set("schema_name", "schema");
        recorded.set("database_name", "database");
        recorded.set("host", "old.internal");
        recorded.set("user", "replicator");
        recorded.set("password", r#""materialize"."public"."pg_password""#);
        recorded.set("database", "app");
        recorded.set("ssh_tunnel", r#""database"."schema"."tunnel""#);
        recorded.set("ssl_mode", "require");

        let resource = SqlResource::new(located("conn", postgres()));
        let changes = resource.changes(&recorded);
        assert_eq!(changes, vec!["host", "ssl_mode"]);

        resource.update(&providers, &changes, &mut recorded).unwrap();
        assert_eq!(
            exec.statements(),
            vec![r#"ALTER CONNECTION "database"."schema"."conn" SET (HOST = 'db.internal'), DROP (SSL MODE);"#]
        );
        assert_eq!(recorded.get_str("host"), Some("db.internal"));
        assert_eq!(recorded.get("ssl_mode"), None);
    }

    #[test]
    fn test_kafka_check_runs_before_any_statement() {
        let exec = MockExecutor::new();
        let providers = testing::sql(&exec);
        let resource = SqlResource::new(located("kafka", KafkaConfig::default()));

        let mut data = ResourceData::new();
        assert!(resource.create(&providers, &mut data).is_err());
        assert!(exec.calls().is_empty());

        let with_broker = KafkaConfig {
            brokers: vec![KafkaBroker::new("b-1:9092")],
            ..KafkaConfig::default()
        };
        let mut desired = ResourceData::new();
        with_broker.desired(&mut desired);
        assert!(desired.get("brokers").is_some());
    }
}
