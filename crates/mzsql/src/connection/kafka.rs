//! `CREATE CONNECTION ... TO KAFKA`
//!
//! Clauses always render in the order the server's grammar lists them:
//! brokers, security protocol, progress topic, SSL, SASL, then the
//! default tunnel/PrivateLink/AWS references.

use super::{ConnectionOption, ConnectionOptions, OptionList, OptionValue, finish_create, opt};
use crate::ddl::CreateStatement;
use crate::error::{Error, Result};
use crate::object::{IdentifierSchema, MaterializeObject, ValueSecret};
use crate::quote::quote_string;
use serde::{Deserialize, Serialize};
use std::fmt;

fn default_true() -> bool {
    true
}

/// Accepted values for `SASL MECHANISMS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaslMechanism {
    #[serde(rename = "PLAIN")]
    Plain,
    #[serde(rename = "SCRAM-SHA-256")]
    ScramSha256,
    #[serde(rename = "SCRAM-SHA-512")]
    ScramSha512,
}

impl SaslMechanism {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "PLAIN",
            Self::ScramSha256 => "SCRAM-SHA-256",
            Self::ScramSha512 => "SCRAM-SHA-512",
        }
    }
}

impl fmt::Display for SaslMechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepted values for `SECURITY PROTOCOL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityProtocol {
    Plaintext,
    Ssl,
    SaslPlaintext,
    SaslSsl,
}

impl SecurityProtocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plaintext => "PLAINTEXT",
            Self::Ssl => "SSL",
            Self::SaslPlaintext => "SASL_PLAINTEXT",
            Self::SaslSsl => "SASL_SSL",
        }
    }
}

impl fmt::Display for SecurityProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One bootstrap broker, optionally reached through a tunnel or PrivateLink.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KafkaBroker {
    pub broker: String,
    #[serde(default)]
    pub target_group_port: Option<i64>,
    #[serde(default)]
    pub availability_zone: Option<String>,
    #[serde(default)]
    pub privatelink_connection: Option<IdentifierSchema>,
    #[serde(default)]
    pub ssh_tunnel: Option<IdentifierSchema>,
}

impl KafkaBroker {
    pub fn new(broker: impl Into<String>) -> Self {
        Self {
            broker: broker.into(),
            ..Default::default()
        }
    }

    /// `'host:port'`, optionally followed by its `USING ...` clause.
    pub fn to_sql(&self) -> String {
        let mut sql = quote_string(&self.broker);
        if let Some(privatelink) = &self.privatelink_connection {
            sql.push_str(&format!(
                " USING AWS PRIVATELINK {}",
                privatelink.qualified_name()
            ));
            let mut options = Vec::new();
            if let Some(port) = self.target_group_port {
                options.push(format!("PORT {port}"));
            }
            if let Some(zone) = &self.availability_zone {
                options.push(format!("AVAILABILITY ZONE {}", quote_string(zone)));
            }
            if !options.is_empty() {
                sql.push_str(&format!(" ({})", options.join(", ")));
            }
        } else if let Some(tunnel) = &self.ssh_tunnel {
            sql.push_str(&format!(" USING SSH TUNNEL {}", tunnel.qualified_name()));
        }
        sql
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KafkaConfig {
    #[serde(default)]
    pub brokers: Vec<KafkaBroker>,
    #[serde(default)]
    pub security_protocol: Option<SecurityProtocol>,
    #[serde(default)]
    pub progress_topic: Option<String>,
    #[serde(default)]
    pub progress_topic_replication_factor: Option<i64>,
    #[serde(default)]
    pub ssl_certificate_authority: Option<ValueSecret>,
    #[serde(default)]
    pub ssl_certificate: Option<ValueSecret>,
    #[serde(default)]
    pub ssl_key: Option<IdentifierSchema>,
    #[serde(default)]
    pub sasl_mechanisms: Option<SaslMechanism>,
    #[serde(default)]
    pub sasl_username: Option<ValueSecret>,
    #[serde(default)]
    pub sasl_password: Option<IdentifierSchema>,
    #[serde(default)]
    pub ssh_tunnel: Option<IdentifierSchema>,
    #[serde(default)]
    pub aws_privatelink: Option<IdentifierSchema>,
    #[serde(default)]
    pub aws_connection: Option<IdentifierSchema>,
    #[serde(default = "default_true")]
    pub validate: bool,
}

impl Default for KafkaConfig {
    fn default() -> Self {
        Self {
            brokers: Vec::new(),
            security_protocol: None,
            progress_topic: None,
            progress_topic_replication_factor: None,
            ssl_certificate_authority: None,
            ssl_certificate: None,
            ssl_key: None,
            sasl_mechanisms: None,
            sasl_username: None,
            sasl_password: None,
            ssh_tunnel: None,
            aws_privatelink: None,
            aws_connection: None,
            validate: true,
        }
    }
}

impl KafkaConfig {
    /// Reject combinations the server would refuse.
    pub fn check(&self) -> Result<()> {
        if self.brokers.is_empty() && self.aws_privatelink.is_none() {
            return Err(Error::Validation(
                "kafka connection needs at least one broker or a default AWS PrivateLink connection"
                    .to_string(),
            ));
        }
        if self.sasl_mechanisms.is_some() != self.sasl_username.is_some() {
            return Err(Error::Validation(
                "sasl_mechanisms and sasl_username must be set together".to_string(),
            ));
        }
        Ok(())
    }

    fn brokers_sql(&self) -> Option<String> {
        if self.brokers.is_empty() {
            return None;
        }
        let brokers: Vec<String> = self.brokers.iter().map(KafkaBroker::to_sql).collect();
        Some(format!("({})", brokers.join(", ")))
    }
}

impl CreateStatement for KafkaConfig {
    fn create_statement(&self, object: &MaterializeObject) -> String {
        let clauses: Vec<String> = self
            .options()
            .into_iter()
            .filter_map(|(option, value)| {
                let value = value?.to_sql();
                Some(match option {
                    ConnectionOption::Brokers
                    | ConnectionOption::SshTunnel
                    | ConnectionOption::AwsPrivatelink => format!("{option} {value}"),
                    _ => format!("{option} = {value}"),
                })
            })
            .collect();
        let sql = format!(
            "CREATE CONNECTION {} TO KAFKA ({})",
            object.qualified_name(),
            clauses.join(", ")
        );
        finish_create(sql, self.validate)
    }
}

impl ConnectionOptions for KafkaConfig {
    fn options(&self) -> OptionList {
        let mut list = OptionList::new();
        opt(&mut list, ConnectionOption::Brokers, self.brokers_sql(), OptionValue::Raw);
        opt(
            &mut list,
            ConnectionOption::SecurityProtocol,
            self.security_protocol,
            |p| OptionValue::Text(p.to_string()),
        );
        opt(&mut list, ConnectionOption::ProgressTopic, self.progress_topic.clone(), OptionValue::Text);
        opt(
            &mut list,
            ConnectionOption::ProgressTopicReplicationFactor,
            self.progress_topic_replication_factor,
            OptionValue::Int,
        );
        opt(
            &mut list,
            ConnectionOption::SslCertificateAuthority,
            self.ssl_certificate_authority.clone(),
            OptionValue::Value,
        );
        opt(&mut list, ConnectionOption::SslCertificate, self.ssl_certificate.clone(), OptionValue::Value);
        opt(&mut list, ConnectionOption::SslKey, self.ssl_key.clone(), OptionValue::Secret);
        opt(
            &mut list,
            ConnectionOption::SaslMechanisms,
            self.sasl_mechanisms,
            |m| OptionValue::Text(m.to_string()),
        );
        opt(&mut list, ConnectionOption::SaslUsername, self.sasl_username.clone(), OptionValue::Value);
        opt(&mut list, ConnectionOption::SaslPassword, self.sasl_password.clone(), OptionValue::Secret);
        opt(&mut list, ConnectionOption::SshTunnel, self.ssh_tunnel.clone(), OptionValue::Object);
        opt(&mut list, ConnectionOption::AwsPrivatelink, self.aws_privatelink.clone(), OptionValue::Object);
        opt(&mut list, ConnectionOption::AwsConnection, self.aws_connection.clone(), OptionValue::Object);
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
        MaterializeObject::new(ObjectType::Connection, "kafka_conn")
            .with_schema("schema")
            .with_database("database")
    }

    #[test]
    fn test_create_kafka_brokers_only() {
        let config = KafkaConfig {
            brokers: vec![KafkaBroker::new("b-1.hostname-1:9096")],
            validate: true,
            ..Default::default()
        };
        assert_eq!(
            config.create_statement(&object()),
            r#"CREATE CONNECTION "database"."schema"."kafka_conn" TO KAFKA (BROKERS ('b-1.hostname-1:9096'));"#
        );
    }

    #[test]
    fn test_create_kafka_clause_order() {
        let config = KafkaConfig {
            aws_privatelink: Some(IdentifierSchema::new("pl")),
            sasl_password: Some(IdentifierSchema::new("password")),
            sasl_username: Some(ValueSecret::text("user")),
            sasl_mechanisms: Some(SaslMechanism::Plain),
            ssl_key: Some(IdentifierSchema::new("key")),
            ssl_certificate_authority: Some(ValueSecret::text("ca")),
            progress_topic: Some("topic".into()),
            security_protocol: Some(SecurityProtocol::SaslSsl),
            brokers: vec![
                KafkaBroker::new("b-1:9092"),
                KafkaBroker {
                    ssh_tunnel: Some(IdentifierSchema::new("tunnel")),
                    ..KafkaBroker::new("b-2:9092")
                },
            ],
            validate: false,
            ..Default::default()
        };
        assert_eq!(
            config.create_statement(&object()),
            concat!(
                r#"CREATE CONNECTION "database"."schema"."kafka_conn" TO KAFKA ("#,
                r#"BROKERS ('b-1:9092', 'b-2:9092' USING SSH TUNNEL "materialize"."public"."tunnel"), "#,
                r#"SECURITY PROTOCOL = 'SASL_SSL', "#,
                r#"PROGRESS TOPIC = 'topic', "#,
                r#"SSL CERTIFICATE AUTHORITY = 'ca', "#,
                r#"SSL KEY = SECRET "materialize"."public"."key", "#,
                r#"SASL MECHANISMS = 'PLAIN', "#,
                r#"SASL USERNAME = 'user', "#,
                r#"SASL PASSWORD = SECRET "materialize"."public"."password", "#,
                r#"AWS PRIVATELINK "materialize"."public"."pl""#,
                r#") WITH (VALIDATE = false);"#
            )
        );
    }

    #[test]
    fn test_broker_privatelink_options() {
        let broker = KafkaBroker {
            privatelink_connection: Some(IdentifierSchema::new("pl").with_schema("s")),
            target_group_port: Some(9001),
            availability_zone: Some("use1-az1".into()),
            ..KafkaBroker::new("b-1:9092")
        };
        assert_eq!(
            broker.to_sql(),
            r#"'b-1:9092' USING AWS PRIVATELINK "materialize"."s"."pl" (PORT 9001, AVAILABILITY ZONE 'use1-az1')"#
        );

        let bare = KafkaBroker {
            privatelink_connection: Some(IdentifierSchema::new("pl")),
            ..KafkaBroker::new("b-1:9092")
        };
        assert_eq!(
            bare.to_sql(),
            r#"'b-1:9092' USING AWS PRIVATELINK "materialize"."public"."pl""#
        );
    }

    #[test]
    fn test_sasl_username_literal_or_secret() {
        let literal = KafkaConfig {
            brokers: vec![KafkaBroker::new("b:9092")],
            sasl_mechanisms: Some(SaslMechanism::ScramSha256),
            sasl_username: Some(ValueSecret::text("value")),
            ..Default::default()
        };
        let sql = literal.create_statement(&object());
        assert!(sql.contains("SASL USERNAME = 'value'"));
        assert!(!sql.contains("SASL USERNAME = SECRET"));

        let secret = KafkaConfig {
            sasl_username: Some(ValueSecret::secret(
                IdentifierSchema::new("name")
                    .with_schema("schema")
                    .with_database("db"),
            )),
            ..literal
        };
        let sql = secret.create_statement(&object());
        assert!(sql.contains(r#"SASL USERNAME = SECRET "db"."schema"."name""#));
        assert!(!sql.contains("SASL USERNAME = 'value'"));
    }

    #[test]
    fn test_check() {
        assert!(KafkaConfig::default().check().is_err());

        let config = KafkaConfig {
            brokers: vec![KafkaBroker::new("b:9092")],
            ..Default::default()
        };
        assert!(config.check().is_ok());

        let config = KafkaConfig {
            sasl_mechanisms: Some(SaslMechanism::Plain),
            ..config
        };
        assert!(matches!(config.check(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_enum_serde() {
        let m: SaslMechanism = serde_json::from_str("\"SCRAM-SHA-512\"").unwrap();
        assert_eq!(m, SaslMechanism::ScramSha512);
        let p: SecurityProtocol = serde_json::from_str("\"SASL_PLAINTEXT\"").unwrap();
        assert_eq!(p, SecurityProtocol::SaslPlaintext);
        assert!(serde_json::from_str::<SaslMechanism>("\"GSSAPI\"").is_err());
    }

    #[test]
    fn test_default_validates_like_deserialized() {
        let built = KafkaConfig {
            brokers: vec![KafkaBroker::new("b-1:9092")],
            ..Default::default()
        };
        let parsed: KafkaConfig =
            serde_json::from_str(r#"{"brokers": [{"broker": "b-1:9092"}]}"#).unwrap();
        assert!(built.validate);
        assert_eq!(built, parsed);
        assert!(!built.create_statement(&object()).contains("VALIDATE = false"));
    }
}
