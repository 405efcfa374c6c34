//! Desired resources, declared in a TOML manifest.
//!
//! Each `[resources.<label>]` table names its kind with `type`; the other
//! keys are the kind's configuration:
//!
//! ```toml
//! [resources.tunnel]
//! type = "connection_ssh_tunnel"
//! name = "tunnel"
//! host = "bastion.example.com"
//! user = "materialize"
//!
//! [resources.platform_team]
//! type = "scim_group"
//! name = "platform"
//! ```

use anyhow::{Context, Result};
use frontegg::sso::SsoType;
use mzsql::connection::{
    AwsConfig, AwsPrivatelinkConfig, KafkaConfig, MySqlConfig, PostgresConfig,
    SchemaRegistryConfig, SshTunnelConfig,
};
use mzsql::custom_type::TypeConfig;
use mzsql::webhook::TableWebhookConfig;
use mzsql::{MaterializeObject, ObjectType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceSpec>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid manifest: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// One declared resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResourceSpec {
    ConnectionSshTunnel(SqlObjectSpec<SshTunnelConfig>),
    ConnectionAwsPrivatelink(SqlObjectSpec<AwsPrivatelinkConfig>),
    ConnectionAws(SqlObjectSpec<AwsConfig>),
    ConnectionKafka(SqlObjectSpec<KafkaConfig>),
    ConnectionPostgres(SqlObjectSpec<PostgresConfig>),
    ConnectionMysql(SqlObjectSpec<MySqlConfig>),
    ConnectionConfluentSchemaRegistry(SqlObjectSpec<SchemaRegistryConfig>),
    Secret(SqlObjectSpec<SecretSpec>),
    Type(SqlObjectSpec<TypeConfig>),
    TableWebhook(SqlObjectSpec<TableWebhookConfig>),
    User(UserSpec),
    AppPassword(AppPasswordSpec),
    ScimGroup(ScimGroupSpec),
    ScimGroupRoles(ScimGroupRolesSpec),
    ScimGroupUsers(ScimGroupUsersSpec),
    ScimConfig(ScimConfigSpec),
    SsoConfig(SsoConfigSpec),
    SsoDomain(SsoDomainSpec),
    SsoGroupMapping(SsoGroupMappingSpec),
    SsoDefaultRoles(SsoDefaultRolesSpec),
}

impl ResourceSpec {
    /// SQL kinds record region-prefixed ids; identity kinds record bare ids.
    pub fn is_sql(&self) -> bool {
        matches!(
            self,
            Self::ConnectionSshTunnel(_)
                | Self::ConnectionAwsPrivatelink(_)
                | Self::ConnectionAws(_)
                | Self::ConnectionKafka(_)
                | Self::ConnectionPostgres(_)
                | Self::ConnectionMysql(_)
                | Self::ConnectionConfluentSchemaRegistry(_)
                | Self::Secret(_)
                | Self::Type(_)
                | Self::TableWebhook(_)
        )
    }
}

// ============================================================================
// SQL objects
// ============================================================================

/// Fields shared by every schema-scoped object, plus the kind's config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlObjectSpec<T> {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ownership_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(flatten)]
    pub config: T,
}

impl<T> SqlObjectSpec<T> {
    /// Descriptor for the declared name.
    pub fn object(&self, object_type: ObjectType) -> MaterializeObject {
        let mut object = MaterializeObject::new(object_type, self.name.clone());
        if let Some(schema) = &self.schema_name {
            object = object.with_schema(schema.clone());
        }
        if let Some(database) = &self.database_name {
            object = object.with_database(database.clone());
        }
        object
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretSpec {
    pub value: String,
}

impl std::fmt::Debug for SecretSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretSpec(..)")
    }
}

// ============================================================================
// Identity
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSpec {
    pub email: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppPasswordType {
    #[default]
    Personal,
    Service,
}

impl AppPasswordType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Service => "service",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppPasswordSpec {
    pub name: String,
    #[serde(default)]
    pub password_type: AppPasswordType,
    /// Service user the token acts as; service passwords only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Role names; service passwords only
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScimGroupSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScimGroupRolesSpec {
    pub group_id: String,
    /// Role names
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScimGroupUsersSpec {
    pub group_id: String,
    /// User ids
    pub users: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScimConfigSpec {
    pub source: String,
    pub connection_name: String,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SsoConfigSpec {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub sign_request: bool,
    pub sso_endpoint: String,
    pub public_certificate: String,
    #[serde(default)]
    pub sso_type: SsoType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oidc_client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oidc_secret: Option<String>,
}

impl std::fmt::Debug for SsoConfigSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SsoConfigSpec")
            .field("enabled", &self.enabled)
            .field("sso_endpoint", &self.sso_endpoint)
            .field("sso_type", &self.sso_type)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SsoDomainSpec {
    pub sso_config_id: String,
    pub domain: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SsoGroupMappingSpec {
    pub sso_config_id: String,
    pub group: String,
    /// Role names
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SsoDefaultRolesSpec {
    pub sso_config_id: String,
    /// Role names
    pub roles: Vec<String>,
}
