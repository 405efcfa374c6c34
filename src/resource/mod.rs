//! Reconciliation drivers, one per resource kind.
//!
//! Every driver implements [`declarative::Resource`] over [`Providers`]:
//! SQL kinds share [`sql_object::SqlResource`] and differ only in their
//! [`sql_object::SqlKind`]; identity kinds talk to the REST client
//! directly.

pub mod app_password;
pub mod connection;
pub mod custom_type;
pub mod scim_config;
pub mod scim_group;
pub mod scim_membership;
pub mod secret;
pub mod sql_object;
pub mod sso_config;
pub mod sso_default_roles;
pub mod sso_domain;
pub mod sso_group_mapping;
pub mod table_webhook;
pub mod user;

use crate::manifest::ResourceSpec;
use crate::providers::Providers;
use declarative::BoxedResource;
use sql_object::SqlResource;

/// Instantiate the driver for a declared resource.
pub fn build(spec: &ResourceSpec) -> BoxedResource<Providers> {
    match spec.clone() {
        ResourceSpec::ConnectionSshTunnel(s) => Box::new(SqlResource::new(s)),
        ResourceSpec::ConnectionAwsPrivatelink(s) => Box::new(SqlResource::new(s)),
        ResourceSpec::ConnectionAws(s) => Box::new(SqlResource::new(s)),
        ResourceSpec::ConnectionKafka(s) => Box::new(SqlResource::new(s)),
        ResourceSpec::ConnectionPostgres(s) => Box::new(SqlResource::new(s)),
        ResourceSpec::ConnectionMysql(s) => Box::new(SqlResource::new(s)),
        ResourceSpec::ConnectionConfluentSchemaRegistry(s) => Box::new(SqlResource::new(s)),
        ResourceSpec::Secret(s) => Box::new(SqlResource::new(s)),
        ResourceSpec::Type(s) => Box::new(SqlResource::new(s)),
        ResourceSpec::TableWebhook(s) => Box::new(SqlResource::new(s)),
        ResourceSpec::User(s) => Box::new(user::UserResource::new(s)),
        ResourceSpec::AppPassword(s) => Box::new(app_password::AppPasswordResource::new(s)),
        ResourceSpec::ScimGroup(s) => Box::new(scim_group::ScimGroupResource::new(s)),
        ResourceSpec::ScimGroupRoles(s) => Box::new(scim_membership::GroupRolesResource::new(s)),
        ResourceSpec::ScimGroupUsers(s) => Box::new(scim_membership::GroupUsersResource::new(s)),
        ResourceSpec::ScimConfig(s) => Box::new(scim_config::ScimConfigResource::new(s)),
        ResourceSpec::SsoConfig(s) => Box::new(sso_config::SsoConfigResource::new(s)),
        ResourceSpec::SsoDomain(s) => Box::new(sso_domain::SsoDomainResource::new(s)),
        ResourceSpec::SsoGroupMapping(s) => {
            Box::new(sso_group_mapping::SsoGroupMappingResource::new(s))
        }
        ResourceSpec::SsoDefaultRoles(s) => {
            Box::new(sso_default_roles::SsoDefaultRolesResource::new(s))
        }
    }
}

/// Clear the id when a read finds nothing; propagate anything else.
pub(crate) fn vanished<T>(
    result: frontegg::Result<T>,
    data: &mut declarative::ResourceData,
    what: &str,
) -> anyhow::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => {
            log::info!("{what} no longer exists, clearing id");
            data.clear_id();
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Role membership changes by name, resolved to ids.
///
/// Names are diffed first so that only the roles that actually move are
/// looked up; an empty side resolves without a request.
pub(crate) fn role_id_diff(
    client: &frontegg::Client,
    current: &[String],
    desired: &[String],
) -> anyhow::Result<declarative::SetDiff> {
    let names = declarative::set_diff(current.iter().cloned(), desired.iter().cloned());
    Ok(declarative::SetDiff {
        to_remove: client.role_ids(&names.to_remove)?,
        to_add: client.role_ids(&names.to_add)?,
    })
}
