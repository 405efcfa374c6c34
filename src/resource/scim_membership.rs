//! Role and user membership of a SCIM group.
//!
//! Both resources are keyed by the group id. Create adds the declared
//! members, update removes the extra ones before adding the missing ones,
//! and delete removes the declared members. A failed removal on delete is
//! logged and the resource is forgotten anyway.

use super::{role_id_diff, vanished};
use crate::manifest::{ScimGroupRolesSpec, ScimGroupUsersSpec};
use crate::providers::Providers;
use anyhow::Result;
use declarative::{Resource, ResourceData, set_diff};
use frontegg::Client;
use frontegg::scim::ScimGroup;

fn read_group(
    providers: &Providers,
    data: &mut ResourceData,
    record: impl FnOnce(ScimGroup, &mut ResourceData),
) -> Result<()> {
    let Some(id) = data.id().map(str::to_string) else {
        return Ok(());
    };
    let client = providers.identity()?;
    let Some(group) = vanished(client.get_group(&id), data, &format!("scim group {id}"))? else {
        return Ok(());
    };
    data.set("group_id", group.id.as_str());
    record(group, data);
    Ok(())
}

// ============================================================================
// Roles
// ============================================================================

#[derive(Debug, Clone)]
pub struct GroupRolesResource {
    spec: ScimGroupRolesSpec,
}

impl GroupRolesResource {
    pub fn new(spec: ScimGroupRolesSpec) -> Self {
        Self { spec }
    }

    fn remove_declared(&self, client: &Client) -> Result<()> {
        let role_ids = client.role_ids(&self.spec.roles)?;
        if !role_ids.is_empty() {
            client.remove_group_roles(&self.spec.group_id, &role_ids)?;
        }
        Ok(())
    }
}

impl Resource<Providers> for GroupRolesResource {
    fn resource_type(&self) -> &'static str {
        "scim_group_roles"
    }

    fn description(&self) -> String {
        format!("roles of scim group {}", self.spec.group_id)
    }

    fn desired(&self) -> ResourceData {
        let mut data = ResourceData::new();
        data.set("group_id", self.spec.group_id.as_str());
        data.set_set("roles", self.spec.roles.iter().cloned());
        data
    }

    fn immutable_keys(&self) -> &'static [&'static str] {
        &["group_id"]
    }

    fn create(&self, providers: &Providers, data: &mut ResourceData) -> Result<()> {
        let client = providers.identity()?;
        let role_ids = client.role_ids(&self.spec.roles)?;
        if !role_ids.is_empty() {
            client.add_group_roles(&self.spec.group_id, &role_ids)?;
        }
        *data = self.desired();
        data.set_id(self.spec.group_id.as_str());
        self.read(providers, data)
    }

    fn read(&self, providers: &Providers, data: &mut ResourceData) -> Result<()> {
        read_group(providers, data, |group, data| {
            data.set_set(
                "roles",
                group.roles.iter().map(|r| r.label(&self.spec.roles)),
            );
        })
    }

    fn update(&self, providers: &Providers, _changes: &[String], data: &mut ResourceData) -> Result<()> {
        let client = providers.identity()?;
        let diff = role_id_diff(client, &data.get_list("roles"), &self.spec.roles)?;
        if !diff.to_remove.is_empty() {
            client.remove_group_roles(&self.spec.group_id, &diff.to_remove)?;
        }
        if !diff.to_add.is_empty() {
            client.add_group_roles(&self.spec.group_id, &diff.to_add)?;
        }
        self.read(providers, data)
    }

    fn delete(&self, providers: &Providers, data: &mut ResourceData) -> Result<()> {
        let result = providers
            .identity()
            .and_then(|client| self.remove_declared(client));
        if let Err(e) = result {
            log::warn!("removing roles from scim group {} failed: {e:#}", self.spec.group_id);
        }
        data.clear_id();
        Ok(())
    }
}

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Clone)]
pub struct GroupUsersResource {
    spec: ScimGroupUsersSpec,
}

impl GroupUsersResource {
    pub fn new(spec: ScimGroupUsersSpec) -> Self {
        Self { spec }
    }
}

impl Resource<Providers> for GroupUsersResource {
    fn resource_type(&self) -> &'static str {
        "scim_group_users"
    }

    fn description(&self) -> String {
        format!("users of scim group {}", self.spec.group_id)
    }

    fn desired(&self) -> ResourceData {
        let mut data = ResourceData::new();
        data.set("group_id", self.spec.group_id.as_str());
        data.set_set("users", self.spec.users.iter().cloned());
        data
    }

    fn immutable_keys(&self) -> &'static [&'static str] {
        &["group_id"]
    }

    fn create(&self, providers: &Providers, data: &mut ResourceData) -> Result<()> {
        if !self.spec.users.is_empty() {
            providers
                .identity()?
                .add_group_users(&self.spec.group_id, &self.spec.users)?;
        }
        *data = self.desired();
        data.set_id(self.spec.group_id.as_str());
        self.read(providers, data)
    }

    fn read(&self, providers: &Providers, data: &mut ResourceData) -> Result<()> {
        read_group(providers, data, |group, data| {
            data.set_set("users", group.user_ids());
        })
    }

    fn update(&self, providers: &Providers, _changes: &[String], data: &mut ResourceData) -> Result<()> {
        let client = providers.identity()?;
        let diff = set_diff(data.get_list("users"), self.spec.users.iter().cloned());
        if !diff.to_remove.is_empty() {
            client.remove_group_users(&self.spec.group_id, &diff.to_remove)?;
        }
        if !diff.to_add.is_empty() {
            client.add_group_users(&self.spec.group_id, &diff.to_add)?;
        }
        self.read(providers, data)
    }

    fn delete(&self, providers: &Providers, data: &mut ResourceData) -> Result<()> {
        if !self.spec.users.is_empty() {
            let result = providers.identity().and_then(|client| {
                Ok(client.remove_group_users(&self.spec.group_id, &self.spec.users)?)
            });
            if let Err(e) = result {
                log::warn!("removing users from scim group {} failed: {e:#}", self.spec.group_id);
            }
        }
        data.clear_id();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::testing;
    use frontegg::mock::MockTransport;
    use frontegg::transport::Method;
    use serde_json::json;

    const GROUP: &str = "/frontegg/identity/resources/groups/v1/g1";

    fn roles(names: &[&str]) -> GroupRolesResource {
        GroupRolesResource::new(ScimGroupRolesSpec {
            group_id: "g1".into(),
            roles: names.iter().map(|n| n.to_string()).collect(),
        })
    }

    fn group(roles: &[(&str, &str)], users: &[&str]) -> serde_json::Value {
        let roles: Vec<_> = roles
            .iter()
            .map(|(id, name)| json!({"id": id, "name": name}))
            .collect();
        let users: Vec<_> = users.iter().map(|id| json!({"id": id})).collect();
        json!({"id": "g1", "name": "platform", "roles": roles, "users": users})
    }

    #[test]
    fn test_delete_removes_declared_roles_in_one_call() {
        let transport = testing::with_roles(MockTransport::new());
        let providers = testing::identity(&transport);
        let mut data = ResourceData::new();
        data.set_id("g1");

        roles(&["Admin", "Member"]).delete(&providers, &mut data).unwrap();

        assert_eq!(
            testing::calls_without_roles(&transport),
            vec![format!("DELETE {GROUP}/roles")]
        );
        let removal = transport.requests().pop().unwrap();
        assert_eq!(removal.body, Some(json!({"roleIds": ["r-admin", "r-member"]})));
        assert!(!data.has_id());
    }

    #[test]
    fn test_delete_forgets_even_when_removal_fails() {
        let transport = testing::with_roles(MockTransport::new()).fail(
            Method::Delete,
            &format!("{GROUP}/roles"),
            frontegg::Error::Http {
                status: 500,
                message: "boom".into(),
            },
        );
        let providers = testing::identity(&transport);
        let mut data = ResourceData::new();
        data.set_id("g1");

        assert!(roles(&["Admin"]).delete(&providers, &mut data).is_ok());
        assert!(!data.has_id());
    }

    #[test]
    fn test_role_update_removes_then_adds() {
        let transport = testing::with_roles(MockTransport::new()).respond(
            Method::Get,
            GROUP,
            group(&[("r-admin", "Admin"), ("r-member", "Member")], &[]),
        );
        let providers = testing::identity(&transport);
        let resource = roles(&["Admin", "Member"]);

        let mut data = ResourceData::new();
        data.set_id("g1");
        data.set("group_id", "g1");
        data.set_set("roles", ["Member", "Viewer"]);

        let changes = resource.changes(&data);
        resource.update(&providers, &changes, &mut data).unwrap();

        assert_eq!(
            testing::calls_without_roles(&transport),
            vec![
                format!("DELETE {GROUP}/roles"),
                format!("POST {GROUP}/roles"),
                format!("GET {GROUP}?_groupsRelations=rolesAndUsers"),
            ]
        );
        assert_eq!(data.get_list("roles"), vec!["Admin", "Member"]);
    }

    #[test]
    fn test_role_declared_by_key_converges() {
        let transport = testing::with_roles(MockTransport::new()).respond(
            Method::Get,
            GROUP,
            json!({
                "id": "g1",
                "name": "platform",
                "roles": [{"id": "r-admin", "key": "MaterializePlatformAdmin", "name": "Admin"}],
            }),
        );
        let providers = testing::identity(&transport);
        let resource = roles(&["MaterializePlatformAdmin"]);

        let mut data = ResourceData::new();
        resource.create(&providers, &mut data).unwrap();
        assert_eq!(data.get_list("roles"), vec!["MaterializePlatformAdmin"]);
        assert!(resource.changes(&data).is_empty());

        resource.update(&providers, &[], &mut data).unwrap();
        let writes: Vec<String> = testing::calls_without_roles(&transport)
            .into_iter()
            .filter(|c| !c.starts_with("GET"))
            .collect();
        assert_eq!(writes, vec![format!("POST {GROUP}/roles")]);
    }

    #[test]
    fn test_users_in_sync_issue_no_membership_calls() {
        let transport =
            MockTransport::new().respond(Method::Get, GROUP, group(&[], &["u1", "u2"]));
        let providers = testing::identity(&transport);
        let resource = GroupUsersResource::new(ScimGroupUsersSpec {
            group_id: "g1".into(),
            users: vec!["u2".into(), "u1".into()],
        });

        let mut data = ResourceData::new();
        data.set_id("g1");
        resource.read(&providers, &mut data).unwrap();
        assert_eq!(data.get_list("users"), vec!["u1", "u2"]);
        assert!(resource.changes(&data).is_empty());

        resource.update(&providers, &[], &mut data).unwrap();
        assert!(transport.calls().iter().all(|c| c.starts_with("GET")));
    }

    #[test]
    fn test_create_adds_users() {
        let transport = MockTransport::new().respond(Method::Get, GROUP, group(&[], &["u1"]));
        let providers = testing::identity(&transport);

        let mut data = ResourceData::new();
        GroupUsersResource::new(ScimGroupUsersSpec {
            group_id: "g1".into(),
            users: vec!["u1".into()],
        })
        .create(&providers, &mut data)
        .unwrap();

        let add = &transport.requests()[0];
        assert_eq!(add.method, Method::Post);
        assert_eq!(add.body, Some(json!({"userIds": ["u1"]})));
        assert_eq!(data.id(), Some("g1"));
    }
}
