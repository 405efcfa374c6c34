//! Organization users.

use super::{role_id_diff, vanished};
use crate::manifest::UserSpec;
use crate::providers::Providers;
use anyhow::Result;
use declarative::{Resource, ResourceData};
use frontegg::users::UserCreationRequest;

#[derive(Debug, Clone)]
pub struct UserResource {
    spec: UserSpec,
}

impl UserResource {
    pub fn new(spec: UserSpec) -> Self {
        Self { spec }
    }
}

impl Resource<Providers> for UserResource {
    fn resource_type(&self) -> &'static str {
        "user"
    }

    fn description(&self) -> String {
        format!("user {}", self.spec.email)
    }

    fn desired(&self) -> ResourceData {
        let mut data = ResourceData::new();
        data.set("email", self.spec.email.as_str());
        data.set_set("roles", self.spec.roles.iter().cloned());
        data
    }

    fn immutable_keys(&self) -> &'static [&'static str] {
        &["email"]
    }

    fn create(&self, providers: &Providers, data: &mut ResourceData) -> Result<()> {
        let client = providers.identity()?;
        let role_ids = client.role_ids(&self.spec.roles)?;
        let user = client.create_user(&UserCreationRequest::local(&self.spec.email, role_ids))?;
        log::debug!("created user {} ({})", user.email, user.id);

        *data = self.desired();
        data.set_id(user.id);
        self.read(providers, data)
    }

    fn read(&self, providers: &Providers, data: &mut ResourceData) -> Result<()> {
        let Some(id) = data.id().map(str::to_string) else {
            return Ok(());
        };
        let client = providers.identity()?;
        let Some(user) = vanished(client.get_user(&id), data, &format!("user {id}"))? else {
            return Ok(());
        };

        data.set("email", user.email.as_str());
        data.set_set("roles", user.role_labels(&self.spec.roles));
        data.set_opt("verified", user.verified);
        Ok(())
    }

    fn update(&self, providers: &Providers, changes: &[String], data: &mut ResourceData) -> Result<()> {
        let id = data.id().map(str::to_string).unwrap_or_default();
        let client = providers.identity()?;

        if changes.iter().any(|c| c == "roles") {
            let diff = role_id_diff(client, &data.get_list("roles"), &self.spec.roles)?;
            if !diff.to_remove.is_empty() {
                client.remove_user_roles(&id, &diff.to_remove)?;
            }
            if !diff.to_add.is_empty() {
                client.add_user_roles(&id, &diff.to_add)?;
            }
        }
        self.read(providers, data)
    }

    fn delete(&self, providers: &Providers, data: &mut ResourceData) -> Result<()> {
        if let Some(id) = data.id() {
            providers.identity()?.delete_user(id)?;
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

    const USER: &str = "/identity/resources/users/v1/u1";

    fn spec(roles: &[&str]) -> UserSpec {
        UserSpec {
            email: "ops@example.com".into(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    fn remote_user(roles: &[(&str, &str)]) -> serde_json::Value {
        let roles: Vec<_> = roles
            .iter()
            .map(|(id, name)| json!({"id": id, "name": name}))
            .collect();
        json!({"id": "u1", "email": "ops@example.com", "verified": true, "roles": roles})
    }

    #[test]
    fn test_create_resolves_role_names() {
        let transport = testing::with_roles(MockTransport::new())
            .respond(
                Method::Post,
                "/identity/resources/users/v2",
                json!({"id": "u1", "email": "ops@example.com", "roles": []}),
            )
            .respond(Method::Get, USER, remote_user(&[("r-admin", "Admin")]));
        let providers = testing::identity(&transport);

        let mut data = ResourceData::new();
        UserResource::new(spec(&["Admin"]))
            .create(&providers, &mut data)
            .unwrap();

        let create = &transport.requests()[1];
        assert_eq!(
            create.body,
            Some(json!({
                "email": "ops@example.com",
                "name": "ops@example.com",
                "provider": "local",
                "roleIds": ["r-admin"],
            }))
        );
        assert_eq!(data.id(), Some("u1"));
        assert_eq!(data.get_list("roles"), vec!["Admin"]);
        assert_eq!(data.get_bool("verified"), Some(true));
    }

    #[test]
    fn test_unknown_role_fails_before_create() {
        let transport = testing::with_roles(MockTransport::new());
        let providers = testing::identity(&transport);

        let mut data = ResourceData::new();
        let err = UserResource::new(spec(&["Owner"]))
            .create(&providers, &mut data)
            .unwrap_err();
        assert!(err.to_string().contains("Owner"));
        assert!(testing::calls_without_roles(&transport).is_empty());
    }

    #[test]
    fn test_role_update_removes_before_adding() {
        let transport = testing::with_roles(MockTransport::new()).respond(
            Method::Get,
            USER,
            remote_user(&[("r-admin", "Admin"), ("r-member", "Member")]),
        );
        let providers = testing::identity(&transport);
        let resource = UserResource::new(spec(&["Admin", "Member"]));

        let mut data = ResourceData::new();
        data.set_id("u1");
        data.set("email", "ops@example.com");
        data.set_set("roles", ["Member", "Viewer"]);

        let changes = resource.changes(&data);
        assert_eq!(changes, vec!["roles"]);
        resource.update(&providers, &changes, &mut data).unwrap();

        assert_eq!(
            testing::calls_without_roles(&transport),
            vec![
                format!("DELETE {USER}/roles"),
                format!("POST {USER}/roles"),
                format!("GET {USER}"),
            ]
        );
        let bodies: Vec<_> = transport
            .requests()
            .into_iter()
            .filter(|r| r.path.ends_with("/roles") && r.path.starts_with(USER))
            .map(|r| r.body)
            .collect();
        assert_eq!(
            bodies,
            vec![
                Some(json!({"roleIds": ["r-viewer"]})),
                Some(json!({"roleIds": ["r-admin"]})),
            ]
        );
        assert_eq!(data.get_list("roles"), vec!["Admin", "Member"]);
    }

    #[test]
    fn test_roles_read_back_in_declared_spelling() {
        let transport = MockTransport::new().respond(
            Method::Get,
            USER,
            json!({
                "id": "u1",
                "email": "ops@example.com",
                "roles": [
                    {"id": "r-admin", "key": "MaterializePlatformAdmin", "name": "Admin"},
                    {"id": "r-member", "key": "MaterializePlatform", "name": "Member"},
                ],
            }),
        );
        let providers = testing::identity(&transport);
        let resource = UserResource::new(spec(&["MaterializePlatformAdmin", "Member"]));

        let mut data = ResourceData::new();
        data.set_id("u1");
        resource.read(&providers, &mut data).unwrap();

        assert_eq!(data.get_list("roles"), vec!["MaterializePlatformAdmin", "Member"]);
        assert!(resource.changes(&data).is_empty());
    }

    #[test]
    fn test_read_of_deleted_user_clears_id() {
        let transport = MockTransport::new();
        let providers = testing::identity(&transport);
        let mut data = ResourceData::new();
        data.set_id("u1");

        UserResource::new(spec(&[]))
            .read(&providers, &mut data)
            .unwrap();
        assert!(!data.has_id());
    }

    #[test]
    fn test_email_change_forces_replace() {
        let resource = UserResource::new(spec(&[]));
        let mut data = resource.desired();
        data.set_id("u1");
        data.set("email", "old@example.com");
        assert!(matches!(
            declarative::plan_action::<Providers>(&resource, Some(&data)),
            declarative::Action::Replace { .. }
        ));
    }
}
