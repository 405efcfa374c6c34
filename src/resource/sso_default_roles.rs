//! Roles granted to every user signing in through an SSO configuration.
//!
//! Keyed by the configuration id. The role list is replaced wholesale;
//! delete clears it.

use crate::manifest::SsoDefaultRolesSpec;
use crate::providers::Providers;
use anyhow::Result;
use declarative::{Resource, ResourceData};

#[derive(Debug, Clone)]
pub struct SsoDefaultRolesResource {
    spec: SsoDefaultRolesSpec,
}

impl SsoDefaultRolesResource {
    pub fn new(spec: SsoDefaultRolesSpec) -> Self {
        Self { spec }
    }

    fn replace_roles(&self, providers: &Providers) -> Result<()> {
        let client = providers.identity()?;
        let role_ids = client.role_ids(&self.spec.roles)?;
        client.set_default_roles(&self.spec.sso_config_id, &role_ids)?;
        Ok(())
    }
}

impl Resource<Providers> for SsoDefaultRolesResource {
    fn resource_type(&self) -> &'static str {
        "sso_default_roles"
    }

    fn description(&self) -> String {
        format!("default roles of sso config {}", self.spec.sso_config_id)
    }

    fn desired(&self) -> ResourceData {
        let mut data = ResourceData::new();
        data.set("sso_config_id", self.spec.sso_config_id.as_str());
        data.set_set("roles", self.spec.roles.iter().cloned());
        data
    }

    fn immutable_keys(&self) -> &'static [&'static str] {
        &["sso_config_id"]
    }

    fn create(&self, providers: &Providers, data: &mut ResourceData) -> Result<()> {
        self.replace_roles(providers)?;
        *data = self.desired();
        data.set_id(self.spec.sso_config_id.as_str());
        self.read(providers, data)
    }

    fn read(&self, providers: &Providers, data: &mut ResourceData) -> Result<()> {
        let Some(id) = data.id().map(str::to_string) else {
            return Ok(());
        };
        let client = providers.identity()?;
        let result = client.get_default_roles(&id);
        let Some(role_ids) = super::vanished(result, data, &format!("sso config {id}"))? else {
            return Ok(());
        };

        data.set("sso_config_id", id.as_str());
        data.set_set("roles", client.role_labels(&role_ids, &self.spec.roles)?);
        Ok(())
    }

    fn update(&self, providers: &Providers, _changes: &[String], data: &mut ResourceData) -> Result<()> {
        self.replace_roles(providers)?;
        self.read(providers, data)
    }

    fn delete(&self, providers: &Providers, data: &mut ResourceData) -> Result<()> {
        let result = providers
            .identity()
            .and_then(|client| Ok(client.set_default_roles(&self.spec.sso_config_id, &[])?));
        if let Err(e) = result {
            log::warn!(
                "clearing default roles of sso config {} failed: {e:#}",
                self.spec.sso_config_id
            );
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

    const ROLES: &str = "/frontegg/team/resources/sso/v1/configurations/c1/roles";

    fn spec(roles: &[&str]) -> SsoDefaultRolesSpec {
        SsoDefaultRolesSpec {
            sso_config_id: "c1".into(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_create_puts_role_ids() {
        let transport = testing::with_roles(MockTransport::new())
            .respond(Method::Get, ROLES, json!({"roleIds": ["r-viewer"]}));
        let providers = testing::identity(&transport);

        let mut data = ResourceData::new();
        SsoDefaultRolesResource::new(spec(&["Viewer"]))
            .create(&providers, &mut data)
            .unwrap();

        let put = transport
            .requests()
            .into_iter()
            .find(|r| r.method == Method::Put)
            .unwrap();
        assert_eq!(put.path, ROLES);
        assert_eq!(put.body, Some(json!({"roleIds": ["r-viewer"]})));
        assert_eq!(data.id(), Some("c1"));
        assert_eq!(data.get_list("roles"), vec!["Viewer"]);
    }

    #[test]
    fn test_delete_clears_roles() {
        let transport = MockTransport::new();
        let providers = testing::identity(&transport);
        let mut data = ResourceData::new();
        data.set_id("c1");

        SsoDefaultRolesResource::new(spec(&["Viewer"]))
            .delete(&providers, &mut data)
            .unwrap();

        assert_eq!(transport.calls(), vec![format!("PUT {ROLES}")]);
        assert_eq!(transport.requests()[0].body, Some(json!({"roleIds": []})));
        assert!(!data.has_id());
    }

    #[test]
    fn test_config_gone_clears_id() {
        let transport = MockTransport::new();
        let providers = testing::identity(&transport);
        let mut data = ResourceData::new();
        data.set_id("c1");

        SsoDefaultRolesResource::new(spec(&[]))
            .read(&providers, &mut data)
            .unwrap();
        assert!(!data.has_id());
    }
}
