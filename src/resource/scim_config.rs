//! SCIM 2.0 directory configurations. The bearer token is only returned
//! on creation and is kept from then on.

use super::vanished;
use crate::manifest::ScimConfigSpec;
use crate::providers::Providers;
use anyhow::Result;
use declarative::{Resource, ResourceData};

#[derive(Debug, Clone)]
pub struct ScimConfigResource {
    spec: ScimConfigSpec,
}

impl ScimConfigResource {
    pub fn new(spec: ScimConfigSpec) -> Self {
        Self { spec }
    }
}

impl Resource<Providers> for ScimConfigResource {
    fn resource_type(&self) -> &'static str {
        "scim_config"
    }

    fn description(&self) -> String {
        format!("scim config {} ({})", self.spec.connection_name, self.spec.source)
    }

    fn desired(&self) -> ResourceData {
        let mut data = ResourceData::new();
        data.set("source", self.spec.source.as_str());
        data.set("connection_name", self.spec.connection_name.as_str());
        data
    }

    fn immutable_keys(&self) -> &'static [&'static str] {
        &["source", "connection_name"]
    }

    fn create(&self, providers: &Providers, data: &mut ResourceData) -> Result<()> {
        let config = providers
            .identity()?
            .create_scim_config(&self.spec.source, &self.spec.connection_name)?;

        *data = self.desired();
        data.set_id(config.id.as_str());
        data.set_opt("token", config.token);
        self.read(providers, data)
    }

    fn read(&self, providers: &Providers, data: &mut ResourceData) -> Result<()> {
        let Some(id) = data.id().map(str::to_string) else {
            return Ok(());
        };
        let result = providers.identity()?.get_scim_config(&id);
        let Some(config) = vanished(result, data, &format!("scim config {id}"))? else {
            return Ok(());
        };

        data.set("source", config.source);
        data.set_opt("connection_name", config.connection_name);
        data.set_opt("tenant_id", config.tenant_id);
        data.set_opt("created_at", config.created_at);
        Ok(())
    }

    fn update(&self, providers: &Providers, _changes: &[String], data: &mut ResourceData) -> Result<()> {
        self.read(providers, data)
    }

    fn delete(&self, providers: &Providers, data: &mut ResourceData) -> Result<()> {
        if let Some(id) = data.id() {
            providers.identity()?.delete_scim_config(id)?;
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

    const CONFIGS: &str = "/frontegg/directory/resources/v1/configurations/scim2";

    fn spec() -> ScimConfigSpec {
        ScimConfigSpec {
            source: "okta".into(),
            connection_name: "okta-prod".into(),
        }
    }

    #[test]
    fn test_token_survives_refresh() {
        let transport = MockTransport::new()
            .respond(
                Method::Post,
                CONFIGS,
                json!({"id": "s1", "source": "okta", "connectionName": "okta-prod", "token": "scim-token"}),
            )
            .respond(
                Method::Get,
                CONFIGS,
                json!([{
                    "id": "s1",
                    "source": "okta",
                    "tenantId": "t1",
                    "connectionName": "okta-prod",
                    "createdAt": "2024-03-01T12:00:00Z",
                }]),
            );
        let providers = testing::identity(&transport);
        let resource = ScimConfigResource::new(spec());

        let mut data = ResourceData::new();
        resource.create(&providers, &mut data).unwrap();
        resource.read(&providers, &mut data).unwrap();

        assert_eq!(data.id(), Some("s1"));
        assert_eq!(data.get_str("token"), Some("scim-token"));
        assert_eq!(data.get_str("tenant_id"), Some("t1"));
        assert_eq!(
            transport.requests()[0].body,
            Some(json!({"source": "okta", "connectionName": "okta-prod", "syncToUserManagement": true}))
        );
    }

    #[test]
    fn test_missing_from_list_clears_id() {
        let transport = MockTransport::new().respond(Method::Get, CONFIGS, json!([]));
        let providers = testing::identity(&transport);
        let mut data = ResourceData::new();
        data.set_id("s1");

        ScimConfigResource::new(spec())
            .read(&providers, &mut data)
            .unwrap();
        assert!(!data.has_id());
    }

    #[test]
    fn test_source_change_forces_replace() {
        let resource = ScimConfigResource::new(spec());
        let mut data = resource.desired();
        data.set_id("s1");
        data.set("source", "azure-ad");
        assert!(matches!(
            declarative::plan_action::<Providers>(&resource, Some(&data)),
            declarative::Action::Replace { .. }
        ));
    }
}
