//! Identity-provider group to role mappings.
//!
//! The API has no add/remove endpoint for a mapping's roles, so an update
//! sends the full desired role list.

use super::vanished;
use crate::manifest::SsoGroupMappingSpec;
use crate::providers::Providers;
use anyhow::Result;
use declarative::{Resource, ResourceData};

#[derive(Debug, Clone)]
pub struct SsoGroupMappingResource {
    spec: SsoGroupMappingSpec,
}

impl SsoGroupMappingResource {
    pub fn new(spec: SsoGroupMappingSpec) -> Self {
        Self { spec }
    }
}

impl Resource<Providers> for SsoGroupMappingResource {
    fn resource_type(&self) -> &'static str {
        "sso_group_mapping"
    }

    fn description(&self) -> String {
        format!("sso group mapping {:?}", self.spec.group)
    }

    fn desired(&self) -> ResourceData {
        let mut data = ResourceData::new();
        data.set("sso_config_id", self.spec.sso_config_id.as_str());
        data.set("group", self.spec.group.as_str());
        data.set_set("roles", self.spec.roles.iter().cloned());
        data
    }

    fn immutable_keys(&self) -> &'static [&'static str] {
        &["sso_config_id"]
    }

    fn create(&self, providers: &Providers, data: &mut ResourceData) -> Result<()> {
        let client = providers.identity()?;
        let role_ids = client.role_ids(&self.spec.roles)?;
        let mapping =
            client.create_group_mapping(&self.spec.sso_config_id, &self.spec.group, &role_ids)?;
        *data = self.desired();
        data.set_id(mapping.id);
        self.read(providers, data)
    }

    fn read(&self, providers: &Providers, data: &mut ResourceData) -> Result<()> {
        let Some(id) = data.id().map(str::to_string) else {
            return Ok(());
        };
        let client = providers.identity()?;
        let result = client.get_group_mapping(&self.spec.sso_config_id, &id);
        let Some(mapping) = vanished(result, data, &format!("sso group mapping {id}"))? else {
            return Ok(());
        };

        data.set("sso_config_id", self.spec.sso_config_id.as_str());
        data.set("group", mapping.group);
        data.set_set("roles", client.role_labels(&mapping.role_ids, &self.spec.roles)?);
        data.set("enabled", mapping.enabled);
        Ok(())
    }

    fn update(&self, providers: &Providers, _changes: &[String], data: &mut ResourceData) -> Result<()> {
        if let Some(id) = data.id() {
            let client = providers.identity()?;
            let role_ids = client.role_ids(&self.spec.roles)?;
            client.update_group_mapping(&self.spec.sso_config_id, id, &self.spec.group, &role_ids)?;
        }
        self.read(providers, data)
    }

    fn delete(&self, providers: &Providers, data: &mut ResourceData) -> Result<()> {
        if let Some(id) = data.id() {
            let result = providers.identity().and_then(|client| {
                Ok(client.delete_group_mapping(&self.spec.sso_config_id, id)?)
            });
            if let Err(e) = result {
                log::warn!("deleting sso group mapping {id} failed: {e:#}");
            }
        }
        data.clear_id();
        Ok(())
    }
}
