use super::vanished;
use crate::manifest::ScimGroupSpec;
use crate::providers::Providers;
use anyhow::Result;
use declarative::{Resource, ResourceData};

/// A SCIM group. Its roles and members are separate resources.
#[derive(Debug, Clone)]
pub struct ScimGroupResource {
    spec: ScimGroupSpec,
}

impl ScimGroupResource {
    pub fn new(spec: ScimGroupSpec) -> Self {
        Self { spec }
    }
}

impl Resource<Providers> for ScimGroupResource {
    fn resource_type(&self) -> &'static str {
        "scim_group"
    }

    fn description(&self) -> String {
        format!("scim group {:?}", self.spec.name)
    }

    fn desired(&self) -> ResourceData {
        let mut data = ResourceData::new();
        data.set("name", self.spec.name.as_str());
        data.set_opt("description", self.spec.description.clone());
        data
    }

    fn create(&self, providers: &Providers, data: &mut ResourceData) -> Result<()> {
        let group = providers
            .identity()?
            .create_group(&self.spec.name, self.spec.description.as_deref())?;
        *data = self.desired();
        data.set_id(group.id);
        self.read(providers, data)
    }

    fn read(&self, providers: &Providers, data: &mut ResourceData) -> Result<()> {
        let Some(id) = data.id().map(str::to_string) else {
            return Ok(());
        };
        let result = providers.identity()?.get_group(&id);
        let Some(group) = vanished(result, data, &format!("scim group {id}"))? else {
            return Ok(());
        };

        data.set("name", group.name);
        data.set_opt("description", group.description.filter(|d| !d.is_empty()));
        Ok(())
    }

    fn update(&self, providers: &Providers, _changes: &[String], data: &mut ResourceData) -> Result<()> {
        if let Some(id) = data.id() {
            providers.identity()?.update_group(
                id,
                &self.spec.name,
                self.spec.description.as_deref(),
            )?;
        }
        self.read(providers, data)
    }

    fn delete(&self, providers: &Providers, data: &mut ResourceData) -> Result<()> {
        if let Some(id) = data.id() {
            providers.identity()?.delete_group(id)?;
        }
        data.clear_id();
        Ok(())
    }
}
