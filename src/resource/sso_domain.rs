use super::vanished;
use crate::manifest::SsoDomainSpec;
use crate::providers::Providers;
use anyhow::Result;
use declarative::{Resource, ResourceData};

/// A domain claimed by an SSO configuration. Nothing is alterable.
#[derive(Debug, Clone)]
pub struct SsoDomainResource {
    spec: SsoDomainSpec,
}

impl SsoDomainResource {
    pub fn new(spec: SsoDomainSpec) -> Self {
        Self { spec }
    }
}

impl Resource<Providers> for SsoDomainResource {
    fn resource_type(&self) -> &'static str {
        "sso_domain"
    }

    fn description(&self) -> String {
        format!("sso domain {}", self.spec.domain)
    }

    fn desired(&self) -> ResourceData {
        let mut data = ResourceData::new();
        data.set("sso_config_id", self.spec.sso_config_id.as_str());
        data.set("domain", self.spec.domain.as_str());
        data
    }

    fn immutable_keys(&self) -> &'static [&'static str] {
        &["sso_config_id", "domain"]
    }

    fn create(&self, providers: &Providers, data: &mut ResourceData) -> Result<()> {
        let domain = providers
            .identity()?
            .create_sso_domain(&self.spec.sso_config_id, &self.spec.domain)?;
        *data = self.desired();
        data.set_id(domain.id);
        data.set("validated", domain.validated);
        self.read(providers, data)
    }

    fn read(&self, providers: &Providers, data: &mut ResourceData) -> Result<()> {
        let Some(id) = data.id().map(str::to_string) else {
            return Ok(());
        };
        let result = providers
            .identity()?
            .get_sso_domain(&self.spec.sso_config_id, &id);
        let Some(domain) = vanished(result, data, &format!("sso domain {id}"))? else {
            return Ok(());
        };

        data.set("sso_config_id", self.spec.sso_config_id.as_str());
        data.set("domain", domain.domain);
        data.set("validated", domain.validated);
        Ok(())
    }

    fn update(&self, providers: &Providers, _changes: &[String], data: &mut ResourceData) -> Result<()> {
        self.read(providers, data)
    }

    fn delete(&self, providers: &Providers, data: &mut ResourceData) -> Result<()> {
        if let Some(id) = data.id() {
            providers
                .identity()?
                .delete_sso_domain(&self.spec.sso_config_id, id)?;
        }
        data.clear_id();
        Ok(())
    }
}
