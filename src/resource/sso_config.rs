//! SSO configurations.
//!
//! Everything but the protocol type is patched in place. The OIDC secret
//! is never returned by the API, so the declared value is kept.

use super::vanished;
use crate::manifest::SsoConfigSpec;
use crate::providers::Providers;
use anyhow::Result;
use declarative::{Resource, ResourceData};
use frontegg::sso::{SsoConfigRequest, SsoType};

fn type_name(sso_type: SsoType) -> &'static str {
    match sso_type {
        SsoType::Saml => "saml",
        SsoType::Oidc => "oidc",
    }
}

#[derive(Debug, Clone)]
pub struct SsoConfigResource {
    spec: SsoConfigSpec,
}

impl SsoConfigResource {
    pub fn new(spec: SsoConfigSpec) -> Self {
        Self { spec }
    }

    fn request(&self) -> SsoConfigRequest {
        SsoConfigRequest {
            enabled: self.spec.enabled,
            sign_request: self.spec.sign_request,
            sso_endpoint: self.spec.sso_endpoint.clone(),
            public_certificate: self.spec.public_certificate.clone(),
            sso_type: self.spec.sso_type,
            oidc_client_id: self.spec.oidc_client_id.clone(),
            oidc_secret: self.spec.oidc_secret.clone(),
        }
    }
}

impl Resource<Providers> for SsoConfigResource {
    fn resource_type(&self) -> &'static str {
        "sso_config"
    }

    fn description(&self) -> String {
        format!("{} sso config {}", type_name(self.spec.sso_type), self.spec.sso_endpoint)
    }

    fn desired(&self) -> ResourceData {
        let mut data = ResourceData::new();
        data.set("enabled", self.spec.enabled);
        data.set("sign_request", self.spec.sign_request);
        data.set("sso_endpoint", self.spec.sso_endpoint.as_str());
        data.set("public_certificate", self.spec.public_certificate.as_str());
        data.set("type", type_name(self.spec.sso_type));
        data.set_opt("oidc_client_id", self.spec.oidc_client_id.clone());
        data.set_opt("oidc_secret", self.spec.oidc_secret.clone());
        data
    }

    fn immutable_keys(&self) -> &'static [&'static str] {
        &["type"]
    }

    fn create(&self, providers: &Providers, data: &mut ResourceData) -> Result<()> {
        let config = providers.identity()?.create_sso_config(&self.request())?;
        *data = self.desired();
        data.set_id(config.id);
        self.read(providers, data)
    }

    fn read(&self, providers: &Providers, data: &mut ResourceData) -> Result<()> {
        let Some(id) = data.id().map(str::to_string) else {
            return Ok(());
        };
        let result = providers.identity()?.get_sso_config(&id);
        let Some(config) = vanished(result, data, &format!("sso config {id}"))? else {
            return Ok(());
        };

        data.set("enabled", config.enabled);
        data.set("sign_request", config.sign_request);
        if let Some(endpoint) = config.sso_endpoint {
            data.set("sso_endpoint", endpoint);
        }
        if let Some(certificate) = config.public_certificate {
            data.set("public_certificate", certificate);
        }
        if let Some(sso_type) = config.sso_type {
            data.set("type", type_name(sso_type));
        }
        data.set_opt("oidc_client_id", config.oidc_client_id);
        Ok(())
    }

    fn update(&self, providers: &Providers, _changes: &[String], data: &mut ResourceData) -> Result<()> {
        if let Some(id) = data.id() {
            providers.identity()?.update_sso_config(id, &self.request())?;
        }
        data.set_opt("oidc_secret", self.spec.oidc_secret.clone());
        self.read(providers, data)
    }

    fn delete(&self, providers: &Providers, data: &mut ResourceData) -> Result<()> {
        if let Some(id) = data.id() {
            providers.identity()?.delete_sso_config(id)?;
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

    const CONFIGS: &str = "/frontegg/team/resources/sso/v1/configurations";

    fn spec(enabled: bool) -> SsoConfigSpec {
        SsoConfigSpec {
            enabled,
            sign_request: false,
            sso_endpoint: "https://idp.example.com/sso".into(),
            public_certificate: "-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----".into(),
            sso_type: SsoType::Oidc,
            oidc_client_id: Some("client".into()),
            oidc_secret: Some("oidc-secret".into()),
        }
    }

    fn remote(enabled: bool) -> serde_json::Value {
        json!([{
            "id": "c1",
            "enabled": enabled,
            "signRequest": false,
            "ssoEndpoint": "https://idp.example.com/sso",
            "publicCertificate": "-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----",
            "type": "oidc",
            "oidcClientId": "client",
        }])
    }

    #[test]
    fn test_create_keeps_oidc_secret() {
        let transport = MockTransport::new()
            .respond(Method::Post, CONFIGS, json!({"id": "c1"}))
            .respond(Method::Get, CONFIGS, remote(true));
        let providers = testing::identity(&transport);
        let resource = SsoConfigResource::new(spec(true));

        let mut data = ResourceData::new();
        resource.create(&providers, &mut data).unwrap();

        let body = transport.requests()[0].body.clone().unwrap();
        assert_eq!(body["type"], "oidc");
        assert_eq!(body["oidcSecret"], "oidc-secret");
        assert_eq!(data.id(), Some("c1"));
        assert_eq!(data.get_str("oidc_secret"), Some("oidc-secret"));
        assert!(resource.changes(&data).is_empty());
    }

    #[test]
    fn test_enabling_patches_in_place() {
        let transport = MockTransport::new().respond(Method::Get, CONFIGS, remote(true));
        let providers = testing::identity(&transport);
        let resource = SsoConfigResource::new(spec(true));

        let mut data = resource.desired();
        data.set_id("c1");
        data.set("enabled", false);

        let changes = resource.changes(&data);
        assert_eq!(changes, vec!["enabled"]);
        assert!(matches!(
            declarative::plan_action::<Providers>(&resource, Some(&data)),
            declarative::Action::Update { .. }
        ));

        resource.update(&providers, &changes, &mut data).unwrap();
        assert_eq!(transport.calls()[0], format!("PATCH {CONFIGS}/c1"));
        assert_eq!(data.get_bool("enabled"), Some(true));
    }

    #[test]
    fn test_debug_hides_secret() {
        assert!(!format!("{:?}", spec(true)).contains("oidc-secret"));
    }
}
