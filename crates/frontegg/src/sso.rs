//! SSO configurations and the entities hanging off them: domains, group
//! mappings and default roles.

use crate::error::{Error, Result};
use crate::transport::segment;
use crate::{Client, Method};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const SSO_CONFIGS_PATH: &str = "/frontegg/team/resources/sso/v1/configurations";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SsoType {
    #[default]
    Saml,
    Oidc,
}

/// Writable part of an SSO configuration.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SsoConfigRequest {
    pub enabled: bool,
    pub sign_request: bool,
    pub sso_endpoint: String,
    /// PEM certificate, sent as given.
    pub public_certificate: String,
    #[serde(rename = "type")]
    pub sso_type: SsoType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oidc_client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oidc_secret: Option<String>,
}

impl std::fmt::Debug for SsoConfigRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SsoConfigRequest")
            .field("enabled", &self.enabled)
            .field("sso_endpoint", &self.sso_endpoint)
            .field("sso_type", &self.sso_type)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SsoDomain {
    pub id: String,
    pub domain: String,
    #[serde(default)]
    pub validated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SsoConfig {
    pub id: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub sign_request: bool,
    #[serde(default)]
    pub sso_endpoint: Option<String>,
    #[serde(default)]
    pub public_certificate: Option<String>,
    #[serde(default, rename = "type")]
    pub sso_type: Option<SsoType>,
    #[serde(default)]
    pub oidc_client_id: Option<String>,
    #[serde(default)]
    pub domains: Vec<SsoDomain>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMapping {
    pub id: String,
    pub group: String,
    #[serde(default)]
    pub role_ids: Vec<String>,
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DefaultRoles {
    #[serde(default)]
    role_ids: Vec<String>,
}

fn config_path(id: &str) -> String {
    format!("{SSO_CONFIGS_PATH}/{}", segment(id))
}

impl Client {
    // =========================================================================
    // Configurations
    // =========================================================================

    pub fn create_sso_config(&self, request: &SsoConfigRequest) -> Result<SsoConfig> {
        let body = serde_json::to_value(request)?;
        self.fetch(Method::Post, SSO_CONFIGS_PATH, Some(&body), "sso configuration")
    }

    pub fn list_sso_configs(&self) -> Result<Vec<SsoConfig>> {
        self.fetch(Method::Get, SSO_CONFIGS_PATH, None, "sso configurations")
    }

    /// There is no get-by-id endpoint; the list is searched instead.
    pub fn get_sso_config(&self, id: &str) -> Result<SsoConfig> {
        self.list_sso_configs()?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::NotFound(format!("sso configuration {id}")))
    }

    pub fn update_sso_config(&self, id: &str, request: &SsoConfigRequest) -> Result<()> {
        let body = serde_json::to_value(request)?;
        self.call(Method::Patch, &config_path(id), Some(&body))
    }

    pub fn delete_sso_config(&self, id: &str) -> Result<()> {
        self.call(Method::Delete, &config_path(id), None)
    }

    // =========================================================================
    // Domains
    // =========================================================================

    pub fn create_sso_domain(&self, config_id: &str, domain: &str) -> Result<SsoDomain> {
        let path = format!("{}/domains", config_path(config_id));
        self.fetch(Method::Post, &path, Some(&json!({ "domain": domain })), "sso domain")
    }

    /// Domains are listed on their configuration.
    pub fn get_sso_domain(&self, config_id: &str, domain_id: &str) -> Result<SsoDomain> {
        self.get_sso_config(config_id)?
            .domains
            .into_iter()
            .find(|d| d.id == domain_id)
            .ok_or_else(|| Error::NotFound(format!("sso domain {domain_id}")))
    }

    pub fn delete_sso_domain(&self, config_id: &str, domain_id: &str) -> Result<()> {
        let path = format!("{}/domains/{}", config_path(config_id), segment(domain_id));
        self.call(Method::Delete, &path, None)
    }

    // =========================================================================
    // Group mappings
    // =========================================================================

    pub fn list_group_mappings(&self, config_id: &str) -> Result<Vec<GroupMapping>> {
        let path = format!("{}/groups", config_path(config_id));
        self.fetch(Method::Get, &path, None, "sso group mappings")
    }

    pub fn get_group_mapping(&self, config_id: &str, mapping_id: &str) -> Result<GroupMapping> {
        self.list_group_mappings(config_id)?
            .into_iter()
            .find(|m| m.id == mapping_id)
            .ok_or_else(|| Error::NotFound(format!("sso group mapping {mapping_id}")))
    }

    pub fn create_group_mapping(
        &self,
        config_id: &str,
        group: &str,
        role_ids: &[String],
    ) -> Result<GroupMapping> {
        let path = format!("{}/groups", config_path(config_id));
        let body = json!({ "group": group, "roleIds": role_ids });
        self.fetch(Method::Post, &path, Some(&body), "sso group mapping")
    }

    pub fn update_group_mapping(
        &self,
        config_id: &str,
        mapping_id: &str,
        group: &str,
        role_ids: &[String],
    ) -> Result<()> {
        let path = format!("{}/groups/{}", config_path(config_id), segment(mapping_id));
        let body = json!({ "group": group, "roleIds": role_ids });
        self.call(Method::Patch, &path, Some(&body))
    }

    pub fn delete_group_mapping(&self, config_id: &str, mapping_id: &str) -> Result<()> {
        let path = format!("{}/groups/{}", config_path(config_id), segment(mapping_id));
        self.call(Method::Delete, &path, None)
    }

    // =========================================================================
    // Default roles
    // =========================================================================

    pub fn get_default_roles(&self, config_id: &str) -> Result<Vec<String>> {
        let path = format!("{}/roles", config_path(config_id));
        let value: Option<Value> = self.send(Method::Get, &path, None)?;
        match value {
            Some(value) => Ok(serde_json::from_value::<DefaultRoles>(value)?.role_ids),
            None => Ok(Vec::new()),
        }
    }

    /// Replace the default roles; an empty list clears them.
    pub fn set_default_roles(&self, config_id: &str, role_ids: &[String]) -> Result<()> {
        let path = format!("{}/roles", config_path(config_id));
        self.call(Method::Put, &path, Some(&json!({ "roleIds": role_ids })))
    }
}
