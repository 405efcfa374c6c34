//! Organization roles and name/id resolution.
//!
//! Resources refer to roles by display name (or key); the API wants ids.
//! The role list is fetched fresh for every resolution.

use crate::error::{Error, Result};
use crate::{Client, Method};
use serde::{Deserialize, Serialize};

pub const ROLES_PATH: &str = "/identity/resources/roles/v2";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: String,
    #[serde(default)]
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

impl Role {
    /// How a declaration refers to this role: the key when `declared`
    /// lists the key, otherwise the display name.
    pub fn label(&self, declared: &[String]) -> String {
        if !self.key.is_empty() && declared.contains(&self.key) {
            self.key.clone()
        } else {
            self.name.clone()
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RolesResponse {
    Plain(Vec<Role>),
    Paged { items: Vec<Role> },
}

impl Client {
    pub fn list_roles(&self) -> Result<Vec<Role>> {
        let response: RolesResponse = self.fetch(Method::Get, ROLES_PATH, None, "roles")?;
        Ok(match response {
            RolesResponse::Paged { items } => items,
            RolesResponse::Plain(roles) => roles,
        })
    }

    /// Resolve role names (or keys) to ids, keeping the input order.
    pub fn role_ids(&self, names: &[String]) -> Result<Vec<String>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        let roles = self.list_roles()?;
        names
            .iter()
            .map(|name| {
                roles
                    .iter()
                    .find(|r| &r.name == name || &r.key == name)
                    .map(|r| r.id.clone())
                    .ok_or_else(|| Error::Validation(format!("unknown role {name:?}")))
            })
            .collect()
    }

    /// Resolve role ids back to names. Unknown ids are kept as-is.
    pub fn role_names(&self, ids: &[String]) -> Result<Vec<String>> {
        self.role_labels(ids, &[])
    }

    /// Resolve role ids back to the spelling `declared` uses for them,
    /// so a role declared by key reads back as its key.
    pub fn role_labels(&self, ids: &[String], declared: &[String]) -> Result<Vec<String>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let roles = self.list_roles()?;
        Ok(ids
            .iter()
            .map(|id| {
                roles
                    .iter()
                    .find(|r| &r.id == id)
                    .map_or_else(|| id.clone(), |r| r.label(declared))
            })
            .collect())
    }
}
