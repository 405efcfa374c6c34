//! SCIM groups and SCIM 2.0 directory configurations.

use crate::error::{Error, Result};
use crate::roles::Role;
use crate::transport::segment;
use crate::{Client, Method};
use serde::Deserialize;
use serde_json::{Value, json};

pub const GROUPS_PATH: &str = "/frontegg/identity/resources/groups/v1";
pub const SCIM_CONFIGS_PATH: &str = "/frontegg/directory/resources/v1/configurations/scim2";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GroupMember {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub users: Vec<GroupMember>,
}

impl ScimGroup {
    #[must_use]
    pub fn role_ids(&self) -> Vec<String> {
        self.roles.iter().map(|r| r.id.clone()).collect()
    }

    #[must_use]
    pub fn user_ids(&self) -> Vec<String> {
        self.users.iter().map(|u| u.id.clone()).collect()
    }
}

#[derive(Deserialize)]
struct GroupsResponse {
    #[serde(default)]
    groups: Vec<ScimGroup>,
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimConfig {
    pub id: String,
    pub source: String,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub connection_name: Option<String>,
    #[serde(default)]
    pub sync_to_user_management: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Bearer token for the directory; only returned on creation.
    #[serde(default)]
    pub token: Option<String>,
}

impl std::fmt::Debug for ScimConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScimConfig")
            .field("id", &self.id)
            .field("source", &self.source)
            .field("connection_name", &self.connection_name)
            .finish_non_exhaustive()
    }
}

fn group_path(id: &str) -> String {
    format!("{GROUPS_PATH}/{}", segment(id))
}

impl Client {
    // =========================================================================
    // Groups
    // =========================================================================

    pub fn create_group(&self, name: &str, description: Option<&str>) -> Result<ScimGroup> {
        let body = json!({ "name": name, "description": description.unwrap_or_default() });
        self.fetch(Method::Post, GROUPS_PATH, Some(&body), "group")
    }

    /// Fetch a group together with its roles and users.
    pub fn get_group(&self, id: &str) -> Result<ScimGroup> {
        let path = format!("{}?_groupsRelations=rolesAndUsers", group_path(id));
        self.fetch(Method::Get, &path, None, "group")
    }

    pub fn list_groups(&self) -> Result<Vec<ScimGroup>> {
        let response: GroupsResponse = self.fetch(Method::Get, GROUPS_PATH, None, "groups")?;
        Ok(response.groups)
    }

    pub fn update_group(&self, id: &str, name: &str, description: Option<&str>) -> Result<()> {
        let body = json!({ "name": name, "description": description.unwrap_or_default() });
        self.call(Method::Patch, &group_path(id), Some(&body))
    }

    pub fn delete_group(&self, id: &str) -> Result<()> {
        self.call(Method::Delete, &group_path(id), None)
    }

    pub fn add_group_roles(&self, id: &str, role_ids: &[String]) -> Result<()> {
        let path = format!("{}/roles", group_path(id));
        self.call(Method::Post, &path, Some(&json!({ "roleIds": role_ids })))
    }

    pub fn remove_group_roles(&self, id: &str, role_ids: &[String]) -> Result<()> {
        let path = format!("{}/roles", group_path(id));
        self.call(Method::Delete, &path, Some(&json!({ "roleIds": role_ids })))
    }

    pub fn add_group_users(&self, id: &str, user_ids: &[String]) -> Result<()> {
        let path = format!("{}/users", group_path(id));
        self.call(Method::Post, &path, Some(&json!({ "userIds": user_ids })))
    }

    pub fn remove_group_users(&self, id: &str, user_ids: &[String]) -> Result<()> {
        let path = format!("{}/users", group_path(id));
        self.call(Method::Delete, &path, Some(&json!({ "userIds": user_ids })))
    }

    // =========================================================================
    // SCIM 2.0 configurations
    // =========================================================================

    pub fn create_scim_config(&self, source: &str, connection_name: &str) -> Result<ScimConfig> {
        let body = json!({
            "source": source,
            "connectionName": connection_name,
            "syncToUserManagement": true,
        });
        self.fetch(Method::Post, SCIM_CONFIGS_PATH, Some(&body), "scim configuration")
    }

    pub fn list_scim_configs(&self) -> Result<Vec<ScimConfig>> {
        let value: Value = self.fetch(Method::Get, SCIM_CONFIGS_PATH, None, "scim configurations")?;
        Ok(serde_json::from_value(value)?)
    }

    /// There is no get-by-id endpoint; the list is searched instead.
    pub fn get_scim_config(&self, id: &str) -> Result<ScimConfig> {
        self.list_scim_configs()?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::NotFound(format!("scim configuration {id}")))
    }

    pub fn delete_scim_config(&self, id: &str) -> Result<()> {
        let path = format!("{SCIM_CONFIGS_PATH}/{}", segment(id));
        self.call(Method::Delete, &path, None)
    }
}
