//! Organization users.

use crate::error::Result;
use crate::roles::Role;
use crate::transport::segment;
use crate::{Client, Method};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const CREATE_USERS_PATH: &str = "/identity/resources/users/v2";
pub const USERS_PATH: &str = "/identity/resources/users/v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreationRequest {
    pub email: String,
    pub name: String,
    pub provider: String,
    pub role_ids: Vec<String>,
}

impl UserCreationRequest {
    /// A locally provisioned user named after their email.
    #[must_use]
    pub fn local(email: impl Into<String>, role_ids: Vec<String>) -> Self {
        let email = email.into();
        Self {
            name: email.clone(),
            email,
            provider: "local".to_string(),
            role_ids,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub verified: Option<bool>,
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl User {
    #[must_use]
    pub fn role_names(&self) -> Vec<String> {
        self.role_labels(&[])
    }

    /// Role names, spelled as keys where `declared` uses the key.
    #[must_use]
    pub fn role_labels(&self, declared: &[String]) -> Vec<String> {
        self.roles.iter().map(|r| r.label(declared)).collect()
    }
}

fn user_path(id: &str) -> String {
    format!("{USERS_PATH}/{}", segment(id))
}

fn roles_body(role_ids: &[String]) -> Value {
    json!({ "roleIds": role_ids })
}

impl Client {
    pub fn create_user(&self, request: &UserCreationRequest) -> Result<User> {
        let body = serde_json::to_value(request)?;
        self.fetch(Method::Post, CREATE_USERS_PATH, Some(&body), "user")
    }

    pub fn get_user(&self, id: &str) -> Result<User> {
        self.fetch(Method::Get, &user_path(id), None, "user")
    }

    pub fn delete_user(&self, id: &str) -> Result<()> {
        self.call(Method::Delete, &user_path(id), None)
    }

    pub fn add_user_roles(&self, id: &str, role_ids: &[String]) -> Result<()> {
        let path = format!("{}/roles", user_path(id));
        self.call(Method::Post, &path, Some(&roles_body(role_ids)))
    }

    pub fn remove_user_roles(&self, id: &str, role_ids: &[String]) -> Result<()> {
        let path = format!("{}/roles", user_path(id));
        self.call(Method::Delete, &path, Some(&roles_body(role_ids)))
    }
}
