//! API tokens backing app passwords.
//!
//! Personal tokens belong to the authenticated user. Tenant (service)
//! tokens carry their own roles and a `metadata.user` naming the SQL user
//! they authenticate as. The secret is only returned by the create call.

use crate::app_password::AppPassword;
use crate::error::Result;
use crate::transport::segment;
use crate::{Client, Method};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Value, json};

pub const USER_TOKENS_PATH: &str = "/identity/resources/users/api-tokens/v1";
pub const TENANT_TOKENS_PATH: &str = "/identity/resources/tenants/api-tokens/v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Personal,
    Tenant,
}

impl TokenKind {
    fn path(self) -> &'static str {
        match self {
            Self::Personal => USER_TOKENS_PATH,
            Self::Tenant => TENANT_TOKENS_PATH,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenMetadata {
    #[serde(default)]
    pub user: Option<String>,
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiToken {
    pub client_id: String,
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub role_ids: Vec<String>,
    #[serde(default)]
    pub metadata: Option<TokenMetadata>,
}

impl std::fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiToken")
            .field("client_id", &self.client_id)
            .field("description", &self.description)
            .field("created_at", &self.created_at)
            .field("role_ids", &self.role_ids)
            .finish_non_exhaustive()
    }
}

impl ApiToken {
    /// Creation time, when the server sent a parseable RFC 3339 timestamp.
    #[must_use]
    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| t.with_timezone(&Utc))
    }

    /// The app password for this token. Only available right after creation.
    pub fn app_password(&self) -> Option<Result<AppPassword>> {
        self.secret
            .as_deref()
            .map(|secret| AppPassword::new(&self.client_id, secret))
    }

    #[must_use]
    pub fn user(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| m.user.as_deref())
    }
}

fn token_path(kind: TokenKind, id: &str) -> String {
    format!("{}/{}", kind.path(), segment(id))
}

impl Client {
    pub fn create_personal_token(&self, description: &str) -> Result<ApiToken> {
        let body = json!({ "description": description });
        self.fetch(Method::Post, USER_TOKENS_PATH, Some(&body), "api token")
    }

    pub fn create_tenant_token(
        &self,
        description: &str,
        user: &str,
        role_ids: &[String],
    ) -> Result<ApiToken> {
        let body = json!({
            "description": description,
            "metadata": { "user": user },
            "roleIds": role_ids,
        });
        self.fetch(Method::Post, TENANT_TOKENS_PATH, Some(&body), "api token")
    }

    pub fn list_tokens(&self, kind: TokenKind) -> Result<Vec<ApiToken>> {
        let value: Value = self.fetch(Method::Get, kind.path(), None, "api tokens")?;
        // Some tenants answer with a bare list, others page under `items`.
        let list = match value {
            Value::Object(mut map) => map.remove("items").unwrap_or(Value::Array(Vec::new())),
            other => other,
        };
        Ok(serde_json::from_value(list)?)
    }

    /// Find a token by client id in the list for `kind`.
    pub fn get_token(&self, kind: TokenKind, client_id: &str) -> Result<ApiToken> {
        self.list_tokens(kind)?
            .into_iter()
            .find(|t| t.client_id == client_id)
            .ok_or_else(|| crate::Error::NotFound(format!("api token {client_id}")))
    }

    pub fn delete_token(&self, kind: TokenKind, client_id: &str) -> Result<()> {
        self.call(Method::Delete, &token_path(kind, client_id), None)
    }
}
