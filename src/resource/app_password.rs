//! App passwords, backed by personal or tenant API tokens.
//!
//! The secret is only returned when the token is minted; it is recorded
//! then and never read back.

use super::vanished;
use crate::manifest::{AppPasswordSpec, AppPasswordType};
use crate::providers::Providers;
use anyhow::{Result, bail};
use declarative::{Resource, ResourceData};
use frontegg::tokens::{ApiToken, TokenKind};

#[derive(Debug, Clone)]
pub struct AppPasswordResource {
    spec: AppPasswordSpec,
}

impl AppPasswordResource {
    pub fn new(spec: AppPasswordSpec) -> Self {
        Self { spec }
    }

    fn kind(&self) -> TokenKind {
        match self.spec.password_type {
            AppPasswordType::Personal => TokenKind::Personal,
            AppPasswordType::Service => TokenKind::Tenant,
        }
    }

    fn check(&self) -> Result<()> {
        match self.spec.password_type {
            AppPasswordType::Personal => {
                if !self.spec.roles.is_empty() {
                    bail!("roles can only be set on service app passwords");
                }
                if self.spec.user.is_some() {
                    bail!("user can only be set on service app passwords");
                }
            }
            AppPasswordType::Service => {
                if self.spec.user.is_none() {
                    bail!("service app password {:?} needs a user", self.spec.name);
                }
            }
        }
        Ok(())
    }

    fn mint(&self, providers: &Providers) -> Result<ApiToken> {
        let client = providers.identity()?;
        match (&self.spec.password_type, &self.spec.user) {
            (AppPasswordType::Service, Some(user)) => {
                let role_ids = client.role_ids(&self.spec.roles)?;
                Ok(client.create_tenant_token(&self.spec.name, user, &role_ids)?)
            }
            _ => Ok(client.create_personal_token(&self.spec.name)?),
        }
    }
}

impl Resource<Providers> for AppPasswordResource {
    fn resource_type(&self) -> &'static str {
        "app_password"
    }

    fn description(&self) -> String {
        format!("{} app password {:?}", self.spec.password_type.as_str(), self.spec.name)
    }

    fn desired(&self) -> ResourceData {
        let mut data = ResourceData::new();
        data.set("name", self.spec.name.as_str());
        data.set("type", self.spec.password_type.as_str());
        data.set_opt("user", self.spec.user.clone());
        data.set_set("roles", self.spec.roles.iter().cloned());
        data
    }

    fn immutable_keys(&self) -> &'static [&'static str] {
        &["name", "type", "user", "roles"]
    }

    fn create(&self, providers: &Providers, data: &mut ResourceData) -> Result<()> {
        self.check()?;
        let token = self.mint(providers)?;

        *data = self.desired();
        data.set_id(token.client_id.as_str());
        if let Some(password) = token.app_password() {
            let password = password?;
            data.set("secret", password.secret_key.as_str());
            data.set("password", password.to_string());
        }
        data.set_opt("created_at", token.created().map(|t| t.to_rfc3339()));
        self.read(providers, data)
    }

    fn read(&self, providers: &Providers, data: &mut ResourceData) -> Result<()> {
        let Some(id) = data.id().map(str::to_string) else {
            return Ok(());
        };
        let client = providers.identity()?;
        let Some(token) = vanished(client.get_token(self.kind(), &id), data, &format!("api token {id}"))?
        else {
            return Ok(());
        };

        data.set_opt("name", token.description.clone());
        data.set_opt("created_at", token.created().map(|t| t.to_rfc3339()));
        if self.kind() == TokenKind::Tenant {
            data.set_opt("user", token.user().map(str::to_string));
            data.set_set("roles", client.role_labels(&token.role_ids, &self.spec.roles)?);
        }
        Ok(())
    }

    fn update(&self, providers: &Providers, _changes: &[String], data: &mut ResourceData) -> Result<()> {
        // Every declared key is immutable.
        self.read(providers, data)
    }

    fn delete(&self, providers: &Providers, data: &mut ResourceData) -> Result<()> {
        if let Some(id) = data.id() {
            providers.identity()?.delete_token(self.kind(), id)?;
        }
        data.clear_id();
        Ok(())
    }
}
