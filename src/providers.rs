//! The remote capabilities every driver runs against.

use anyhow::{Context, Result, anyhow};
use frontegg::AppPassword;
use mzsql::Executor;
use mzsql::pg::PgExecutor;

use crate::config::ProviderConfig;

/// SQL executor and identity client, plus the region used to prefix ids.
///
/// Either side may be absent; a driver that needs a missing side fails
/// when it first asks for it.
pub struct Providers {
    region: String,
    sql: Option<Box<dyn Executor>>,
    identity: Option<frontegg::Client>,
}

impl std::fmt::Debug for Providers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Providers")
            .field("region", &self.region)
            .field("sql", &self.sql.is_some())
            .field("identity", &self.identity)
            .finish()
    }
}

impl Providers {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            sql: None,
            identity: None,
        }
    }

    pub fn with_sql(mut self, exec: impl Executor + 'static) -> Self {
        self.sql = Some(Box::new(exec));
        self
    }

    pub fn with_identity(mut self, client: frontegg::Client) -> Self {
        self.identity = Some(client);
        self
    }

    /// Open whatever the config and password allow.
    ///
    /// The SQL side needs a `[sql]` table; the identity side needs an app
    /// password. Neither is opened when absent.
    pub fn connect(config: &ProviderConfig, password: Option<&str>) -> Result<Self> {
        let mut providers = Self::new(config.region.clone());

        if let Some(sql) = &config.sql {
            let exec = PgExecutor::connect(&sql.connect_options(password))
                .with_context(|| format!("Failed to connect to {}:{}", sql.host, sql.port))?;
            providers = providers.with_sql(exec);
        }

        if let Some(password) = password {
            let app_password =
                AppPassword::parse(password).context("MZ_PASSWORD is not a valid app password")?;
            let client = frontegg::Client::connect(&config.endpoint, &app_password)
                .with_context(|| format!("Failed to authenticate against {}", config.endpoint))?;
            providers = providers.with_identity(client);
        }

        Ok(providers)
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn sql(&self) -> Result<&dyn Executor> {
        self.sql
            .as_deref()
            .ok_or_else(|| anyhow!("No SQL connection configured (add a [sql] table to the config)"))
    }

    pub fn identity(&self) -> Result<&frontegg::Client> {
        self.identity
            .as_ref()
            .ok_or_else(|| anyhow!("No identity client configured (set MZ_PASSWORD)"))
    }
}
