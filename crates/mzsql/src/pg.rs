//! Live executor over the `postgres` wire protocol.

use crate::error::{Error, Result};
use crate::executor::{Cell, Executor, Row};
use openssl::ssl::{SslConnector, SslMethod};
use postgres::types::Type;
use postgres::{Client, NoTls, SimpleQueryMessage};
use postgres_openssl::MakeTlsConnector;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Transport security for the SQL connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SslMode {
    Disable,
    #[default]
    Require,
}

/// Connection parameters for [`PgExecutor::connect`].
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub database: String,
    pub sslmode: SslMode,
    pub application_name: String,
}

impl ConnectOptions {
    fn to_config(&self) -> postgres::Config {
        let mut config = postgres::Config::new();
        config
            .host(&self.host)
            .port(self.port)
            .user(&self.user)
            .dbname(&self.database)
            .application_name(&self.application_name);
        if let Some(password) = &self.password {
            config.password(password);
        }
        config.ssl_mode(match self.sslmode {
            SslMode::Disable => postgres::config::SslMode::Disable,
            SslMode::Require => postgres::config::SslMode::Require,
        });
        config
    }

    fn connection_error(&self, message: impl ToString) -> Error {
        Error::Connection {
            host: format!("{}:{}", self.host, self.port),
            message: message.to_string(),
        }
    }
}

/// Executor backed by a single blocking client.
pub struct PgExecutor {
    client: Mutex<Client>,
}

impl PgExecutor {
    /// Open a connection.
    pub fn connect(options: &ConnectOptions) -> Result<Self> {
        log::debug!(
            "Connecting to {}:{} as {} (sslmode {:?})",
            options.host,
            options.port,
            options.user,
            options.sslmode
        );
        let config = options.to_config();
        let client = match options.sslmode {
            SslMode::Disable => config
                .connect(NoTls)
                .map_err(|e| options.connection_error(e))?,
            SslMode::Require => {
                let builder = SslConnector::builder(SslMethod::tls())
                    .map_err(|e| options.connection_error(e))?;
                let connector = MakeTlsConnector::new(builder.build());
                config
                    .connect(connector)
                    .map_err(|e| options.connection_error(e))?
            }
        };
        Ok(Self {
            client: Mutex::new(client),
        })
    }

    fn with_client<T>(
        &self,
        statement: &str,
        f: impl FnOnce(&mut Client) -> std::result::Result<T, postgres::Error>,
    ) -> Result<T> {
        let mut client = self
            .client
            .lock()
            .map_err(|_| Error::execution(statement, "connection lock poisoned"))?;
        f(&mut client).map_err(|e| Error::execution(statement, server_message(&e)))
    }
}

impl std::fmt::Debug for PgExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgExecutor").finish_non_exhaustive()
    }
}

impl Executor for PgExecutor {
    fn execute(&self, statement: &str) -> Result<u64> {
        log::debug!("Executing: {statement}");
        let messages = self.with_client(statement, |client| client.simple_query(statement))?;
        Ok(messages
            .iter()
            .map(|message| match message {
                SimpleQueryMessage::CommandComplete(rows) => *rows,
                _ => 0,
            })
            .sum())
    }

    fn query(&self, statement: &str) -> Result<Vec<Row>> {
        log::debug!("Querying: {statement}");
        let rows = self.with_client(statement, |client| client.query(statement, &[]))?;
        rows.iter().map(decode_row).collect()
    }
}

/// Prefer the server's own message over the driver's wrapper text.
fn server_message(err: &postgres::Error) -> String {
    err.as_db_error()
        .map_or_else(|| err.to_string(), |db| db.message().to_string())
}

fn decode_row(row: &postgres::Row) -> Result<Row> {
    let mut decoded = Row::new();
    for (idx, column) in row.columns().iter().enumerate() {
        let name = column.name();
        let ty = column.type_();
        let decode_err = |e: postgres::Error| Error::decode(name, e.to_string());

        let cell = if *ty == Type::BOOL {
            Cell::from(row.try_get::<_, Option<bool>>(idx).map_err(decode_err)?)
        } else if *ty == Type::INT8 {
            Cell::from(row.try_get::<_, Option<i64>>(idx).map_err(decode_err)?)
        } else if *ty == Type::INT4 {
            Cell::from(
                row.try_get::<_, Option<i32>>(idx)
                    .map_err(decode_err)?
                    .map(i64::from),
            )
        } else if *ty == Type::INT2 {
            Cell::from(
                row.try_get::<_, Option<i16>>(idx)
                    .map_err(decode_err)?
                    .map(i64::from),
            )
        } else if *ty == Type::TEXT_ARRAY {
            Cell::from(row.try_get::<_, Option<Vec<String>>>(idx).map_err(decode_err)?)
        } else {
            Cell::from(row.try_get::<_, Option<String>>(idx).map_err(decode_err)?)
        };
        decoded.push(name, cell);
    }
    Ok(decoded)
}
