//! Tables fed by a webhook endpoint.
//!
//! `CREATE TABLE <qn> FROM WEBHOOK BODY FORMAT <fmt> [INCLUDE ...] [CHECK (...)]`.
//! Header, header-filter and check clauses keep their declared order since
//! the server derives column order from them.

use crate::catalog::{ObjectParams, lookup_id, object_query};
use crate::ddl::CreateStatement;
use crate::error::{Error, Result};
use crate::executor::Executor;
use crate::object::{IdentifierSchema, MaterializeObject, ObjectType};
use crate::query::{BaseQuery, fetch_one};
use crate::quote::{quote_identifier, quote_string};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BodyFormat {
    Text,
    Json,
    JsonArray,
    Bytes,
}

impl fmt::Display for BodyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "TEXT",
            Self::Json => "JSON",
            Self::JsonArray => "JSON ARRAY",
            Self::Bytes => "BYTES",
        })
    }
}

/// `INCLUDE HEADER 'name' [AS alias] [BYTES]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncludeHeader {
    pub header: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub bytes: bool,
}

/// `INCLUDE HEADERS [('a', NOT 'b')]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncludeHeaders {
    #[serde(default)]
    pub all: bool,
    #[serde(default)]
    pub only: Vec<String>,
    #[serde(default)]
    pub not: Vec<String>,
}

impl IncludeHeaders {
    fn to_sql(&self) -> Option<String> {
        let filters: Vec<String> = self
            .only
            .iter()
            .map(|h| quote_string(h))
            .chain(self.not.iter().map(|h| format!("NOT {}", quote_string(h))))
            .collect();
        if !filters.is_empty() {
            Some(format!("INCLUDE HEADERS ({})", filters.join(", ")))
        } else if self.all {
            Some("INCLUDE HEADERS".to_string())
        } else {
            None
        }
    }
}

/// What a check option exposes to the check expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckField {
    Body,
    Headers,
    Secret(IdentifierSchema),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOption {
    pub field: CheckField,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub bytes: bool,
}

impl CheckOption {
    fn to_sql(&self) -> String {
        let mut sql = match &self.field {
            CheckField::Body => "BODY".to_string(),
            CheckField::Headers => "HEADERS".to_string(),
            CheckField::Secret(secret) => secret.secret_sql(),
        };
        if let Some(alias) = &self.alias {
            sql.push_str(&format!(" AS {}", quote_identifier(alias)));
        }
        if self.bytes {
            sql.push_str(" BYTES");
        }
        sql
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableWebhookConfig {
    pub body_format: BodyFormat,
    #[serde(default)]
    pub include_header: Vec<IncludeHeader>,
    #[serde(default)]
    pub include_headers: Option<IncludeHeaders>,
    #[serde(default)]
    pub check_options: Vec<CheckOption>,
    #[serde(default)]
    pub check_expression: Option<String>,
}

impl TableWebhookConfig {
    pub fn new(body_format: BodyFormat) -> Self {
        Self {
            body_format,
            include_header: Vec::new(),
            include_headers: None,
            check_options: Vec::new(),
            check_expression: None,
        }
    }

    pub fn check(&self) -> Result<()> {
        if !self.check_options.is_empty() && self.check_expression.is_none() {
            return Err(Error::Validation(
                "check_options require a check_expression".to_string(),
            ));
        }
        Ok(())
    }
}

impl CreateStatement for TableWebhookConfig {
    fn create_statement(&self, object: &MaterializeObject) -> String {
        let mut sql = format!(
            "CREATE TABLE {} FROM WEBHOOK BODY FORMAT {}",
            object.qualified_name(),
            self.body_format
        );

        for header in &self.include_header {
            sql.push_str(&format!(" INCLUDE HEADER {}", quote_string(&header.header)));
            if let Some(alias) = &header.alias {
                sql.push_str(&format!(" AS {}", quote_identifier(alias)));
            }
            if header.bytes {
                sql.push_str(" BYTES");
            }
        }

        if let Some(headers) = self.include_headers.as_ref().and_then(IncludeHeaders::to_sql) {
            sql.push(' ');
            sql.push_str(&headers);
        }

        if let Some(expression) = &self.check_expression {
            sql.push_str(" CHECK (");
            if !self.check_options.is_empty() {
                let options: Vec<String> =
                    self.check_options.iter().map(CheckOption::to_sql).collect();
                sql.push_str(&format!("WITH ({}) ", options.join(", ")));
            }
            sql.push_str(&format!("{expression})"));
        }

        sql.push(';');
        sql
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Remote state of a webhook table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableWebhookParams {
    pub object: ObjectParams,
    pub url: Option<String>,
}

/// One column of a table, in position order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumn {
    pub name: String,
    pub column_type: String,
    pub nullable: bool,
}

fn table_query() -> BaseQuery {
    object_query(
        "mz_tables",
        ObjectType::Table,
        &["mz_webhook_sources.url"],
        &["LEFT JOIN mz_internal.mz_webhook_sources\n\tON mz_tables.id = mz_webhook_sources.id"],
    )
}

pub fn table_id(exec: &dyn Executor, object: &MaterializeObject) -> Result<String> {
    lookup_id(exec, &table_query(), "mz_tables", object)
}

pub fn scan_table_webhook(exec: &dyn Executor, id: &str) -> Result<TableWebhookParams> {
    let sql = table_query().query_predicate(&[("mz_tables.id", id)]);
    let row = fetch_one(exec, &sql, &format!("table {id}"))?;
    Ok(TableWebhookParams {
        object: ObjectParams::from_row(&row)?,
        url: row.text("url")?,
    })
}

/// Columns of a table, ordered by position.
pub fn scan_table_columns(exec: &dyn Executor, id: &str) -> Result<Vec<TableColumn>> {
    let sql = BaseQuery::new(
        "SELECT\n\tmz_columns.name,\n\tmz_columns.type,\n\tmz_columns.nullable,\n\tmz_columns.position::int8 AS position\nFROM mz_columns",
    )
    .order("position")
    .query_predicate(&[("mz_columns.id", id)]);

    exec.query(&sql)?
        .iter()
        .map(|row| {
            Ok(TableColumn {
                name: row.required_text("name")?,
                column_type: row.required_text("type")?,
                nullable: row.bool("nullable")?.unwrap_or(true),
            })
        })
        .collect()
}
