//! Catalog query assembly.

use crate::error::{Error, Result};
use crate::executor::{Executor, Row};
use crate::quote::quote_string;

/// A catalog `SELECT` that can be narrowed by equality predicates.
#[derive(Debug, Clone)]
pub struct BaseQuery {
    query: String,
    custom_predicates: Vec<String>,
    order: Option<String>,
}

impl BaseQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            custom_predicates: Vec::new(),
            order: None,
        }
    }

    /// Add raw predicates appended after the equality predicates.
    pub fn custom_predicate(mut self, predicates: &[&str]) -> Self {
        self.custom_predicates
            .extend(predicates.iter().map(|p| (*p).to_string()));
        self
    }

    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    /// Render the query filtered by `column = 'value'` pairs.
    ///
    /// Pairs with an empty value are skipped; the rest keep caller order.
    pub fn query_predicate(&self, predicates: &[(&str, &str)]) -> String {
        let clauses: Vec<String> = predicates
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(column, value)| format!("{column} = {}", quote_string(value)))
            .chain(self.custom_predicates.iter().cloned())
            .collect();

        let mut sql = self.query.trim_end().to_string();
        if !clauses.is_empty() {
            sql.push_str("\nWHERE ");
            sql.push_str(&clauses.join("\nAND "));
        }
        if let Some(order) = &self.order {
            sql.push_str("\nORDER BY ");
            sql.push_str(order);
        }
        sql.push(';');
        sql
    }
}

/// Run a query that must return exactly one row.
pub fn fetch_one(exec: &dyn Executor, sql: &str, what: &str) -> Result<Row> {
    let mut rows = exec.query(sql)?;
    match rows.len() {
        0 => Err(Error::NotFound {
            object: what.to_string(),
        }),
        1 => Ok(rows.remove(0)),
        n => Err(Error::AmbiguousResult {
            object: what.to_string(),
            rows: n,
        }),
    }
}
