//! The SQL execution capability consumed by builders and scanners.
//!
//! Everything above this module speaks in statement text and decoded
//! [`Row`]s; the driver behind [`Executor`] is swappable (a live
//! connection in [`crate::pg`], a recorder in [`crate::mock`]).

use crate::error::{Error, Result};

/// Run statements and queries against the database.
pub trait Executor {
    /// Execute a statement, returning the number of affected rows.
    fn execute(&self, statement: &str) -> Result<u64>;

    /// Run a query and decode every returned row.
    fn query(&self, statement: &str) -> Result<Vec<Row>>;
}

impl<T: Executor + ?Sized> Executor for Box<T> {
    fn execute(&self, statement: &str) -> Result<u64> {
        (**self).execute(statement)
    }

    fn query(&self, statement: &str) -> Result<Vec<Row>> {
        (**self).query(statement)
    }
}

impl<T: Executor + ?Sized> Executor for &T {
    fn execute(&self, statement: &str) -> Result<u64> {
        (**self).execute(statement)
    }

    fn query(&self, statement: &str) -> Result<Vec<Row>> {
        (**self).query(statement)
    }
}

/// A single decoded column value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Null,
    Text(String),
    Bool(bool),
    Int(i64),
    TextList(Vec<String>),
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<Vec<String>> for Cell {
    fn from(value: Vec<String>) -> Self {
        Self::TextList(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// A row of named columns, in select-list order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    columns: Vec<(String, Cell)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style column append.
    pub fn with(mut self, name: impl Into<String>, cell: impl Into<Cell>) -> Self {
        self.push(name, cell);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, cell: impl Into<Cell>) {
        self.columns.push((name.into(), cell.into()));
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Look up a column by name.
    pub fn get(&self, name: &str) -> Result<&Cell> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, cell)| cell)
            .ok_or_else(|| Error::decode(name, "column missing from result"))
    }

    /// Nullable text column.
    pub fn text(&self, name: &str) -> Result<Option<String>> {
        match self.get(name)? {
            Cell::Null => Ok(None),
            Cell::Text(value) => Ok(Some(value.clone())),
            other => Err(Error::decode(name, format!("expected text, got {other:?}"))),
        }
    }

    /// Text column that must not be null.
    pub fn required_text(&self, name: &str) -> Result<String> {
        self.text(name)?
            .ok_or_else(|| Error::decode(name, "unexpected NULL"))
    }

    pub fn bool(&self, name: &str) -> Result<Option<bool>> {
        match self.get(name)? {
            Cell::Null => Ok(None),
            Cell::Bool(value) => Ok(Some(*value)),
            other => Err(Error::decode(name, format!("expected bool, got {other:?}"))),
        }
    }

    pub fn int(&self, name: &str) -> Result<Option<i64>> {
        match self.get(name)? {
            Cell::Null => Ok(None),
            Cell::Int(value) => Ok(Some(*value)),
            other => Err(Error::decode(name, format!("expected integer, got {other:?}"))),
        }
    }

    pub fn text_list(&self, name: &str) -> Result<Option<Vec<String>>> {
        match self.get(name)? {
            Cell::Null => Ok(None),
            Cell::TextList(value) => Ok(Some(value.clone())),
            other => Err(Error::decode(name, format!("expected text[], got {other:?}"))),
        }
    }
}
