//! Error types for statement execution and catalog reads.
//!
//! Errors are categorized so reconciliation drivers can tell an object
//! that vanished remotely apart from a statement that actually failed.

use std::fmt;

/// Result type alias for SQL operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of SQL errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// A lookup matched no rows.
    NotFound,
    /// A lookup that must be unique matched several rows.
    Ambiguous,
    /// Caller-supplied configuration is structurally invalid.
    Validation,
    /// The remote system rejected or failed a statement.
    Remote,
    /// A row could not be decoded into the expected shape.
    Decode,
    /// The connection could not be established or was lost.
    Connection,
}

impl ErrorCategory {
    /// Whether this error category is typically transient and worth retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection)
    }

    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::NotFound => "Object not found",
            Self::Ambiguous => "Ambiguous catalog result",
            Self::Validation => "Invalid configuration",
            Self::Remote => "Statement failed",
            Self::Decode => "Unexpected catalog row",
            Self::Connection => "Connection failure",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::NotFound => "The object may have been dropped outside of mzprov",
            Self::Ambiguous => "Check the catalog for duplicate objects with the same name",
            Self::Validation => "Fix the resource definition and try again",
            Self::Remote => "Check the statement and the privileges of the connecting role",
            Self::Decode => "The server version may not be supported",
            Self::Connection => "Check the SQL host, port and credentials",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur while building, executing or scanning statements.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A read-by-id or lookup query returned zero rows.
    #[error("{object} not found")]
    NotFound {
        /// Description of what was looked up.
        object: String,
    },

    /// A query that must match a single object returned several rows.
    #[error("expected a single row for {object}, got {rows}")]
    AmbiguousResult {
        /// Description of what was looked up.
        object: String,
        /// Number of rows returned.
        rows: usize,
    },

    /// Configuration rejected before any statement was issued.
    #[error("invalid configuration: {0}")]
    Validation(String),

    /// The remote system failed a statement.
    #[error("statement failed: {message}")]
    Execution {
        /// The statement text that failed.
        statement: String,
        /// Error message reported by the server or driver.
        message: String,
    },

    /// A column was missing or held an unexpected type.
    #[error("cannot decode column {column}: {message}")]
    Decode {
        /// Column name.
        column: String,
        /// What went wrong.
        message: String,
    },

    /// Connecting to the server failed.
    #[error("cannot connect to {host}: {message}")]
    Connection {
        /// Target host.
        host: String,
        /// Error message.
        message: String,
    },
}

impl Error {
    /// Create an execution error for a statement.
    pub fn execution(statement: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Execution {
            statement: statement.into(),
            message: message.to_string(),
        }
    }

    /// Create a decode error for a column.
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::NotFound { .. } => ErrorCategory::NotFound,
            Error::AmbiguousResult { .. } => ErrorCategory::Ambiguous,
            Error::Validation(_) => ErrorCategory::Validation,
            Error::Execution { .. } => ErrorCategory::Remote,
            Error::Decode { .. } => ErrorCategory::Decode,
            Error::Connection { .. } => ErrorCategory::Connection,
        }
    }

    /// Whether the object this error refers to no longer exists.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.category() == ErrorCategory::NotFound
    }

    /// Whether this error is typically transient and worth retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }
}
