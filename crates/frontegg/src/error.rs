//! Error types for identity API operations.

use std::fmt;

/// Result type alias for identity API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of identity API errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Network or server-side failure that may succeed on retry.
    Network,
    /// The addressed entity does not exist.
    NotFound,
    /// Credentials were rejected.
    Auth,
    /// The request was rejected for another reason.
    Rejected,
    /// The response could not be understood.
    Format,
    /// The caller supplied an invalid combination of values.
    Validation,
    /// Other errors.
    Other,
}

impl ErrorCategory {
    /// Whether this error category is typically transient and worth retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network)
    }

    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "Network error",
            Self::NotFound => "Not found",
            Self::Auth => "Authentication failed",
            Self::Rejected => "Request rejected",
            Self::Format => "Invalid response",
            Self::Validation => "Invalid configuration",
            Self::Other => "Error",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Network => "Check your network connection and the endpoint setting",
            Self::NotFound => "The entity may have been deleted outside of mzprov",
            Self::Auth => "Check that MZ_PASSWORD holds a valid app password",
            Self::Rejected => "Check the request values and the privileges of the app password",
            Self::Format => "The identity API returned an unexpected payload",
            Self::Validation => "Fix the resource definition and try again",
            Self::Other => "Check the error message for details",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur during identity API operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// The server answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The addressed entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Credentials were rejected.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The response body was not what the call expects.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Rejected before any request was issued.
    #[error("invalid configuration: {0}")]
    Validation(String),

    /// The app password could not be parsed.
    #[error("invalid app password: {0}")]
    InvalidAppPassword(String),

    /// Other errors.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Http { status, .. } if *status == 429 || *status >= 500 => {
                ErrorCategory::Network
            }
            Error::Http { .. } => ErrorCategory::Rejected,
            Error::Network(_) => ErrorCategory::Network,
            Error::NotFound(_) => ErrorCategory::NotFound,
            Error::Auth(_) | Error::InvalidAppPassword(_) => ErrorCategory::Auth,
            Error::InvalidResponse(_) => ErrorCategory::Format,
            Error::Validation(_) => ErrorCategory::Validation,
            Error::Other(_) => ErrorCategory::Other,
        }
    }

    /// Whether this error is typically transient and worth retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(404) => Self::NotFound("HTTP 404".to_string()),
            ureq::Error::StatusCode(code @ (401 | 403)) => Self::Auth(format!("HTTP {code}")),
            ureq::Error::StatusCode(code) => Self::Http {
                status: code,
                message: format!("HTTP {code}"),
            },
            ureq::Error::Io(e) => Self::Network(e.to_string()),
            ureq::Error::Timeout(t) => Self::Network(format!("timeout: {t}")),
            ureq::Error::HostNotFound => Self::Network("host not found".to_string()),
            ureq::Error::ConnectionFailed => Self::Network("connection failed".to_string()),
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}
