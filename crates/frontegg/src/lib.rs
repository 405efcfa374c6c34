//! # frontegg
//!
//! Blocking client for the identity-management API behind Materialize:
//! users, app passwords, roles, SCIM groups and configurations, SSO
//! configurations with their domains, group mappings and default roles.
//!
//! Each remote call is one verb function on [`Client`]. Requests go through
//! the [`Transport`] trait so tests can swap in [`mock::MockTransport`].
//!
//! ```
//! use frontegg::Client;
//! use frontegg::mock::MockTransport;
//! use frontegg::transport::Method;
//! use serde_json::json;
//!
//! let transport = MockTransport::new().respond(
//!     Method::Get,
//!     "/identity/resources/roles/v2",
//!     json!({"items": [{"id": "r1", "key": "MaterializePlatformAdmin", "name": "Organization Admin"}]}),
//! );
//! let client = Client::new(transport);
//! assert_eq!(client.role_ids(&["Organization Admin".to_string()])?, vec!["r1"]);
//! # Ok::<(), frontegg::Error>(())
//! ```

pub mod app_password;
pub mod error;
pub mod mock;
pub mod retry;
pub mod roles;
pub mod scim;
pub mod sso;
pub mod tokens;
pub mod transport;
pub mod users;

pub use app_password::AppPassword;
pub use error::{Error, ErrorCategory, Result};
pub use retry::RetryConfig;
pub use transport::{HttpTransport, Method, Transport};

use retry::{LogCallback, with_retry};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

/// Identity API client.
pub struct Client {
    transport: Box<dyn Transport>,
    retry: RetryConfig,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Wrap a transport. Requests are not retried.
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
            retry: RetryConfig::no_retry(),
        }
    }

    /// Authenticate against `endpoint` and retry transient failures with
    /// the default backoff.
    pub fn connect(endpoint: &str, password: &AppPassword) -> Result<Self> {
        let retry = RetryConfig::default();
        let transport = with_retry(&retry, Some(&LogCallback), || {
            HttpTransport::authenticate(endpoint, password)
        })?;
        log::info!("authenticated against {endpoint}");
        Ok(Self {
            transport: Box::new(transport),
            retry,
        })
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Send a request, retrying transient failures.
    pub fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Option<Value>> {
        with_retry(&self.retry, Some(&LogCallback), || {
            self.transport.send(method, path, body)
        })
    }

    /// Send a request whose response body must decode into `T`.
    pub(crate) fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        what: &str,
    ) -> Result<T> {
        transport::decode(self.send(method, path, body)?, what)
    }

    /// Send a request and ignore any response body.
    pub(crate) fn call(&self, method: Method, path: &str, body: Option<&Value>) -> Result<()> {
        self.send(method, path, body).map(|_| ())
    }
}
