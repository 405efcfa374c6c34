//! JSON transport to the identity API.
//!
//! Every remote call goes through [`Transport::send`], so the verb functions
//! in this crate stay independent of the HTTP client. [`HttpTransport`] is
//! the `ureq` implementation; [`crate::mock::MockTransport`] records calls
//! for tests.

use crate::app_password::AppPassword;
use crate::error::{Error, Result};
use serde::Deserialize;
use serde_json::{Value, json};
use std::fmt;

pub const AUTH_API_TOKEN_PATH: &str = "/identity/resources/auth/v1/api-token";

/// Default identity API base URL.
pub const DEFAULT_ENDPOINT: &str = "https://admin.cloud.materialize.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sends one authenticated JSON request.
///
/// `path` is relative to the API endpoint. An empty response body yields
/// `Ok(None)`.
pub trait Transport {
    fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Option<Value>>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Option<Value>> {
        (**self).send(method, path, body)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiTokenResponse {
    access_token: String,
}

/// `ureq` transport holding a bearer token.
pub struct HttpTransport {
    agent: ureq::Agent,
    endpoint: String,
    token: String,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Exchange an app password for an access token.
    pub fn authenticate(endpoint: &str, password: &AppPassword) -> Result<Self> {
        let agent = ureq::Agent::new_with_defaults();
        let endpoint = endpoint.trim_end_matches('/').to_string();
        let url = format!("{endpoint}{AUTH_API_TOKEN_PATH}");

        log::debug!("POST {url}");
        let response: ApiTokenResponse = agent
            .post(&url)
            .header("Accept", "application/json")
            .send_json(json!({
                "clientId": password.client_id,
                "secret": password.secret_key,
            }))
            .map_err(|e| match Error::from(e) {
                Error::NotFound(_) => Error::Auth("app password not recognized".to_string()),
                other => other,
            })?
            .body_mut()
            .read_json()?;

        Ok(Self {
            agent,
            endpoint,
            token: response.access_token,
        })
    }

    /// Use an already minted access token.
    #[must_use]
    pub fn with_token(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl Transport for HttpTransport {
    fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Option<Value>> {
        let url = format!("{}{path}", self.endpoint);
        log::debug!("{method} {url}");

        let bearer = self.bearer();
        let result = match (method, body) {
            (Method::Get, _) => self
                .agent
                .get(&url)
                .header("Authorization", &bearer)
                .header("Accept", "application/json")
                .call(),
            (Method::Delete, None) => self
                .agent
                .delete(&url)
                .header("Authorization", &bearer)
                .call(),
            (Method::Delete, Some(body)) => self
                .agent
                .delete(&url)
                .header("Authorization", &bearer)
                .force_send_body()
                .send_json(body),
            (Method::Post, body) => self
                .agent
                .post(&url)
                .header("Authorization", &bearer)
                .send_json(body.unwrap_or(&Value::Null)),
            (Method::Put, body) => self
                .agent
                .put(&url)
                .header("Authorization", &bearer)
                .send_json(body.unwrap_or(&Value::Null)),
            (Method::Patch, body) => self
                .agent
                .patch(&url)
                .header("Authorization", &bearer)
                .send_json(body.unwrap_or(&Value::Null)),
        };

        let mut response = result.map_err(|e| match Error::from(e) {
            Error::NotFound(_) => Error::NotFound(path.to_string()),
            other => other,
        })?;

        let text = response.body_mut().read_to_string()?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&text)?))
    }
}

/// Decode a response body that must be present.
pub(crate) fn decode<T: serde::de::DeserializeOwned>(
    value: Option<Value>,
    what: &str,
) -> Result<T> {
    let value = value.ok_or_else(|| Error::InvalidResponse(format!("empty {what} response")))?;
    serde_json::from_value(value).map_err(|e| Error::InvalidResponse(format!("{what}: {e}")))
}

/// Percent-encode a path segment.
pub(crate) fn segment(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            out.push(char::from(byte));
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}
