//! App password credentials.
//!
//! An app password is `mzp_` followed by the client id and the secret key,
//! each a UUID written as 32 hex digits without dashes.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

pub const PREFIX: &str = "mzp_";

/// Client id and secret key, both as dashed UUID strings.
#[derive(Clone, PartialEq, Eq)]
pub struct AppPassword {
    pub client_id: String,
    pub secret_key: String,
}

impl fmt::Debug for AppPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppPassword")
            .field("client_id", &self.client_id)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

impl AppPassword {
    /// Build from a client id and a secret key in either dashed or plain form.
    pub fn new(client_id: &str, secret_key: &str) -> Result<Self> {
        Ok(Self {
            client_id: dashed_uuid(client_id)?,
            secret_key: dashed_uuid(secret_key)?,
        })
    }

    pub fn parse(value: &str) -> Result<Self> {
        let hex = value
            .trim()
            .strip_prefix(PREFIX)
            .ok_or_else(|| Error::InvalidAppPassword(format!("missing {PREFIX} prefix")))?;
        if hex.len() != 64 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidAppPassword(
                "expected 64 hex digits after the prefix".to_string(),
            ));
        }
        let (client_id, secret_key) = hex.split_at(32);
        Self::new(client_id, secret_key)
    }
}

impl FromStr for AppPassword {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for AppPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{PREFIX}{}{}",
            self.client_id.replace('-', ""),
            self.secret_key.replace('-', "")
        )
    }
}

/// Normalize a UUID to the lowercase 8-4-4-4-12 form.
fn dashed_uuid(value: &str) -> Result<String> {
    let hex: String = value.chars().filter(|c| *c != '-').collect();
    if hex.len() != 32 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::InvalidAppPassword(format!("{value:?} is not a UUID")));
    }
    let hex = hex.to_ascii_lowercase();
    Ok(format!(
        "{}-{}-{}-{}-{}",
        &hex[..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..]
    ))
}
