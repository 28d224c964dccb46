//! Client configuration.
//!
//! A `ClientConfig` can be read from TOML or from `TW_*` environment
//! variables and turned into a client with `TouchwoodClient::from_config`.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TouchwoodError};
use crate::transport::RequestOptions;

pub const ENV_API_SERVER: &str = "TW_API_SERVER";
pub const ENV_ACCESS_TOKEN: &str = "TW_ACCESS_TOKEN";
pub const ENV_API_VERSION: &str = "TW_API_VERSION";
pub const ENV_VERIFY_TLS: &str = "TW_VERIFY_TLS";
pub const ENV_TIMEOUT_SECS: &str = "TW_TIMEOUT_SECS";
pub const ENV_SESSION_ID: &str = "TW_SESSION_ID";

/// Connection settings for a Touchwood server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server URL, e.g. `https://shop.example`.
    pub api_server: String,

    #[serde(default)]
    pub access_token: Option<String>,

    /// Path segment placed before every endpoint path. Empty by default.
    #[serde(default)]
    pub api_version: String,

    /// Extra headers sent with every request.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    #[serde(default = "default_true")]
    pub verify_tls: bool,

    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Session cookie to resume an existing cart.
    #[serde(default)]
    pub session_id: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_server: String::new(),
            access_token: None,
            api_version: String::new(),
            headers: BTreeMap::new(),
            verify_tls: true,
            timeout_secs: None,
            session_id: None,
        }
    }
}

impl ClientConfig {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).map_err(|e| TouchwoodError::Config(e.to_string()))
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`, which maps a `TW_*`
    /// variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_server = non_empty(ENV_API_SERVER)
            .ok_or_else(|| TouchwoodError::Config(format!("{ENV_API_SERVER} is not set")))?;

        let verify_tls = match non_empty(ENV_VERIFY_TLS) {
            None => true,
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                TouchwoodError::Config(format!("{ENV_VERIFY_TLS} is not a boolean: {raw}"))
            })?,
        };

        let timeout_secs = non_empty(ENV_TIMEOUT_SECS)
            .map(|raw| {
                raw.trim().parse::<u64>().map_err(|e| {
                    TouchwoodError::Config(format!("{ENV_TIMEOUT_SECS} is invalid: {e}"))
                })
            })
            .transpose()?;

        Ok(Self {
            api_server,
            access_token: non_empty(ENV_ACCESS_TOKEN),
            api_version: non_empty(ENV_API_VERSION).unwrap_or_default(),
            headers: BTreeMap::new(),
            verify_tls,
            timeout_secs,
            session_id: non_empty(ENV_SESSION_ID),
        })
    }

    pub fn request_options(&self) -> RequestOptions {
        RequestOptions {
            verify_tls: self.verify_tls,
            timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
