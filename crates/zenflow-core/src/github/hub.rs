//! Hub credentials stored in git config.
//!
//! Settings for the default hub use `zenflow.{key}`; other hubs use
//! `zenflow.hub.{hub}.{key}`. They are only read here.

use crate::error::Result;
use crate::exec::{ExecutionContext, RunOptions};
use crate::repo::DEFAULT_HUB;

/// API base url used when none is configured.
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// User agent prefix used when none is configured.
pub const DEFAULT_USER_AGENT_BASE: &str = "Zencoder";

const API_BASE_URL_KEY: &str = "api.base.url";
const TOKEN_KEY: &str = "token";
const USER_AGENT_BASE_KEY: &str = "user.agent.base";

/// Connection settings for one hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubSettings {
    /// Hub host name.
    pub hub: String,
    /// API root, e.g. `https://api.github.com`.
    pub api_base_url: String,
    /// OAuth token, if one was stored.
    pub token: Option<String>,
    /// Prefix of the `User-Agent` header.
    pub user_agent_base: String,
}

impl HubSettings {
    /// Git config key for `key` on `hub`.
    pub fn config_key(hub: &str, key: &str) -> String {
        if hub == DEFAULT_HUB {
            format!("zenflow.{key}")
        } else {
            format!("zenflow.hub.{hub}.{key}")
        }
    }

    /// Reads the settings for `hub` with `git config --get`.
    pub fn load(exec: &ExecutionContext, hub: &str) -> Result<Self> {
        let get = |key: &str| -> Result<Option<String>> {
            let value = exec.run(
                &format!("git config --get {}", Self::config_key(hub, key)),
                RunOptions::silent(),
            )?;
            let value = value.trim();
            Ok((!value.is_empty()).then(|| value.to_string()))
        };

        Ok(Self {
            hub: hub.to_string(),
            api_base_url: get(API_BASE_URL_KEY)?
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            token: get(TOKEN_KEY)?,
            user_agent_base: get(USER_AGENT_BASE_KEY)?
                .unwrap_or_else(|| DEFAULT_USER_AGENT_BASE.to_string()),
        })
    }

    /// `User-Agent` header value.
    pub fn user_agent(&self) -> String {
        format!("{}/Zenflow-{}", self.user_agent_base, env!("CARGO_PKG_VERSION"))
    }
}
