//! Console configuration: where the GraphQL endpoint lives and where the
//! session is kept between runs.
//!
//! Resolution order, later wins: built-in defaults, `convene.toml` in the
//! config directory (or an explicit path), then `CONVENE_*` environment
//! variables. Command-line flags are layered on top by the binary.

pub mod dirs;
pub mod error;
pub mod loader;

pub use {
    dirs::{config_dir, default_config_path, default_session_path},
    error::{Error, Result},
    loader::{ENDPOINT_ENV, load_config, load_config_from, parse_config},
};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Development backend used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8483/graphql/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// GraphQL endpoint every operation is POSTed to.
    pub endpoint: String,
    /// Session file. Defaults to `session.json` next to the config file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<PathBuf>,
    /// HTTP(S) proxy for outbound calls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
    pub user_agent: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            storage_path: None,
            proxy: None,
            user_agent: format!("convene/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ConsoleConfig {
    pub fn session_path(&self) -> PathBuf {
        self.storage_path.clone().unwrap_or_else(default_session_path)
    }

    /// Check that the endpoint is an absolute http(s) URL.
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.endpoint).map_err(|source| Error::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            source,
        })?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(Error::message(format!(
                "endpoint {} uses unsupported scheme {other}",
                self.endpoint
            ))),
        }
    }
}
