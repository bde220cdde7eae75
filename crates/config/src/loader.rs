use std::{fs, path::Path};

use tracing::debug;

use crate::{ConsoleConfig, default_config_path, error::Result};

/// Overrides `endpoint`.
pub const ENDPOINT_ENV: &str = "CONVENE_ENDPOINT";
/// Overrides `storage_path`.
pub const SESSION_ENV: &str = "CONVENE_SESSION";
/// Overrides `proxy`.
pub const PROXY_ENV: &str = "CONVENE_PROXY";

/// Load from the default location and the process environment.
pub fn load_config() -> Result<ConsoleConfig> {
    load_config_from(&default_config_path(), |key| std::env::var(key).ok())
}

/// Load `path` (missing file means defaults), then apply overrides from
/// `env`. The result is validated.
pub fn load_config_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ConsoleConfig> {
    let mut config = if path.exists() {
        debug!(path = %path.display(), "loading config");
        parse_config(&fs::read_to_string(path)?)?
    } else {
        debug!(path = %path.display(), "no config file, using defaults");
        ConsoleConfig::default()
    };
    apply_env(&mut config, env);
    config.validate()?;
    Ok(config)
}

pub fn parse_config(data: &str) -> Result<ConsoleConfig> {
    Ok(toml::from_str(data)?)
}

fn apply_env(config: &mut ConsoleConfig, env: impl Fn(&str) -> Option<String>) {
    let non_empty = |key: &str| env(key).filter(|v| !v.trim().is_empty());
    if let Some(endpoint) = non_empty(ENDPOINT_ENV) {
        config.endpoint = endpoint;
    }
    if let Some(path) = non_empty(SESSION_ENV) {
        config.storage_path = Some(path.into());
    }
    if let Some(proxy) = non_empty(PROXY_ENV) {
        config.proxy = Some(proxy);
    }
}
