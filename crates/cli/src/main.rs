//! `convene`: command-line client for the event console backend.

mod app;
mod commands;

use std::path::PathBuf;

use {
    anyhow::{Context, Result},
    clap::Parser,
    convene_config::{ConsoleConfig, default_config_path, load_config_from},
};

use crate::{app::App, commands::Command};

/// Talk to a Convene events backend from the terminal.
///
/// The session token is kept in a local file between runs, so `login`
/// once and the other commands reuse it.
#[derive(Parser, Debug)]
#[command(name = "convene", version)]
struct Cli {
    /// GraphQL endpoint. Overrides the config file.
    #[arg(long, env = "CONVENE_ENDPOINT", global = true)]
    endpoint: Option<String>,

    /// Config file (default: ~/.config/convene/convene.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Session file. Overrides the config file.
    #[arg(long, env = "CONVENE_SESSION", global = true)]
    session: Option<PathBuf>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn resolve_config(&self) -> Result<ConsoleConfig> {
        let path = self.config.clone().unwrap_or_else(default_config_path);
        let mut config = load_config_from(&path, |key| std::env::var(key).ok())
            .with_context(|| format!("failed to load config from {}", path.display()))?;
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(session) = &self.session {
            config.storage_path = Some(session.clone());
        }
        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    tracing::debug!(endpoint = %config.endpoint, session = %config.session_path().display(), "starting");

    let app = App::from_config(&config)?;
    let report = commands::execute(&app, cli.command, cli.json).await?;
    if !report.is_empty() {
        println!("{report}");
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use {super::*, clap::CommandFactory};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn endpoint_flag_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::parse_from([
            "convene",
            "--config",
            &dir.path().join("absent.toml").display().to_string(),
            "--endpoint",
            "https://events.example.org/graphql/",
            "status",
        ]);
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.endpoint, "https://events.example.org/graphql/");
    }
}
