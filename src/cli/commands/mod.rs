//! CLI command implementations.

pub mod list;
pub mod run;
pub mod show_config;

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::cli::types::Cli;
use crate::domain::models::Config;
use crate::infrastructure::config::{find_config, ConfigLoader};

/// The config file this invocation reads, if any.
pub fn config_path(cli: &Cli) -> Option<PathBuf> {
    cli.config.clone().or_else(|| {
        std::env::current_dir()
            .ok()
            .and_then(|cwd| find_config(&cwd))
    })
}

/// Load the configuration named by `--config`, or the nearest `.akatsuki.yaml`.
pub fn load_config(cli: &Cli) -> Result<Config> {
    match config_path(cli) {
        Some(path) => ConfigLoader::load_from_file(&path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => ConfigLoader::load().context("Failed to load configuration"),
    }
}

/// Run whatever `cli` asks for.
pub async fn execute(cli: &Cli, config: &Config) -> Result<()> {
    if cli.list {
        return list::execute(cli.json);
    }
    if cli.show_config {
        return show_config::execute(config, config_path(cli), cli.json);
    }
    run::execute(cli, config).await
}
