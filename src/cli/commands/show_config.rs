//! `--show-config`: the resolved configuration.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;

const MASK: &str = "********";

#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    /// File the configuration was read from; `None` means defaults only.
    pub source: Option<String>,
    pub config: Config,
}

impl ConfigOutput {
    /// Wrap `config` with the API key masked.
    pub fn new(config: &Config, source: Option<PathBuf>) -> Self {
        let mut config = config.clone();
        if config.runtime.anthropic_api.api_key.is_some() {
            config.runtime.anthropic_api.api_key = Some(MASK.to_string());
        }
        Self {
            source: source.map(|p| p.display().to_string()),
            config,
        }
    }
}

impl CommandOutput for ConfigOutput {
    fn to_human(&self) -> String {
        let source = self.source.as_deref().unwrap_or("(defaults)");
        let body = serde_yaml::to_string(&self.config).unwrap_or_default();
        format!("# source: {source}\n{body}")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn execute(config: &Config, source: Option<PathBuf>, json_mode: bool) -> Result<()> {
    output(&ConfigOutput::new(config, source), json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_is_masked() {
        let mut config = Config::default();
        config.runtime.anthropic_api.api_key = Some("sk-ant-api03-secret".to_string());

        let out = ConfigOutput::new(&config, None);
        assert!(!out.to_human().contains("sk-ant-api03-secret"));
        assert_eq!(out.to_json()["config"]["runtime"]["anthropic_api"]["api_key"], MASK);
        assert!(out.to_human().starts_with("# source: (defaults)"));
    }

    #[test]
    fn test_human_output_is_yaml() {
        let out = ConfigOutput::new(&Config::default(), Some(PathBuf::from("/repo/.akatsuki.yaml")));
        let human = out.to_human();
        assert!(human.contains("team: dev"));
        assert!(human.contains("/repo/.akatsuki.yaml"));
    }
}
