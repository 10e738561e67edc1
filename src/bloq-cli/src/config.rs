//! Configuration management for bloq
//!
//! A configuration file (TOML or JSON) provides defaults for execution,
//! logging and variables. Command-line options are merged on top.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use bloq_query::{ErrorMode, ExecutorConfig, Value, Variables};
use serde::{Deserialize, Serialize};

use crate::cli::{parse_var, Cli};

/// Main configuration structure for the bloq runtime
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Batch execution configuration
    pub executor: ExecutorSection,
    /// Debug and logging configuration
    pub debug: DebugConfig,
    /// Variables available to `var`
    pub variables: HashMap<String, serde_json::Value>,
}

/// Batch execution configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorSection {
    /// How failing records are handled
    pub error_mode: ErrorMode,
    /// Whether to collect execution statistics
    pub collect_stats: bool,
}

/// Debug configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Verbosity level
    pub verbosity: u8,
}

impl Config {
    /// Load configuration from a TOML or JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");
        let config = match extension {
            "toml" => toml::from_str(&content)
                .with_context(|| format!("invalid TOML config {}", path.display()))?,
            "json" => serde_json::from_str(&content)
                .with_context(|| format!("invalid JSON config {}", path.display()))?,
            other => bail!("unsupported config file format '{}'", other),
        };
        Ok(config)
    }

    /// Apply command-line overrides
    pub fn apply_cli(&mut self, cli: &Cli) -> Result<()> {
        self.debug.verbosity = self.debug.verbosity.max(cli.verbose);
        if let Some(mode) = cli.error_mode {
            self.executor.error_mode = mode.into();
        }
        if cli.stats {
            self.executor.collect_stats = true;
        }
        for raw in &cli.vars {
            let (name, value) =
                parse_var(raw).ok_or_else(|| anyhow!("invalid variable '{}', expected NAME=VALUE", raw))?;
            let value = serde_json::from_str(value)
                .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
            self.variables.insert(name.to_string(), value);
        }
        Ok(())
    }

    /// Variables converted to runtime values
    pub fn variables(&self) -> Variables {
        self.variables
            .iter()
            .map(|(k, v)| (k.clone(), Value::from_json(v.clone())))
            .collect()
    }

    /// Build the executor configuration
    pub fn executor_config(&self) -> ExecutorConfig {
        ExecutorConfig {
            error_mode: self.executor.error_mode,
            collect_stats: self.executor.collect_stats,
            variables: self.variables(),
        }
    }

    /// Log level for the configured verbosity
    pub fn log_level(&self) -> log::LevelFilter {
        match self.debug.verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::Builder;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.executor.error_mode, ErrorMode::Strict);
        assert!(!config.executor.collect_stats);
        assert_eq!(config.log_level(), log::LevelFilter::Warn);
    }

    #[test]
    fn test_load_toml() {
        let file = write_temp(
            ".toml",
            r#"
[executor]
error_mode = "collect"

[debug]
verbosity = 2

[variables]
region = "eu"
limit = 10
"#,
        );
        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.executor.error_mode, ErrorMode::Collect);
        assert_eq!(config.log_level(), log::LevelFilter::Debug);

        let vars = config.variables();
        assert_eq!(vars.get("region"), Some(&Value::string("eu")));
        assert_eq!(vars.get("limit"), Some(&Value::Int(10)));
    }

    #[test]
    fn test_load_json_partial() {
        let file = write_temp(".json", r#"{"executor": {"collect_stats": true}}"#);
        let config = Config::load_from_file(file.path()).unwrap();
        assert!(config.executor.collect_stats);
        assert_eq!(config.executor.error_mode, ErrorMode::Strict);
    }

    #[test]
    fn test_load_rejects_unknown_format() {
        let file = write_temp(".ini", "x=1");
        assert!(Config::load_from_file(file.path()).is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from([
            "bloq",
            "q.toml",
            "--var",
            "n=5",
            "--var",
            "name=alice",
            "--error-mode",
            "ignore",
            "-vvv",
        ])
        .unwrap();
        let mut config = Config::default();
        config.apply_cli(&cli).unwrap();

        assert_eq!(config.executor.error_mode, ErrorMode::Ignore);
        assert_eq!(config.log_level(), log::LevelFilter::Trace);
        let vars = config.executor_config().variables;
        assert_eq!(vars.get("n"), Some(&Value::Int(5)));
        assert_eq!(vars.get("name"), Some(&Value::string("alice")));
    }

    #[test]
    fn test_cli_rejects_bad_var() {
        let cli = Cli::try_parse_from(["bloq", "q.toml", "--var", "novalue"]).unwrap();
        assert!(Config::default().apply_cli(&cli).is_err());
    }
}
