use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub vault: VaultConfig,
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Connection settings for the project-scoped secret vault.
#[derive(Debug, Clone, Deserialize)]
pub struct VaultConfig {
    #[serde(default = "default_vault_base_url")]
    pub base_url: String,
    #[serde(default = "default_vault_project")]
    pub project: String,
    #[serde(default = "default_vault_environment")]
    pub environment: String,
    /// Bearer token for the vault API. Falls back to the VAULT_TOKEN
    /// environment variable when not set here.
    pub token: Option<String>,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            base_url: default_vault_base_url(),
            project: default_vault_project(),
            environment: default_vault_environment(),
            token: None,
        }
    }
}

fn default_vault_base_url() -> String {
    "http://127.0.0.1:8200".to_string()
}

fn default_vault_project() -> String {
    "default".to_string()
}

fn default_vault_environment() -> String {
    "development".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_user_agent() -> String {
    "Forgecred".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            info!("Loading configuration from {}", path.display());
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| "Failed to parse configuration file")?;
            Ok(config)
        } else {
            info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }

    pub fn default() -> Self {
        Self {
            vault: VaultConfig::default(),
            github: GithubConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
