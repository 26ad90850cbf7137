//! Configuration file management for maildraft
//!
//! This module handles reading and writing configuration values to ~/.maildraft/config.toml
//! Configuration values can be overridden by environment variables.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::env::{apis as env_apis, generation as env_generation};
use crate::error::MailDraftError;
use crate::models::GenerationBackend;
use crate::services::gemini::GeminiConfig;

/// Configuration structure matching config.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub generation: GenerationSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ApiConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gemini_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gemini_model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GenerationSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<GenerationBackend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Get the config file path (~/.maildraft/config.toml)
    pub fn get_config_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Could not find home directory")?;
        Ok(home_dir.join(".maildraft").join("config.toml"))
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Load configuration from file
    /// Returns default config if file doesn't exist
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    /// Save configuration to file
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, contents)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        // The file holds an API key
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(config_path, permissions).with_context(|| {
                format!(
                    "Failed to set permissions on config file: {}",
                    config_path.display()
                )
            })?;
        }

        Ok(())
    }

    /// Get a config value by key
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "gemini-api-key" | "gemini_api_key" => self.api.gemini_api_key.clone(),
            "gemini-model" | "gemini_model" => self.api.gemini_model.clone(),
            "backend" => self.generation.backend.map(|b| b.to_string()),
            "timeout" | "timeout-secs" => self.generation.timeout_secs.map(|t| t.to_string()),
            _ => None,
        }
    }

    /// Set a config value by key
    pub fn set(&mut self, key: &str, value: String) -> Result<()> {
        match key {
            "gemini-api-key" | "gemini_api_key" => {
                self.api.gemini_api_key = Some(value);
            }
            "gemini-model" | "gemini_model" => {
                self.api.gemini_model = Some(value);
            }
            "backend" => {
                let backend = value
                    .parse::<GenerationBackend>()
                    .map_err(MailDraftError::invalid_config)?;
                self.generation.backend = Some(backend);
            }
            "timeout" | "timeout-secs" => {
                let secs = value
                    .parse::<u64>()
                    .with_context(|| format!("Invalid timeout value: {value}"))?;
                self.generation.timeout_secs = Some(secs);
            }
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
        Ok(())
    }

    /// Unset (remove) a config value by key
    pub fn unset(&mut self, key: &str) -> Result<()> {
        match key {
            "gemini-api-key" | "gemini_api_key" => self.api.gemini_api_key = None,
            "gemini-model" | "gemini_model" => self.api.gemini_model = None,
            "backend" => self.generation.backend = None,
            "timeout" | "timeout-secs" => self.generation.timeout_secs = None,
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
        Ok(())
    }

    /// Get all config values as key-value pairs
    pub fn list(&self) -> Vec<(String, String)> {
        let mut items = Vec::new();

        if let Some(ref key) = self.api.gemini_api_key {
            items.push(("gemini-api-key".to_string(), mask_api_key(key)));
        }
        if let Some(ref model) = self.api.gemini_model {
            items.push(("gemini-model".to_string(), model.clone()));
        }
        if let Some(backend) = self.generation.backend {
            items.push(("backend".to_string(), backend.to_string()));
        }
        if let Some(timeout) = self.generation.timeout_secs {
            items.push(("timeout".to_string(), timeout.to_string()));
        }

        items
    }
}

/// Build the client configuration from the environment and the config file
pub fn load_gemini_config() -> Result<GeminiConfig> {
    let file = Config::load()?;
    resolve_gemini_config(&file, |name| std::env::var(name).ok())
}

/// Merge configuration sources with priority: environment variable > config file > default
pub fn resolve_gemini_config<F>(file: &Config, env: F) -> Result<GeminiConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let env = |name: &str| env(name).filter(|value| !value.trim().is_empty());
    let mut config = GeminiConfig::default();

    config.api_key = env(env_apis::GEMINI_API_KEY).or_else(|| file.api.gemini_api_key.clone());
    config.model = env(env_apis::GEMINI_MODEL).or_else(|| file.api.gemini_model.clone());

    if let Some(base_url) = env(env_apis::GEMINI_BASE_URL) {
        config.base_url = base_url;
    }

    config.backend = match env(env_generation::BACKEND) {
        Some(value) => value
            .parse::<GenerationBackend>()
            .map_err(MailDraftError::invalid_config)?,
        None => file.generation.backend.unwrap_or_default(),
    };

    let timeout_secs = match env(env_generation::TIMEOUT) {
        Some(value) => Some(value.trim().parse::<u64>().map_err(|_| {
            MailDraftError::invalid_config(format!(
                "{} must be a number of seconds, got '{value}'",
                env_generation::TIMEOUT
            ))
        })?),
        None => file.generation.timeout_secs,
    };
    if let Some(secs) = timeout_secs {
        config.timeout = Duration::from_secs(secs);
    }

    Ok(config)
}

/// Mask API key for display (show first 4 and last 4 characters)
fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
