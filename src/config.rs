use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Main configuration structure for the feedback hub
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub relay: RelayConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Messages endpoint the transcript is posted to
    pub endpoint: String,
    pub model: String,
    pub max_tokens: u32,
    /// Sent as `x-api-key` when present; requests go out bare otherwise
    #[serde(default)]
    pub api_key: Option<String>,
    pub api_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    pub color: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

impl Config {
    /// Load configuration from file with environment variable overrides
    /// ALWAYS returns a valid config - never fails
    pub fn load() -> Self {
        let env_paths = [".env", "../.env"];

        let mut env_loaded = false;
        for path in &env_paths {
            if dotenvy::from_path(path).is_ok() {
                tracing::info!("Loaded .env from: {}", path);
                env_loaded = true;
                break;
            }
        }

        if !env_loaded {
            tracing::debug!("No .env file found - continuing with env vars only");
        }

        let config_path =
            env::var("FEEDBACK_CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

        let mut config = Self::from_file(Path::new(&config_path));

        config.apply_overrides(|key| env::var(key).ok());

        if let Err(e) = config.validate() {
            tracing::warn!("Config validation warnings: {} - continuing anyway", e);
        }

        config
    }

    /// Read a YAML config file, falling back to defaults on any problem
    pub fn from_file(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!("Config file not found at {} - using defaults", path.display());
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str::<Config>(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded configuration from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to parse config file {}: {} - using defaults",
                        path.display(),
                        e
                    );
                    Self::default()
                }
            },
            Err(e) => {
                tracing::error!(
                    "Failed to read config file {}: {} - using defaults",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Apply overrides from a variable lookup (the process environment in production)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup("FEEDBACK_API_URL") {
            self.relay.endpoint = endpoint;
        }
        if let Some(model) = lookup("FEEDBACK_MODEL") {
            self.relay.model = model;
        }
        if let Some(max_tokens) = lookup("FEEDBACK_MAX_TOKENS") {
            match max_tokens.parse() {
                Ok(n) => self.relay.max_tokens = n,
                Err(_) => tracing::warn!("Ignoring non-numeric FEEDBACK_MAX_TOKENS"),
            }
        }
        if let Some(api_key) = lookup("ANTHROPIC_API_KEY") {
            if !api_key.trim().is_empty() {
                self.relay.api_key = Some(api_key);
            }
        }
        if let Some(version) = lookup("ANTHROPIC_VERSION") {
            self.relay.api_version = version;
        }
        if let Some(color) = lookup("FEEDBACK_COLOR") {
            match color.to_lowercase().as_str() {
                "0" | "false" | "no" | "off" => self.ui.color = false,
                "1" | "true" | "yes" | "on" => self.ui.color = true,
                other => tracing::warn!("Ignoring unknown FEEDBACK_COLOR value: {}", other),
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.relay.max_tokens == 0 {
            return Err("relay.max_tokens cannot be 0".into());
        }
        if self.relay.model.trim().is_empty() {
            return Err("relay.model cannot be empty".into());
        }
        if !(self.relay.endpoint.starts_with("https://")
            || self.relay.endpoint.starts_with("http://"))
        {
            return Err(format!(
                "relay.endpoint must be an http(s) URL, got '{}'",
                self.relay.endpoint
            )
            .into());
        }
        if self.relay.api_key.is_none() {
            return Err(
                "ANTHROPIC_API_KEY is not set - requests will be sent without credentials".into(),
            );
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "professor-feedback".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            relay: RelayConfig {
                endpoint: "https://api.anthropic.com/v1/messages".to_string(),
                model: "claude-sonnet-4-20250514".to_string(),
                max_tokens: 1000,
                api_key: None,
                api_version: "2023-06-01".to_string(),
            },
            ui: UiConfig::default(),
        }
    }
}
