//! Configuration loading and validation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};

/// Default model-id prefix that switches rendering to the generative UI component.
pub const DEFAULT_EMBED_PREFIX: &str = "c1";

/// Top-level bridge configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub api: ApiConfig,

    /// Conversation the history file belongs to. Remote sync is skipped without it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,

    /// Model ids recorded on messages created by the bridge.
    #[serde(default)]
    pub models: Vec<String>,

    #[serde(default)]
    pub embed: EmbedConfig,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

/// Chat backend REST settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            token_env: None,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080/api/v1".into()
}

impl ApiConfig {
    /// Resolve the bearer token: `token` first, then the `token_env` variable.
    pub fn resolve_token(&self) -> Option<String> {
        resolve_secret_field(&self.token, &self.token_env)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedConfig {
    /// Model id/name prefixes rendered with the generative UI component.
    #[serde(default = "default_model_prefixes")]
    pub model_prefixes: Vec<String>,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            model_prefixes: default_model_prefixes(),
        }
    }
}

fn default_model_prefixes() -> Vec<String> {
    vec![DEFAULT_EMBED_PREFIX.into()]
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "plain" (default) or "json".
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Log level override (trace/debug/info/warn/error).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Per-crate log level overrides (e.g. "genui_bridge_relay=debug").
    #[serde(default)]
    pub filters: Vec<String>,
}

fn default_log_format() -> String {
    "plain".into()
}

/// Resolve a secret: check the direct value first, then the env-var reference.
pub fn resolve_secret_field(direct: &Option<String>, env_var: &Option<String>) -> Option<String> {
    if let Some(val) = direct {
        if !val.is_empty() {
            return Some(val.clone());
        }
    }
    if let Some(env) = env_var {
        if let Ok(val) = std::env::var(env) {
            if !val.is_empty() {
                return Some(val);
            }
        }
    }
    None
}

/// Substitute `${ENV_VAR}` patterns in a string with their environment variable values.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| BridgeError::Config(e.to_string()))?;
    Ok(re
        .replace_all(input, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        })
        .into_owned())
}

impl BridgeConfig {
    /// Load config from a JSON5 file, substituting `${ENV_VAR}` references.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        let substituted = substitute_env_vars(&raw)?;

        let config: BridgeConfig =
            json5::from_str(&substituted).map_err(|e| BridgeError::Config(e.to_string()))?;

        Ok(config)
    }

    /// Default config file location.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("genui-bridge")
            .join("config.json5")
    }

    /// Configured chat id, treating an empty string (e.g. an unset `${VAR}`) as absent.
    pub fn chat_id(&self) -> Option<&str> {
        self.chat_id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn token(&self) -> Option<String> {
        self.api.resolve_token()
    }

    /// Validate config, returning (warnings, errors).
    pub fn validate(&self) -> (Vec<String>, Vec<String>) {
        let mut warnings = Vec::new();
        let mut errors = Vec::new();

        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            errors.push(format!("api.base_url is not an http(s) URL: {}", self.api.base_url));
        }

        if self.chat_id().is_some() && self.token().is_none() {
            warnings.push("chat_id is set but no API token is configured; edits stay local".into());
        }

        if self.embed.model_prefixes.iter().any(|p| p.is_empty()) {
            warnings.push("embed.model_prefixes contains an empty prefix; every model will embed".into());
        }

        (warnings, errors)
    }
}
