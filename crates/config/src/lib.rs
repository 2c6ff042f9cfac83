//! Configuration loading, validation, and management for sandeval.
//!
//! Loads configuration from `~/.sandeval/config.toml` (or an explicit path)
//! with environment variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.sandeval/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Chat-completion backend
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Agent loop settings
    #[serde(default)]
    pub agent: AgentSettings,

    /// Remote sandbox (tool server) settings
    #[serde(default)]
    pub sandbox: SandboxConfig,
}

/// Which wire dialect the chat-completion endpoint speaks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Azure OpenAI deployment URLs with `api-key` auth
    #[default]
    Azure,
    /// Any `/v1/chat/completions` endpoint with bearer auth
    OpenAi,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub kind: ProviderKind,

    /// Endpoint base URL (Azure resource endpoint, or an OpenAI-compatible `/v1` base)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Azure deployment name, or model name for OpenAI-compatible endpoints
    #[serde(default = "default_model")]
    pub model: String,

    /// Azure `api-version` query parameter
    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature; unset leaves the backend default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// HTTP timeout for one completion request
    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    "gpt-4".into()
}
fn default_api_version() -> String {
    "2024-02-15-preview".into()
}
fn default_max_tokens() -> u32 {
    4096
}
fn default_provider_timeout() -> u64 {
    120
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            api_url: None,
            api_key: None,
            model: default_model(),
            api_version: default_api_version(),
            max_tokens: default_max_tokens(),
            temperature: None,
            timeout_secs: default_provider_timeout(),
        }
    }
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("kind", &self.kind)
            .field("api_url", &self.api_url)
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("api_version", &self.api_version)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSettings {
    /// Hard cap on model-call / tag-retry rounds per task
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Replace the built-in system prompt entirely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt_override: Option<String>,
}

fn default_max_iterations() -> u32 {
    50
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            system_prompt_override: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxConfig {
    /// Streamable-HTTP MCP endpoint of the sandbox, e.g. `http://localhost:8080/mcp`.
    /// Without it, tasks run with an empty tool catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,

    /// HTTP timeout for one tool call
    #[serde(default = "default_sandbox_timeout")]
    pub timeout_secs: u64,

    /// Files copied into the sandbox before the first task runs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub uploads: Vec<UploadConfig>,
}

fn default_sandbox_timeout() -> u64 {
    300
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            timeout_secs: default_sandbox_timeout(),
            uploads: vec![],
        }
    }
}

/// A local file to place inside the sandbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub local_path: PathBuf,
    /// Destination path inside the sandbox (typically under `/tmp`)
    pub remote_path: String,
}

impl AppConfig {
    /// Load configuration from the default path (~/.sandeval/config.toml),
    /// then apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_env(&Self::config_dir().join("config.toml"))
    }

    /// Load from `path`, then apply environment overrides.
    ///
    /// Recognised variables:
    /// - `SANDEVAL_API_KEY`, `AZURE_OPENAI_API_KEY`, `OPENAI_API_KEY` (first set wins, only if no key is configured)
    /// - `AZURE_OPENAI_ENDPOINT`, `AZURE_OPENAI_DEPLOYMENT`, `AZURE_OPENAI_API_VERSION`
    /// - `MCP_SERVER_URL`
    /// - `SANDEVAL_MAX_ITERATIONS`
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if self.provider.api_key.is_none() {
            self.provider.api_key = lookup("SANDEVAL_API_KEY")
                .or_else(|| lookup("AZURE_OPENAI_API_KEY"))
                .or_else(|| lookup("OPENAI_API_KEY"));
        }

        if let Some(endpoint) = lookup("AZURE_OPENAI_ENDPOINT") {
            self.provider.api_url = Some(endpoint);
        }
        if let Some(deployment) = lookup("AZURE_OPENAI_DEPLOYMENT") {
            self.provider.model = deployment;
        }
        if let Some(version) = lookup("AZURE_OPENAI_API_VERSION") {
            self.provider.api_version = version;
        }
        if let Some(url) = lookup("MCP_SERVER_URL") {
            self.sandbox.server_url = Some(url);
        }
        if let Some(raw) = lookup("SANDEVAL_MAX_ITERATIONS") {
            self.agent.max_iterations = raw.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!(
                    "SANDEVAL_MAX_ITERATIONS must be a positive integer, got '{raw}'"
                ))
            })?;
        }

        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".sandeval")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.agent.max_iterations == 0 {
            return Err(ConfigError::ValidationError(
                "agent.max_iterations must be at least 1".into(),
            ));
        }

        if let Some(t) = self.provider.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(ConfigError::ValidationError(
                    "provider.temperature must be between 0.0 and 2.0".into(),
                ));
            }
        }

        if self.provider.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "provider.max_tokens must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.provider.api_key.is_some()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
