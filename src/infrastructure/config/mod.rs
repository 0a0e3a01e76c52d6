//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use crate::application::errors::ConfigError;
use crate::domain::entities::{CommandEntries, RecommendationTable};

/// Environment variable holding the channel access token
pub const ACCESS_TOKEN_VAR: &str = "LINE_CHANNEL_ACCESS_TOKEN";
/// Environment variable holding the channel secret
pub const CHANNEL_SECRET_VAR: &str = "LINE_CHANNEL_SECRET";
/// Environment variable overriding the bind address
pub const BIND_VAR: &str = "BOT_BIND";

/// Bot configuration (secrets live in [`LineCredentials`])
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub server: ServerConfig,
    pub line: LineConfig,
    /// Replaces the built-in table when present
    pub recommendations: Option<Vec<CommandEntries>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ServerConfig {
    pub bind: String,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LineConfig {
    pub api_base: String,
    pub reply_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8000".to_string(),
            request_timeout_seconds: 30,
        }
    }
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            api_base: crate::infrastructure::adapters::line::API_BASE.to_string(),
            reply_timeout_seconds: 10,
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Timeouts must be non-zero, and a whole request must outlast one reply
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.line.reply_timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue(
                "line.reply-timeout-seconds must be greater than 0".to_string(),
            ));
        }
        if self.server.request_timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue(
                "server.request-timeout-seconds must be greater than 0".to_string(),
            ));
        }
        if self.server.request_timeout_seconds <= self.line.reply_timeout_seconds {
            return Err(ConfigError::InvalidValue(format!(
                "server.request-timeout-seconds ({}) must exceed line.reply-timeout-seconds ({})",
                self.server.request_timeout_seconds, self.line.reply_timeout_seconds
            )));
        }
        Ok(())
    }

    /// Apply overrides from environment variables
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(bind) = std::env::var(BIND_VAR) {
            self.server.bind = bind;
        }
        self
    }

    pub fn reply_timeout(&self) -> Duration {
        Duration::from_secs(self.line.reply_timeout_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_seconds)
    }

    /// Build the recommendation table this config describes
    pub fn recommendation_table(&self) -> Result<RecommendationTable, ConfigError> {
        match &self.recommendations {
            Some(list) => RecommendationTable::from_commands(list.clone()),
            None => Ok(RecommendationTable::builtin()),
        }
    }
}

/// Channel secrets, read from the environment only
#[derive(Clone)]
pub struct LineCredentials {
    pub channel_access_token: String,
    pub channel_secret: String,
}

impl std::fmt::Debug for LineCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineCredentials")
            .field("channel_access_token", &"***")
            .field("channel_secret", &"***")
            .finish()
    }
}

impl LineCredentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read both secrets through `lookup`; missing or blank values are errors
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ConfigError::MissingField(key.to_string()))
        };

        Ok(Self {
            channel_access_token: require(ACCESS_TOKEN_VAR)?,
            channel_secret: require(CHANNEL_SECRET_VAR)?,
        })
    }
}
