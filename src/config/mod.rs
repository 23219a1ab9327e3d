//! Configuration module for the Ossi backend.
//!
//! Server settings are loaded from environment variables with sensible defaults.
//! Process-wide keys (Slack token, deployment labels) are optional at load time
//! and read through [`Config::get`], which fails on absent values.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::errors::AppError;

pub const DEFAULT_SLACK_API_URL: &str = "https://slack.com/api";

/// Process-wide keys read on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    SlackToken,
    Version,
    Environment,
}

impl ConfigKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::SlackToken => "SLACK_TOKEN",
            ConfigKey::Version => "VERSION",
            ConfigKey::Environment => "ENVIRONMENT",
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key for the admin API
    pub api_psk: Option<String>,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Base URL of the Slack Web API
    pub slack_api_url: String,
    /// Bot token used for chat.postMessage
    pub slack_token: Option<String>,
    /// Deployment version label
    pub version: Option<String>,
    /// Deployment environment label
    pub environment: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_psk = non_blank(env::var("OSSI_API_PSK").ok());

        let db_path = env::var("OSSI_DB_PATH")
            .unwrap_or_else(|_| "./data/ossi.sqlite".to_string())
            .into();

        let bind_addr = env::var("OSSI_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid OSSI_BIND_ADDR format");

        let log_level = env::var("OSSI_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let slack_api_url =
            env::var("SLACK_API_URL").unwrap_or_else(|_| DEFAULT_SLACK_API_URL.to_string());

        Self {
            api_psk,
            db_path,
            bind_addr,
            log_level,
            slack_api_url,
            slack_token: non_blank(env::var(ConfigKey::SlackToken.as_str()).ok()),
            version: non_blank(env::var(ConfigKey::Version.as_str()).ok()),
            environment: non_blank(env::var(ConfigKey::Environment.as_str()).ok()),
        }
    }

    /// Read a process-wide key, failing when it is not configured.
    pub fn get(&self, key: ConfigKey) -> Result<&str, AppError> {
        let value = match key {
            ConfigKey::SlackToken => &self.slack_token,
            ConfigKey::Version => &self.version,
            ConfigKey::Environment => &self.environment,
        };
        value
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .ok_or(AppError::MissingConfig(key.as_str()))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
