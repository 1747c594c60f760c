//! Client configuration

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

pub const ENV_URL: &str = "TRACKLINK_URL";
pub const ENV_USER: &str = "TRACKLINK_USER";
pub const ENV_TOKEN: &str = "TRACKLINK_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    pub url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default)]
    pub enable_request_trace: bool,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl ClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(Error::Validation("Server URL cannot be empty".to_string()));
        }

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(Error::Validation(
                "Server URL must start with http:// or https://".to_string(),
            ));
        }

        const MAX_TIMEOUT: u64 = 300;
        if self.timeout_secs == 0 || self.timeout_secs > MAX_TIMEOUT {
            return Err(Error::Validation(format!(
                "Timeout must be between 1 and {} seconds",
                MAX_TIMEOUT
            )));
        }

        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.log_level.as_str()) {
            return Err(Error::Validation(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.log_level,
                valid_log_levels.join(", ")
            )));
        }

        Ok(())
    }

    /// Base URL with a trailing slash, ready for relative resource paths
    pub fn base_url(&self) -> String {
        let url = self.url.trim();
        if url.ends_with('/') {
            url.to_string()
        } else {
            format!("{}/", url)
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.username.is_some() && self.api_token.is_some()
    }

    /// Override connection settings from `TRACKLINK_*` environment variables
    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_URL).filter(|v| !v.trim().is_empty()) {
            self.url = url;
        }
        if let Some(user) = lookup(ENV_USER).filter(|v| !v.trim().is_empty()) {
            self.username = Some(user);
        }
        if let Some(token) = lookup(ENV_TOKEN).filter(|v| !v.trim().is_empty()) {
            self.api_token = Some(token);
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080/".to_string(),
            username: None,
            api_token: None,
            enable_request_trace: false,
            timeout_secs: default_timeout(),
            log_level: default_log_level(),
        }
    }
}
