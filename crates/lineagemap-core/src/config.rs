//! Process configuration.
//!
//! Configuration is read once at startup into a [`LineageConfig`] value that is
//! passed explicitly to the components that need it. Invalid values are
//! reported as [`LineageError::Configuration`] before any request is served.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::LineageError;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const MODEL_ENV: &str = "LINEAGEMAP_MODEL";
pub const BASE_URL_ENV: &str = "LINEAGEMAP_BASE_URL";
pub const TIMEOUT_ENV: &str = "LINEAGEMAP_TIMEOUT_SECS";
pub const THEME_ENV: &str = "LINEAGEMAP_THEME";

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
pub const MAX_TIMEOUT: Duration = Duration::from_secs(600);

/// Value shipped in sample `.env` files; treated the same as a missing key.
const PLACEHOLDER_API_KEY: &str = "YOUR_ACTUAL_GEMINI_API_KEY_HERE";

/// Backend credential. Never printed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wraps a credential, rejecting blank and placeholder values.
    pub fn new(key: impl Into<String>) -> Result<Self, LineageError> {
        let key = key.into().trim().to_string();
        if key.is_empty() || key == PLACEHOLDER_API_KEY {
            return Err(missing_api_key());
        }
        Ok(Self(key))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Color theme for rendered pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            other => Err(format!("unknown theme '{other}' (expected 'dark' or 'light')")),
        }
    }
}

/// Configuration shared by the request builder, backend, and presenters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineageConfig {
    /// Backend credential; only live backends require it
    pub api_key: Option<ApiKey>,
    pub model: String,
    pub base_url: String,
    /// Upper bound for a single backend call
    pub timeout: Duration,
    pub theme: Theme,
}

impl Default for LineageConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            theme: Theme::default(),
        }
    }
}

impl LineageConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, LineageError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, which maps variable names to values.
    ///
    /// A missing API key is not an error here; see [`LineageConfig::require_api_key`].
    /// A present but placeholder key is kept out of the config the same way.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LineageError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let api_key = non_empty(API_KEY_ENV).and_then(|key| ApiKey::new(key).ok());
        let model = non_empty(MODEL_ENV)
            .map(|value| value.trim().to_string())
            .unwrap_or(defaults.model);
        let base_url = non_empty(BASE_URL_ENV)
            .map(|value| value.trim().trim_end_matches('/').to_string())
            .unwrap_or(defaults.base_url);
        let timeout = match non_empty(TIMEOUT_ENV) {
            Some(raw) => parse_timeout(&raw)?,
            None => defaults.timeout,
        };
        let theme = match non_empty(THEME_ENV) {
            Some(raw) => raw
                .parse()
                .map_err(|err| LineageError::Configuration(format!("{THEME_ENV}: {err}")))?,
            None => defaults.theme,
        };

        Ok(Self {
            api_key,
            model,
            base_url,
            timeout,
            theme,
        })
    }

    /// Returns the credential or a configuration error naming the variable.
    pub fn require_api_key(&self) -> Result<&ApiKey, LineageError> {
        self.api_key.as_ref().ok_or_else(missing_api_key)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, LineageError> {
        self.timeout = validate_timeout(timeout)?;
        Ok(self)
    }
}

fn missing_api_key() -> LineageError {
    LineageError::Configuration(format!(
        "{API_KEY_ENV} is not set or still holds the placeholder value; \
         set it in your environment or a .env file"
    ))
}

fn parse_timeout(raw: &str) -> Result<Duration, LineageError> {
    let secs: u64 = raw.trim().parse().map_err(|_| {
        LineageError::Configuration(format!(
            "{TIMEOUT_ENV} must be a whole number of seconds, got '{}'",
            raw.trim()
        ))
    })?;
    validate_timeout(Duration::from_secs(secs))
}

fn validate_timeout(timeout: Duration) -> Result<Duration, LineageError> {
    if timeout.is_zero() || timeout > MAX_TIMEOUT {
        return Err(LineageError::Configuration(format!(
            "timeout must be between 1 and {} seconds",
            MAX_TIMEOUT.as_secs()
        )));
    }
    Ok(timeout)
}
