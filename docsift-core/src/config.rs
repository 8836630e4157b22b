use crate::error::ConfigError;
use std::fmt;
use std::time::Duration;

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const MODEL_VAR: &str = "DOCSIFT_MODEL";
pub const API_BASE_VAR: &str = "DOCSIFT_API_BASE";
pub const TIMEOUT_VAR: &str = "DOCSIFT_EXTRACT_TIMEOUT_SECS";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Settings for the language-model service.
///
/// The API key is always supplied from outside the binary, either from the
/// environment or by the caller.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub request_timeout: Duration,
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey(API_KEY_VAR))?;

        let mut config = Self::new(api_key.trim());

        if let Some(model) = lookup(MODEL_VAR).filter(|v| !v.trim().is_empty()) {
            config.model = model.trim().to_string();
        }

        if let Some(api_base) = lookup(API_BASE_VAR).filter(|v| !v.trim().is_empty()) {
            config.api_base = api_base.trim().to_string();
        }

        if let Some(raw) = lookup(TIMEOUT_VAR) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: TIMEOUT_VAR,
                    value: raw.clone(),
                })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
