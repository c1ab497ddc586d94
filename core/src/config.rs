//! Client configuration and environment loading.

use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_USER_AGENT: &str = "amocrm-api-client/1.0";

/// Environment variable holding the account URL, e.g. `https://example.amocrm.ru`.
pub const ENV_URL: &str = "AMOCRM_URL";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    MissingVar(&'static str),

    #[error("environment variable {0} is empty")]
    EmptyVar(&'static str),
}

/// Settings shared by every client variant.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Account base URL without a trailing slash.
    pub crm_url: String,
    pub user_agent: String,
    /// Overall per-request timeout. `None` leaves the transport default.
    pub timeout: Option<Duration>,
    /// Extra headers sent with every request (e.g. `IF-MODIFIED-SINCE`).
    pub headers: Vec<(String, String)>,
}

impl ClientConfig {
    pub fn new(crm_url: &str) -> Self {
        Self {
            crm_url: crm_url.trim_end_matches('/').to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
            headers: Vec::new(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(&env_var(ENV_URL)?))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

pub(crate) fn env_var(name: &'static str) -> Result<String, ConfigError> {
    let value = std::env::var(name).map_err(|_| ConfigError::MissingVar(name))?;
    if value.trim().is_empty() {
        return Err(ConfigError::EmptyVar(name));
    }
    Ok(value)
}
