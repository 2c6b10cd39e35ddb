//! # Relay Configuration
//!
//! Runtime parameters for the relay loop.
//!
//! All values have defaults; `from_env` overrides them from `RELAY_*`
//! variables. `validate` must pass before a runtime is built.

use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default interval between pipeline runs.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Default interval between credential rotations.
pub const DEFAULT_ROTATION_INTERVAL: Duration = Duration::from_secs(3600);

/// Complete relay configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Validator identity sent with every queue query.
    pub validator: String,
    /// Queues to drain, in processing order.
    pub queues: Vec<String>,
    /// Credential ids in rotation order. The first is active at startup.
    pub credentials: Vec<String>,
    /// Delay between pipeline runs.
    pub poll_interval: Duration,
    /// Delay between credential rotations.
    pub rotation_interval: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            validator: String::new(),
            queues: Vec::new(),
            credentials: Vec::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            rotation_interval: DEFAULT_ROTATION_INTERVAL,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No validator identity.
    #[error("Validator identity is not set (RELAY_VALIDATOR)")]
    MissingValidator,

    /// No queues to drain.
    #[error("No queues configured (RELAY_QUEUES)")]
    NoQueues,

    /// No credentials to sign with.
    #[error("No credentials configured (RELAY_CREDENTIALS)")]
    NoCredentials,

    /// An interval of zero.
    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),
}

impl RelayConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `RELAY_VALIDATOR`: Validator identity
    /// - `RELAY_QUEUES`: Comma-separated queue names
    /// - `RELAY_CREDENTIALS`: Comma-separated credential ids, in rotation order
    /// - `RELAY_POLL_INTERVAL_SECS`: Seconds between runs (default: 10)
    /// - `RELAY_ROTATION_INTERVAL_SECS`: Seconds between rotations (default: 3600)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unparseable numbers keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(validator) = lookup("RELAY_VALIDATOR") {
            config.validator = validator.trim().to_string();
        }
        if let Some(queues) = lookup("RELAY_QUEUES") {
            config.queues = split_list(&queues);
        }
        if let Some(credentials) = lookup("RELAY_CREDENTIALS") {
            config.credentials = split_list(&credentials);
        }
        if let Some(secs) = lookup("RELAY_POLL_INTERVAL_SECS").and_then(|v| v.parse().ok()) {
            config.poll_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = lookup("RELAY_ROTATION_INTERVAL_SECS").and_then(|v| v.parse().ok()) {
            config.rotation_interval = Duration::from_secs(secs);
        }

        config
    }

    /// Check the configuration can drive a runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.validator.is_empty() {
            return Err(ConfigError::MissingValidator);
        }
        if self.queues.is_empty() {
            return Err(ConfigError::NoQueues);
        }
        if self.credentials.is_empty() {
            return Err(ConfigError::NoCredentials);
        }
        if self.poll_interval.is_zero() {
            return Err(ConfigError::ZeroInterval("poll_interval"));
        }
        if self.rotation_interval.is_zero() {
            return Err(ConfigError::ZeroInterval("rotation_interval"));
        }
        Ok(())
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
