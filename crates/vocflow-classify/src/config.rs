//! Classifier configuration, normally taken from the process environment.

use std::time::Duration;

use tracing::warn;

pub const ENV_ENABLED: &str = "ENABLE_AUTO_CLASSIFICATION";
pub const ENV_URL: &str = "CLASSIFICATION_SERVICE_URL";
pub const ENV_TIMEOUT_MS: &str = "CLASSIFICATION_TIMEOUT";
pub const ENV_HEALTH_TIMEOUT_MS: &str = "CLASSIFICATION_HEALTH_TIMEOUT";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);
pub const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_millis(5_000);

pub const DEFAULT_HEALTH_PATH: &str = "/health";
pub const DEFAULT_CLASSIFY_PATH: &str = "/classify";
pub const DEFAULT_HISTORY_PATH: &str = "/classify/history";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierConfig {
    pub enabled: bool,
    /// Service base URL without a trailing slash.
    pub endpoint: Option<String>,
    /// Budget for one classification call.
    pub timeout: Duration,
    /// Budget for the health probe and history lookups.
    pub health_timeout: Duration,
    pub health_path: String,
    pub classify_path: String,
    pub history_path: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            timeout: DEFAULT_TIMEOUT,
            health_timeout: DEFAULT_HEALTH_TIMEOUT,
            health_path: DEFAULT_HEALTH_PATH.to_string(),
            classify_path: DEFAULT_CLASSIFY_PATH.to_string(),
            history_path: DEFAULT_HISTORY_PATH.to_string(),
        }
    }
}

impl ClassifierConfig {
    /// An enabled configuration pointing at `endpoint`.
    pub fn enabled(endpoint: &str) -> Self {
        Self {
            enabled: true,
            endpoint: normalize_endpoint(endpoint),
            ..Self::default()
        }
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from any key lookup.
    ///
    /// The feature is enabled only when the flag is exactly `"true"`. A blank
    /// URL counts as absent. Unparsable timeouts fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let enabled = lookup(ENV_ENABLED).is_some_and(|v| v == "true");
        let endpoint = lookup(ENV_URL).as_deref().and_then(normalize_endpoint);
        let timeout = millis_or(lookup(ENV_TIMEOUT_MS), ENV_TIMEOUT_MS, DEFAULT_TIMEOUT);
        let health_timeout = millis_or(
            lookup(ENV_HEALTH_TIMEOUT_MS),
            ENV_HEALTH_TIMEOUT_MS,
            DEFAULT_HEALTH_TIMEOUT,
        );

        Self {
            enabled,
            endpoint,
            timeout,
            health_timeout,
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_health_timeout(mut self, health_timeout: Duration) -> Self {
        self.health_timeout = health_timeout;
        self
    }

    /// The endpoint, if the feature is enabled and an endpoint is configured.
    pub fn active_endpoint(&self) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        self.endpoint.as_deref()
    }

    pub fn health_url(&self, endpoint: &str) -> String {
        format!("{endpoint}{}", self.health_path)
    }

    pub fn classify_url(&self, endpoint: &str) -> String {
        format!("{endpoint}{}", self.classify_path)
    }

    pub fn history_url(&self, endpoint: &str) -> String {
        format!("{endpoint}{}", self.history_path)
    }
}

fn normalize_endpoint(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn millis_or(raw: Option<String>, key: &str, default: Duration) -> Duration {
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse::<u64>() {
        Ok(ms) => Duration::from_millis(ms),
        Err(_) => {
            warn!(key, value = %raw, default_ms = default.as_millis() as u64, "unparsable timeout, using default");
            default
        }
    }
}
