//! Classifier settings shared by every subcommand.
//!
//! Each flag falls back to the environment variable the library reads, and the
//! resolved values go through the same parsing as `ClassifierConfig::from_env`.

use clap::Args;
use vocflow_classify::ClassifierConfig;
use vocflow_classify::config::{ENV_ENABLED, ENV_HEALTH_TIMEOUT_MS, ENV_TIMEOUT_MS, ENV_URL};

#[derive(Args, Debug, Clone, Default)]
pub struct ServiceArgs {
    /// Enable automatic classification ("true" to enable).
    #[arg(long = "enabled", env = "ENABLE_AUTO_CLASSIFICATION", global = true)]
    pub enabled: Option<String>,

    /// Base URL of the classification service.
    #[arg(long = "service-url", env = "CLASSIFICATION_SERVICE_URL", global = true)]
    pub service_url: Option<String>,

    /// Classification call timeout in milliseconds.
    #[arg(long = "timeout-ms", env = "CLASSIFICATION_TIMEOUT", global = true)]
    pub timeout_ms: Option<String>,

    /// Health probe and history lookup timeout in milliseconds.
    #[arg(
        long = "health-timeout-ms",
        env = "CLASSIFICATION_HEALTH_TIMEOUT",
        global = true
    )]
    pub health_timeout_ms: Option<String>,
}

impl ServiceArgs {
    pub fn to_config(&self) -> ClassifierConfig {
        ClassifierConfig::from_lookup(|key| match key {
            ENV_ENABLED => self.enabled.clone(),
            ENV_URL => self.service_url.clone(),
            ENV_TIMEOUT_MS => self.timeout_ms.clone(),
            ENV_HEALTH_TIMEOUT_MS => self.health_timeout_ms.clone(),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn flags_map_onto_config() {
        let args = ServiceArgs {
            enabled: Some("true".into()),
            service_url: Some("http://classifier.test/".into()),
            timeout_ms: Some("1500".into()),
            health_timeout_ms: None,
        };
        let config = args.to_config();

        assert!(config.enabled);
        assert_eq!(config.endpoint.as_deref(), Some("http://classifier.test"));
        assert_eq!(config.timeout, Duration::from_millis(1_500));
        assert_eq!(config.health_timeout, Duration::from_millis(5_000));
    }

    #[test]
    fn nothing_set_is_disabled() {
        let config = ServiceArgs::default().to_config();
        assert!(!config.enabled);
        assert_eq!(config.active_endpoint(), None);
    }

    #[test]
    fn only_exact_true_enables() {
        let args = ServiceArgs {
            enabled: Some("yes".into()),
            service_url: Some("http://classifier.test".into()),
            ..ServiceArgs::default()
        };
        assert!(!args.to_config().enabled);
    }
}
