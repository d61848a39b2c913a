//! Service status report.

use serde::Serialize;
use tracing::info;

use crate::config::ClassifierConfig;
use crate::orchestrator::probe;
use crate::transport::ClassificationTransport;

const NOT_CONFIGURED: &str = "not configured";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    Disabled,
    Healthy,
    Unhealthy,
}

/// Current reachability of the service plus the configuration that was used
/// to decide it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceStatus {
    pub status: ServiceState,
    pub enabled: bool,
    pub url: String,
}

/// Report the service state. Performs at most one health probe; none when
/// classification is disabled or no endpoint is configured.
pub async fn service_status<T>(transport: &T, config: &ClassifierConfig) -> ServiceStatus
where
    T: ClassificationTransport + ?Sized,
{
    let url = config
        .endpoint
        .clone()
        .unwrap_or_else(|| NOT_CONFIGURED.to_string());

    let status = match config.active_endpoint() {
        None => ServiceState::Disabled,
        Some(endpoint) => {
            if probe(transport, endpoint, config).await {
                ServiceState::Healthy
            } else {
                ServiceState::Unhealthy
            }
        }
    };
    info!(status = ?status, enabled = config.enabled, url = %url, "classification service status");

    ServiceStatus {
        status,
        enabled: config.enabled,
        url,
    }
}
