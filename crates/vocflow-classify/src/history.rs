//! Lookup of previously stored classifications.

use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::ClassifierConfig;
use crate::orchestrator::millis;
use crate::transport::ClassificationTransport;
use crate::wire::HistoryEntry;

/// Most recent stored classification for `source_id`, if the service has one.
///
/// Needs only a configured endpoint; the automatic classification flag does
/// not apply to lookups. Bounded by the health timeout. Every failure mode
/// yields `None`.
pub async fn latest_classification<T>(
    transport: &T,
    source_id: &str,
    config: &ClassifierConfig,
) -> Option<HistoryEntry>
where
    T: ClassificationTransport + ?Sized,
{
    let Some(endpoint) = config.endpoint.as_deref() else {
        warn!(source_id, "history lookup skipped: no service endpoint");
        return None;
    };

    let url = config.history_url(endpoint);
    let reply = match timeout(config.health_timeout, transport.history(&url, source_id)).await {
        Ok(Ok(reply)) => reply,
        Ok(Err(e)) => {
            warn!(source_id, error = %e, "history lookup failed");
            return None;
        }
        Err(_) => {
            warn!(
                source_id,
                timeout_ms = millis(config.health_timeout),
                "history lookup timed out"
            );
            return None;
        }
    };

    if !reply.success {
        warn!(source_id, "history lookup rejected by service");
        return None;
    }
    let entry = reply.data.into_iter().next();
    match &entry {
        Some(e) => debug!(source_id, category = %e.consulting_category, "history entry found"),
        None => warn!(source_id, "no stored classification"),
    }
    entry
}
