//! Sequential classification of already-stored consultations.
//!
//! Stored records carry the client's gender and age, so no identity
//! extraction happens here. A batch is an explicit request, so only the
//! endpoint and one health probe gate it; the automatic classification flag
//! does not. Records are paged in ascending `consulting_date` order and each
//! record in the window gets exactly one bounded classification attempt.
//! Per-record failures are counted, never propagated.

use std::time::Duration;

use serde::Serialize;
use tokio::time::{Instant, sleep};
use tracing::{info, warn};
use vocflow_core::{ClassificationRequest, StoredConsultation};

use crate::config::ClassifierConfig;
use crate::orchestrator::{millis, probe, send};
use crate::outcome::ClassificationFailure;
use crate::transport::ClassificationTransport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    /// Records requested for this run.
    pub limit: usize,
    /// Records to skip, counted from the oldest consultation.
    pub offset: usize,
    /// Upper bound on `limit`.
    pub max_records: usize,
    /// Pause between consecutive requests.
    pub delay: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            limit: 10,
            offset: 0,
            max_records: 100,
            delay: Duration::from_millis(1_000),
        }
    }
}

impl BatchOptions {
    /// Records to process, oldest consultation first.
    fn window<'r>(&self, records: &'r [StoredConsultation]) -> Vec<&'r StoredConsultation> {
        let mut ordered: Vec<_> = records.iter().collect();
        ordered.sort_by_key(|r| r.consulting_date);
        ordered
            .into_iter()
            .skip(self.offset)
            .take(self.limit.min(self.max_records))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchItem {
    pub source_id: String,
    pub status: ItemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub consulting_date: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BatchSummary {
    pub total_processed: usize,
    pub successful: usize,
    pub failed: usize,
    pub processing_time_ms: u64,
    pub results: Vec<BatchItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BatchOutcome {
    Completed(BatchSummary),
    /// The whole batch was skipped before any record was sent.
    Skipped(ClassificationFailure),
}

/// Classify the window of `records` selected by `options`.
pub async fn classify_batch<T>(
    transport: &T,
    records: &[StoredConsultation],
    options: &BatchOptions,
    config: &ClassifierConfig,
) -> BatchOutcome
where
    T: ClassificationTransport + ?Sized,
{
    let Some(endpoint) = config.endpoint.as_deref() else {
        warn!("batch classification skipped: no service endpoint");
        return BatchOutcome::Skipped(ClassificationFailure::Disabled);
    };

    let window = options.window(records);
    if window.is_empty() {
        info!(offset = options.offset, "no records to classify");
        return BatchOutcome::Completed(BatchSummary::default());
    }

    if !probe(transport, endpoint, config).await {
        warn!("batch classification skipped: service unhealthy");
        return BatchOutcome::Skipped(ClassificationFailure::Unhealthy);
    }

    info!(
        records = window.len(),
        offset = options.offset,
        delay_ms = millis(options.delay),
        "starting batch classification"
    );
    let started = Instant::now();
    let mut summary = BatchSummary::default();

    for (i, record) in window.into_iter().enumerate() {
        if i > 0 && !options.delay.is_zero() {
            sleep(options.delay).await;
        }

        let request = ClassificationRequest::from(record);
        let item = match send(transport, endpoint, &request, config).await {
            Ok(classification) => {
                summary.successful += 1;
                BatchItem {
                    source_id: request.source_id,
                    status: ItemStatus::Success,
                    category: Some(classification.category),
                    confidence: Some(classification.confidence),
                    error: None,
                    consulting_date: request.consulting_date,
                }
            }
            Err(failure) => {
                summary.failed += 1;
                BatchItem {
                    source_id: request.source_id,
                    status: ItemStatus::Failed,
                    category: None,
                    confidence: None,
                    error: Some(failure.to_string()),
                    consulting_date: request.consulting_date,
                }
            }
        };
        summary.total_processed += 1;
        summary.results.push(item);
    }

    summary.processing_time_ms = millis(started.elapsed());
    info!(
        total = summary.total_processed,
        successful = summary.successful,
        failed = summary.failed,
        elapsed_ms = summary.processing_time_ms,
        "batch classification finished"
    );
    BatchOutcome::Completed(summary)
}
