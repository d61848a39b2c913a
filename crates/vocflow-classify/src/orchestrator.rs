//! Classification of a single consultation.
//!
//! Gating runs in order and stops at the first failure:
//!
//! 1. feature disabled or no endpoint configured: `Disabled`, no network
//! 2. health probe under `health_timeout`: `Unhealthy` unless it succeeds
//!
//! Then the client identity is extracted (falling back to the default
//! identity), the request is built, and a single classification call runs
//! under `timeout`. There are no retries.

use std::time::Duration;

use chrono::{Datelike, Utc};
use tokio::time::timeout;
use tracing::{info, warn};
use vocflow_core::{
    ClassificationRequest, ConsultationMetadata, extract_and_validate_identity,
};

use crate::config::ClassifierConfig;
use crate::outcome::{Classification, ClassificationFailure, ClassificationResult};
use crate::transport::{ClassificationTransport, TransportError};
use crate::wire::ServiceReply;

/// Longest response body kept in an `HttpError`.
const BODY_SNIPPET_CHARS: usize = 512;

/// Classify `text` using the current calendar year for age resolution.
pub async fn classify_consultation<T>(
    transport: &T,
    text: &str,
    metadata: &ConsultationMetadata,
    config: &ClassifierConfig,
) -> ClassificationResult
where
    T: ClassificationTransport + ?Sized,
{
    classify_consultation_at(transport, text, metadata, config, Utc::now().year()).await
}

/// Classify `text`, resolving the client's age against `current_year`.
pub async fn classify_consultation_at<T>(
    transport: &T,
    text: &str,
    metadata: &ConsultationMetadata,
    config: &ClassifierConfig,
    current_year: i32,
) -> ClassificationResult
where
    T: ClassificationTransport + ?Sized,
{
    let endpoint = match open_gate(transport, config).await {
        Ok(endpoint) => endpoint,
        Err(failure) => {
            warn!(source_id = %metadata.source_id, reason = %failure, "classification skipped");
            return ClassificationResult::Failure(failure);
        }
    };

    let identity = extract_and_validate_identity(text, current_year);
    info!(
        source_id = %metadata.source_id,
        gender = %identity.gender,
        age = identity.age,
        identity_valid = identity.is_valid,
        "client identity resolved"
    );

    let request = ClassificationRequest::build(metadata, &identity, text);
    send(transport, endpoint, &request, config).await.into()
}

/// Check the enable flag, the endpoint, and the health probe, in that order.
pub(crate) async fn open_gate<'c, T>(
    transport: &T,
    config: &'c ClassifierConfig,
) -> Result<&'c str, ClassificationFailure>
where
    T: ClassificationTransport + ?Sized,
{
    let endpoint = config
        .active_endpoint()
        .ok_or(ClassificationFailure::Disabled)?;

    if !probe(transport, endpoint, config).await {
        return Err(ClassificationFailure::Unhealthy);
    }
    Ok(endpoint)
}

/// One health probe bounded by `health_timeout`.
pub(crate) async fn probe<T>(transport: &T, endpoint: &str, config: &ClassifierConfig) -> bool
where
    T: ClassificationTransport + ?Sized,
{
    let url = config.health_url(endpoint);
    match timeout(config.health_timeout, transport.health(&url)).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            warn!(url = %url, error = %e, "health probe failed");
            false
        }
        Err(_) => {
            warn!(
                url = %url,
                timeout_ms = millis(config.health_timeout),
                "health probe timed out"
            );
            false
        }
    }
}

/// One classification call bounded by `timeout`, shaped into a result.
pub(crate) async fn send<T>(
    transport: &T,
    endpoint: &str,
    request: &ClassificationRequest,
    config: &ClassifierConfig,
) -> Result<Classification, ClassificationFailure>
where
    T: ClassificationTransport + ?Sized,
{
    let url = config.classify_url(endpoint);
    let timeout_ms = millis(config.timeout);

    let reply = match timeout(config.timeout, transport.classify(&url, request)).await {
        Ok(Ok(reply)) => reply,
        Ok(Err(e)) => {
            let failure = transport_failure(e, timeout_ms);
            warn!(source_id = %request.source_id, reason = %failure, "classification call failed");
            return Err(failure);
        }
        Err(_) => {
            warn!(source_id = %request.source_id, timeout_ms, "classification call timed out");
            return Err(ClassificationFailure::Timeout { timeout_ms });
        }
    };

    let classification = shape_reply(reply, &request.source_id).inspect_err(|failure| {
        warn!(source_id = %request.source_id, reason = %failure, "classification not usable");
    })?;

    info!(
        source_id = %classification.source_id,
        category = %classification.category,
        confidence = classification.confidence,
        "classification complete"
    );
    Ok(classification)
}

fn transport_failure(error: TransportError, timeout_ms: u64) -> ClassificationFailure {
    if error.is_timeout() {
        return ClassificationFailure::Timeout { timeout_ms };
    }
    match error {
        TransportError::Server { status, body } => ClassificationFailure::HttpError {
            status,
            body: snippet(&body),
        },
        other => ClassificationFailure::TransportError {
            message: other.to_string(),
        },
    }
}

fn shape_reply(
    reply: ServiceReply,
    source_id: &str,
) -> Result<Classification, ClassificationFailure> {
    if !reply.success {
        let message = reply
            .message
            .or(reply.error)
            .unwrap_or_else(|| "service reported failure".to_string());
        return Err(ClassificationFailure::ServiceRejected { message });
    }

    let data = reply
        .data
        .ok_or_else(|| ClassificationFailure::TransportError {
            message: "success reply carried no data".to_string(),
        })?;

    let source_id = if data.source_id.is_empty() {
        source_id.to_string()
    } else {
        data.source_id
    };

    Ok(Classification {
        source_id,
        category: data.consulting_category,
        confidence: data.classification.confidence,
        alternative_categories: data.classification.alternative_categories,
        problem_situation: data.analysis.problem_situation,
        solution_approach: data.analysis.solution_approach,
        expected_outcome: data.analysis.expected_outcome,
    })
}

fn snippet(body: &str) -> String {
    match body.char_indices().nth(BODY_SNIPPET_CHARS) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

pub(crate) fn millis(d: Duration) -> u64 {
    d.as_millis().try_into().unwrap_or(u64::MAX)
}
