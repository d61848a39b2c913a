//! HTTP transport to the classification service.
//!
//! [`ClassificationTransport`] is the seam the orchestrator talks through;
//! [`HttpTransport`] is the reqwest implementation. Transports perform a
//! single request per call and never retry. Deadlines are applied by the
//! caller, which drops (and so cancels) the in-flight future on expiry.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};
use vocflow_core::ClassificationRequest;

use crate::wire::{HistoryReply, ServiceReply};

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("request timed out")]
    Timeout,
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Whether the underlying client gave up waiting.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout => true,
            Self::Http(e) => e.is_timeout(),
            _ => false,
        }
    }
}

#[async_trait]
pub trait ClassificationTransport: Send + Sync {
    /// `GET url`; `Ok` on any success status. The body is ignored.
    async fn health(&self, url: &str) -> Result<(), TransportError>;

    /// `POST url` with `request` as the JSON body.
    async fn classify(
        &self,
        url: &str,
        request: &ClassificationRequest,
    ) -> Result<ServiceReply, TransportError>;

    /// `GET url?sourceId=<source_id>`.
    async fn history(&self, url: &str, source_id: &str) -> Result<HistoryReply, TransportError>;
}

/// reqwest-backed transport. Cheap to clone; share one per process.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Use a preconfigured client (proxies, TLS roots, default headers).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ClassificationTransport for HttpTransport {
    async fn health(&self, url: &str) -> Result<(), TransportError> {
        debug!(url = %url, "probing classification service");
        let resp = self.client.get(url).send().await?;
        ensure_success(resp).await?;
        Ok(())
    }

    async fn classify(
        &self,
        url: &str,
        request: &ClassificationRequest,
    ) -> Result<ServiceReply, TransportError> {
        info!(
            url = %url,
            source_id = %request.source_id,
            turns = request.consulting_turns,
            length = request.consulting_length,
            "posting consultation for classification"
        );
        let resp = self.client.post(url).json(request).send().await?;
        let resp = ensure_success(resp).await?;

        let body = resp.text().await?;
        Ok(ServiceReply::from_json(&body)?)
    }

    async fn history(&self, url: &str, source_id: &str) -> Result<HistoryReply, TransportError> {
        debug!(url = %url, source_id, "fetching classification history");
        let resp = self
            .client
            .get(url)
            .query(&[("sourceId", source_id)])
            .send()
            .await?;
        let resp = ensure_success(resp).await?;

        let body = resp.text().await?;
        let reply: HistoryReply = serde_json::from_str(&body)?;
        Ok(reply)
    }
}

async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response, TransportError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(TransportError::Server {
            status: status.as_u16(),
            body,
        });
    }
    Ok(resp)
}
