//! In-memory transport double that records every call.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use vocflow_core::ClassificationRequest;

use crate::outcome::AlternativeCategory;
use crate::transport::{ClassificationTransport, TransportError};
use crate::wire::{HistoryReply, ReplyAnalysis, ReplyData, ReplyScores, ServiceReply};

#[derive(Clone)]
pub enum Health {
    Up,
    Down(u16),
    Hang,
}

#[derive(Clone)]
pub enum Reply {
    Ok(ServiceReply),
    Status(u16, String),
    Broken(String),
    Hang,
}

pub struct StubTransport {
    health: Health,
    reply: Reply,
    history: Option<HistoryReply>,
    pub health_calls: AtomicUsize,
    pub classify_calls: AtomicUsize,
    pub history_calls: AtomicUsize,
    pub urls: Mutex<Vec<String>>,
    pub requests: Mutex<Vec<ClassificationRequest>>,
}

impl StubTransport {
    pub fn new(health: Health, reply: Reply) -> Self {
        Self {
            health,
            reply,
            history: None,
            health_calls: AtomicUsize::new(0),
            classify_calls: AtomicUsize::new(0),
            history_calls: AtomicUsize::new(0),
            urls: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Healthy service that classifies everything as `category`.
    pub fn answering(category: &str) -> Self {
        Self::new(Health::Up, Reply::Ok(success_reply(category)))
    }

    pub fn with_history(mut self, history: HistoryReply) -> Self {
        self.history = Some(history);
        self
    }

    pub fn health_calls(&self) -> usize {
        self.health_calls.load(Ordering::SeqCst)
    }

    pub fn classify_calls(&self) -> usize {
        self.classify_calls.load(Ordering::SeqCst)
    }

    pub fn history_calls(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.health_calls() + self.classify_calls() + self.history_calls()
    }
}

pub fn success_reply(category: &str) -> ServiceReply {
    ServiceReply {
        success: true,
        data: Some(ReplyData {
            source_id: String::new(),
            consulting_category: category.to_string(),
            classification: ReplyScores {
                confidence: 0.87,
                alternative_categories: vec![
                    AlternativeCategory {
                        category: "결제일 안내/변경".into(),
                        confidence: 0.08,
                    },
                    AlternativeCategory {
                        category: "한도 안내".into(),
                        confidence: 0.03,
                    },
                ],
            },
            analysis: ReplyAnalysis {
                problem_situation: "카드 분실".into(),
                solution_approach: "분실 신고 접수 및 재발급 안내".into(),
                expected_outcome: "카드 정지 후 재발급".into(),
            },
        }),
        message: None,
        error: None,
    }
}

#[async_trait]
impl ClassificationTransport for StubTransport {
    async fn health(&self, url: &str) -> Result<(), TransportError> {
        self.health_calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_string());
        match self.health {
            Health::Up => Ok(()),
            Health::Down(status) => Err(TransportError::Server {
                status,
                body: String::new(),
            }),
            Health::Hang => std::future::pending().await,
        }
    }

    async fn classify(
        &self,
        url: &str,
        request: &ClassificationRequest,
    ) -> Result<ServiceReply, TransportError> {
        self.classify_calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_string());
        self.requests.lock().unwrap().push(request.clone());
        match &self.reply {
            Reply::Ok(reply) => Ok(reply.clone()),
            Reply::Status(status, body) => Err(TransportError::Server {
                status: *status,
                body: body.clone(),
            }),
            Reply::Broken(message) => Err(TransportError::Other(message.clone())),
            Reply::Hang => std::future::pending().await,
        }
    }

    async fn history(&self, url: &str, _source_id: &str) -> Result<HistoryReply, TransportError> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_string());
        match (&self.health, &self.history) {
            (Health::Hang, _) => std::future::pending().await,
            (_, Some(reply)) => Ok(reply.clone()),
            (_, None) => Err(TransportError::Server {
                status: 404,
                body: "not found".into(),
            }),
        }
    }
}
