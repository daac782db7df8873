//! # Mock Transport
//!
//! Scripted `BoardTransport` for driving the request path without a network.

use super::error::RequestError;
use super::http::{BoardRequest, BoardTransport, TransportResponse};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::mpsc;
use std::sync::Mutex;
use std::time::Duration;

/// How long a held connect waits for release before giving up
const HOLD_LIMIT: Duration = Duration::from_secs(10);

/// Scripted outcome of one `connect` call
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    Respond { status: u16, body: String },
    ConnectionRefused,
}

impl MockReply {
    pub fn json(status: u16, value: &Value) -> Self {
        MockReply::Respond {
            status,
            body: value.to_string(),
        }
    }

    pub fn text(status: u16, body: impl Into<String>) -> Self {
        MockReply::Respond {
            status,
            body: body.into(),
        }
    }
}

/// A request as seen by the mock transport
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<Vec<u8>>,
}

impl RecordedRequest {
    pub fn body_json(&self) -> Option<Value> {
        self.body
            .as_deref()
            .and_then(|body| serde_json::from_slice(body).ok())
    }
}

/// Replies are consumed in order; once exhausted, the fallback repeats
#[derive(Debug)]
pub struct MockTransport {
    script: Mutex<VecDeque<MockReply>>,
    fallback: MockReply,
    requests: Mutex<Vec<RecordedRequest>>,
    hold: Mutex<Option<mpsc::Receiver<()>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::with_fallback(MockReply::text(200, r#"{"messages":""}"#))
    }

    pub fn with_fallback(fallback: MockReply) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            requests: Mutex::new(Vec::new()),
            hold: Mutex::new(None),
        }
    }

    pub fn push_reply(&self, reply: MockReply) {
        lock(&self.script).push_back(reply);
    }

    /// Block the next `connect` until the returned sender fires (or is dropped)
    pub fn hold_next_connect(&self) -> mpsc::Sender<()> {
        let (release, held) = mpsc::channel();
        *lock(&self.hold) = Some(held);
        release
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl BoardTransport for MockTransport {
    fn connect(&self, request: BoardRequest) -> Result<Box<dyn TransportResponse>, RequestError> {
        lock(&self.requests).push(RecordedRequest {
            method: request.method,
            url: request.url,
            body: request.body,
        });

        let held = lock(&self.hold).take();
        if let Some(held) = held {
            let _ = held.recv_timeout(HOLD_LIMIT);
        }

        let reply = lock(&self.script)
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        match reply {
            MockReply::Respond { status, body } => Ok(Box::new(MockResponse {
                status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                body,
            })),
            MockReply::ConnectionRefused => Err(RequestError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            ))),
        }
    }
}

struct MockResponse {
    status: StatusCode,
    body: String,
}

impl TransportResponse for MockResponse {
    fn status(&self) -> StatusCode {
        self.status
    }

    fn read_body(self: Box<Self>) -> Result<String, RequestError> {
        Ok(self.body)
    }
}
