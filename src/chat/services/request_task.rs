//! # HTTP Request Task
//!
//! One board request, run on the executor's worker thread:
//!
//! ```text
//! checkpoint ─▶ build body (POST) ─▶ connect ─▶ checkpoint ─▶ read body ─▶ checkpoint ─▶ parse
//! ```
//!
//! Any failure along the way is logged and reported as `None`.

use super::error::RequestError;
use super::executor::RequestContext;
use super::http::{BoardRequest, BoardTransport};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// The JSON body of a POST
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub name: String,
    pub message: String,
}

impl OutgoingMessage {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Holds at most one message waiting to be serialized
///
/// Putting a new message replaces one that has not been taken yet.
#[derive(Debug, Default)]
pub struct Outbox {
    pending: Mutex<Option<OutgoingMessage>>,
}

impl Outbox {
    pub fn put(&self, message: OutgoingMessage) {
        if let Some(replaced) = self.lock().replace(message) {
            tracing::debug!("Unsent message replaced: {:?}", replaced.message);
        }
    }

    pub fn take(&self) -> Option<OutgoingMessage> {
        self.lock().take()
    }

    pub fn peek(&self) -> Option<OutgoingMessage> {
        self.lock().clone()
    }

    pub fn clear(&self) {
        self.lock().take();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<OutgoingMessage>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// A single GET/POST/DELETE against the board
pub struct RequestTask {
    method: Method,
    url: String,
    transport: Arc<dyn BoardTransport>,
}

impl RequestTask {
    pub fn new(method: Method, url: impl Into<String>, transport: Arc<dyn BoardTransport>) -> Self {
        Self {
            method,
            url: url.into(),
            transport,
        }
    }

    /// Run the request; every failure is logged and becomes `None`
    pub fn run(&self, ctx: &RequestContext, outbox: &Outbox) -> Option<Value> {
        match self.execute(ctx, outbox) {
            Ok(json) => {
                tracing::debug!("Request #{} {} completed", ctx.sequence(), self.method);
                Some(json)
            }
            Err(RequestError::Cancelled) => {
                tracing::debug!("Request #{} {} cancelled", ctx.sequence(), self.method);
                None
            }
            Err(e) => {
                tracing::error!(
                    "Request #{} {} {} failed ({}): {}",
                    ctx.sequence(),
                    self.method,
                    self.url,
                    e.kind(),
                    e
                );
                None
            }
        }
    }

    fn execute(&self, ctx: &RequestContext, outbox: &Outbox) -> Result<Value, RequestError> {
        ctx.checkpoint()?;

        let mut request = BoardRequest::new(self.method.clone(), self.url.clone());
        if self.method == Method::POST {
            request = request.with_body(build_post_body(outbox)?);
        }

        let response = self.transport.connect(request)?;

        ctx.checkpoint()?;

        let status = response.status();
        let body = if status == StatusCode::OK || status == StatusCode::CREATED {
            response.read_body()?
        } else {
            tracing::warn!("Board returned {}; response body skipped", status);
            String::new()
        };

        ctx.checkpoint()?;

        tracing::debug!("JSON: {}", body);
        parse_board_json(&body)
    }
}

/// Serialize the pending message, taking it out of the outbox
///
/// The message counts as sent from here on, whatever the network does.
pub fn build_post_body(outbox: &Outbox) -> Result<Vec<u8>, RequestError> {
    let outgoing = outbox.take().ok_or(RequestError::NothingToSend)?;
    Ok(serde_json::to_vec(&outgoing)?)
}

/// Parse a response body; only JSON objects are accepted
pub fn parse_board_json(body: &str) -> Result<Value, RequestError> {
    let json: Value = serde_json::from_str(body)?;
    if !json.is_object() {
        return Err(RequestError::NotAnObject);
    }
    Ok(json)
}
