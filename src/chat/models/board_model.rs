//! # Board Model
//!
//! Web-service model behind the chat screen. It owns the output text, the
//! pending outgoing message, the latest board JSON and the request executor.
//! Results arrive on the worker thread and are announced to listeners there.

use crate::chat::events::{ListenerRef, PropertyChangeSupport};
use crate::chat::services::{
    BoardTransport, OutgoingMessage, Outbox, RequestContext, RequestExecutor, RequestHandle,
    RequestTask,
};
use crate::config::{ChatSettings, EMPTY_BOARD_PLACEHOLDER};
use anyhow::Result;
use reqwest::Method;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// Name of the output text property
pub const OUTPUT_PROPERTY: &str = "Output";

/// State shared with request tasks on the worker thread
struct BoardShared {
    settings: ChatSettings,
    transport: Arc<dyn BoardTransport>,
    support: PropertyChangeSupport,
    output_text: Mutex<Option<String>>,
    outbox: Outbox,
    json_data: watch::Sender<Option<Value>>,
}

pub struct BoardModel {
    shared: Arc<BoardShared>,
    executor: RequestExecutor,
}

impl BoardModel {
    pub fn new(settings: ChatSettings, transport: Arc<dyn BoardTransport>) -> Result<Self> {
        let (json_data, _) = watch::channel(None);
        let shared = Arc::new(BoardShared {
            settings,
            transport,
            support: PropertyChangeSupport::new(),
            output_text: Mutex::new(None),
            outbox: Outbox::default(),
            json_data,
        });

        Ok(Self {
            shared,
            executor: RequestExecutor::new()?,
        })
    }

    /// Reset to defaults and fetch the board
    pub fn init_default(&self) -> RequestHandle {
        self.shared.outbox.clear();
        self.send_get_request()
    }

    pub fn settings(&self) -> &ChatSettings {
        &self.shared.settings
    }

    pub fn add_listener(&self, listener: ListenerRef) {
        self.shared.support.add_listener(listener);
    }

    pub fn remove_listener(&self, listener: &ListenerRef) -> bool {
        self.shared.support.remove_listener(listener)
    }

    pub fn output_text(&self) -> Option<String> {
        self.shared.lock_output().clone()
    }

    pub fn set_output_text(&self, text: impl Into<String>) {
        self.shared.set_output_text(text.into());
    }

    /// Set a named property
    pub fn set_property(&self, name: &str, value: String) -> Result<()> {
        match name {
            OUTPUT_PROPERTY => {
                self.set_output_text(value);
                Ok(())
            }
            other => anyhow::bail!("Unknown model property '{other}'"),
        }
    }

    /// The message waiting to be serialized, if any
    pub fn pending_message(&self) -> Option<OutgoingMessage> {
        self.shared.outbox.peek()
    }

    /// Observe the latest board JSON
    pub fn json_data(&self) -> watch::Receiver<Option<Value>> {
        self.shared.json_data.subscribe()
    }

    pub fn latest_json(&self) -> Option<Value> {
        self.shared.json_data.borrow().clone()
    }

    /// Handle of the most recently submitted request
    pub fn last_request(&self) -> Option<RequestHandle> {
        self.executor.pending()
    }

    pub fn is_request_pending(&self) -> bool {
        self.executor.is_busy()
    }

    pub fn send_get_request(&self) -> RequestHandle {
        self.start_request(Method::GET)
    }

    /// Queue `message` as the pending outgoing message and POST it
    pub fn send_post_request(&self, message: impl Into<String>) -> RequestHandle {
        let outgoing = OutgoingMessage::new(self.shared.settings.username(), message);
        self.shared.outbox.put(outgoing);
        self.start_request(Method::POST)
    }

    pub fn send_delete_request(&self) -> RequestHandle {
        self.start_request(Method::DELETE)
    }

    fn start_request(&self, method: Method) -> RequestHandle {
        let task = RequestTask::new(
            method,
            self.shared.settings.board_url(),
            Arc::clone(&self.shared.transport),
        );
        let shared = Arc::clone(&self.shared);

        self.executor.submit(move |ctx| {
            let result = task.run(ctx, &shared.outbox);
            shared.deliver(ctx, result);
        })
    }
}

impl BoardShared {
    fn deliver(&self, ctx: &RequestContext, result: Option<Value>) {
        let Some(json) = result else {
            tracing::debug!("Request #{} produced no result", ctx.sequence());
            return;
        };

        if !ctx.is_latest() {
            tracing::debug!("Discarding stale result of request #{}", ctx.sequence());
            return;
        }

        self.set_json_data(json);
    }

    fn set_json_data(&self, json: Value) {
        let messages = json.get("messages").map(messages_text);

        self.json_data.send_replace(Some(json));

        match messages {
            Some(messages) if messages.is_empty() => {
                self.set_output_text(EMPTY_BOARD_PLACEHOLDER.to_string())
            }
            Some(messages) => self.set_output_text(messages),
            None => tracing::warn!("Board response has no 'messages' field"),
        }
    }

    fn set_output_text(&self, new_text: String) {
        let old_text = self.lock_output().replace(new_text.clone());

        tracing::info!("Output text change: from {:?} to {:?}", old_text, new_text);

        self.support
            .fire_property_change(OUTPUT_PROPERTY, old_text, Some(new_text));
    }

    fn lock_output(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.output_text.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Board text of a `messages` value; non-strings are shown as their JSON text
fn messages_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
