//! # Chat Controller
//!
//! Thin facade between user intents and the board model. It does no
//! validation of its own; every call is forwarded as is.

use crate::chat::events::ListenerRef;
use crate::chat::models::{BoardModel, OUTPUT_PROPERTY};
use crate::chat::services::RequestHandle;
use anyhow::Result;
use std::sync::Arc;

pub struct ChatController {
    model: Arc<BoardModel>,
    view: Option<ListenerRef>,
}

impl ChatController {
    pub fn new(model: Arc<BoardModel>) -> Self {
        Self { model, view: None }
    }

    pub fn model(&self) -> &Arc<BoardModel> {
        &self.model
    }

    /// Attach the view; a previously attached view is detached first
    pub fn register_view(&mut self, view: ListenerRef) {
        if let Some(previous) = self.view.take() {
            self.model.remove_listener(&previous);
        }
        self.model.add_listener(Arc::clone(&view));
        self.view = Some(view);
    }

    pub fn unregister_view(&mut self) {
        if let Some(view) = self.view.take() {
            self.model.remove_listener(&view);
        }
    }

    /// Reset the model and fetch the board
    pub fn initialize(&self) -> RequestHandle {
        self.model.init_default()
    }

    pub fn set_model_property(&self, name: &str, value: String) -> Result<()> {
        self.model.set_property(name, value)
    }

    pub fn change_output_text(&self, text: impl Into<String>) -> Result<()> {
        self.set_model_property(OUTPUT_PROPERTY, text.into())
    }

    pub fn send_get_request(&self) -> RequestHandle {
        self.model.send_get_request()
    }

    pub fn send_post_request(&self, message: impl Into<String>) -> RequestHandle {
        self.model.send_post_request(message)
    }

    pub fn send_delete_request(&self) -> RequestHandle {
        self.model.send_delete_request()
    }
}

impl Drop for ChatController {
    fn drop(&mut self) {
        self.unregister_view();
    }
}
