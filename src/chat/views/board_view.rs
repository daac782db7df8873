//! # Board View
//!
//! Listener half of the chat screen. It keeps the text currently on display
//! and asks the UI loop for a redraw only when the model's output differs.

use crate::chat::events::{PropertyChangeEvent, PropertyChangeListener, ViewEvent};
use crate::chat::models::OUTPUT_PROPERTY;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct BoardView {
    displayed: Mutex<String>,
    redraws: AtomicUsize,
    notifier: Mutex<Option<Sender<ViewEvent>>>,
}

impl BoardView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward redraw requests to the UI loop through `notifier`
    pub fn with_notifier(notifier: Sender<ViewEvent>) -> Self {
        Self {
            notifier: Mutex::new(Some(notifier)),
            ..Self::default()
        }
    }

    pub fn displayed_text(&self) -> String {
        self.displayed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// How many times the board text actually changed on screen
    pub fn redraw_count(&self) -> usize {
        self.redraws.load(Ordering::SeqCst)
    }

    fn request_redraw(&self) {
        self.redraws.fetch_add(1, Ordering::SeqCst);

        let notifier = self.notifier.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(sender) = notifier.as_ref() {
            if sender.send(ViewEvent::BoardRedrawRequired).is_err() {
                tracing::debug!("UI loop is gone; board redraw dropped");
            }
        }
    }
}

impl PropertyChangeListener for BoardView {
    fn property_changed(&self, event: &PropertyChangeEvent) {
        let Some(new_text) = event.new_value.as_deref() else {
            return;
        };

        tracing::info!("New {} value from model: {}", event.property, new_text);

        if !event.is(OUTPUT_PROPERTY) {
            return;
        }

        {
            let mut displayed = self.displayed.lock().unwrap_or_else(|e| e.into_inner());
            if *displayed == new_text {
                return;
            }
            *displayed = new_text.to_string();
        }

        self.request_redraw();
    }
}
