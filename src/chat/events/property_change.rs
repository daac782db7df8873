//! # Property Change Notification
//!
//! Observer glue between models and views. A model owns a
//! `PropertyChangeSupport` and fires an event every time one of its named
//! properties is set. Delivery is synchronous on the calling thread.

use std::sync::{Arc, Mutex};

/// A change of one named model property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyChangeEvent {
    pub property: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

impl PropertyChangeEvent {
    pub fn new(
        property: impl Into<String>,
        old_value: Option<String>,
        new_value: Option<String>,
    ) -> Self {
        Self {
            property: property.into(),
            old_value,
            new_value,
        }
    }

    /// True when the event concerns the given property name
    pub fn is(&self, property: &str) -> bool {
        self.property == property
    }
}

/// Receiver of model property changes
pub trait PropertyChangeListener: Send + Sync {
    fn property_changed(&self, event: &PropertyChangeEvent);
}

/// Shared listener reference; identity is the pointer, not the value
pub type ListenerRef = Arc<dyn PropertyChangeListener>;

/// Listener registry with synchronous fan-out
#[derive(Default)]
pub struct PropertyChangeSupport {
    listeners: Mutex<Vec<ListenerRef>>,
}

impl PropertyChangeSupport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&self, listener: ListenerRef) {
        self.lock().push(listener);
    }

    /// Remove a previously added listener by reference
    ///
    /// Returns false when the listener was never registered.
    pub fn remove_listener(&self, listener: &ListenerRef) -> bool {
        let mut listeners = self.lock();
        let before = listeners.len();
        listeners.retain(|l| !Arc::ptr_eq(l, listener));
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.lock().len()
    }

    /// Notify every listener, even when `old_value == new_value`
    pub fn fire_property_change(
        &self,
        property: &str,
        old_value: Option<String>,
        new_value: Option<String>,
    ) {
        let event = PropertyChangeEvent::new(property, old_value, new_value);

        // Deliver outside the lock so listeners may (un)register re-entrantly
        let snapshot: Vec<ListenerRef> = self.lock().clone();
        tracing::trace!(
            "Firing '{}' change to {} listener(s)",
            property,
            snapshot.len()
        );
        for listener in snapshot {
            listener.property_changed(&event);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ListenerRef>> {
        self.listeners.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl std::fmt::Debug for PropertyChangeSupport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyChangeSupport")
            .field("listeners", &self.listener_count())
            .finish()
    }
}
