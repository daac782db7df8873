//! # Events Module
//!
//! Property-change notification from models and redraw requests for views.

pub mod property_change;
pub mod view_events;

pub use property_change::{
    ListenerRef, PropertyChangeEvent, PropertyChangeListener, PropertyChangeSupport,
};
pub use view_events::ViewEvent;
