//! # View Events
//!
//! Events asking the UI loop to refresh part of the screen.
//! Views may raise them from any thread; only the UI loop renders.

/// Events emitted when view updates are needed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// Full screen redraw required (terminal resize, startup)
    FullRedrawRequired,

    /// The message board text changed
    BoardRedrawRequired,

    /// The input line changed
    InputRedrawRequired,

    /// Status line needs updating
    StatusBarUpdateRequired,
}

impl ViewEvent {
    /// Merge a batch of events into the cheapest equivalent set
    pub fn coalesce(events: impl IntoIterator<Item = ViewEvent>) -> Vec<ViewEvent> {
        let mut merged: Vec<ViewEvent> = Vec::new();
        for event in events {
            if event == ViewEvent::FullRedrawRequired {
                return vec![ViewEvent::FullRedrawRequired];
            }
            if !merged.contains(&event) {
                merged.push(event);
            }
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coalesce_should_drop_duplicates() {
        let merged = ViewEvent::coalesce([
            ViewEvent::BoardRedrawRequired,
            ViewEvent::InputRedrawRequired,
            ViewEvent::BoardRedrawRequired,
        ]);
        assert_eq!(
            merged,
            vec![ViewEvent::BoardRedrawRequired, ViewEvent::InputRedrawRequired]
        );
    }

    #[test]
    fn coalesce_should_collapse_into_full_redraw() {
        let merged = ViewEvent::coalesce([
            ViewEvent::StatusBarUpdateRequired,
            ViewEvent::FullRedrawRequired,
            ViewEvent::BoardRedrawRequired,
        ]);
        assert_eq!(merged, vec![ViewEvent::FullRedrawRequired]);
    }
}
