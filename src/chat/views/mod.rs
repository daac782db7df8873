//! # Views
//!
//! `BoardView` listens to the model; `TerminalRenderer` draws frames.

pub mod board_view;
pub mod terminal_renderer;

pub use board_view::BoardView;
pub use terminal_renderer::{wrap_text, ChatScreen, TerminalRenderer};
