//! # Screen I/O
//!
//! The chat screen reads input through an `EventStream` and draws whole rows
//! through a `RenderStream`. Row output is queued until `present()`.
//!
//! ```text
//! AppController ──▶ TerminalEventStream / MockEventStream
//! TerminalRenderer ──▶ TerminalRenderStream (crossterm) / MockRenderStream (recorded)
//! ```

use anyhow::Result;
use crossterm::event::Event;
use std::time::Duration;

pub mod mock;
pub mod terminal;

pub use mock::{screen_text, MockEventStream, MockRenderStream, RenderCommand};
pub use terminal::{TerminalEventStream, TerminalRenderStream};

/// Columns and rows of the screen
pub type TerminalSize = (u16, u16);

/// How a row is painted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStyle {
    Plain,
    /// Reverse video, used by the status line
    Inverted,
}

pub trait EventStream: Send {
    /// Wait up to `timeout` for the next input event
    fn next_event(&mut self, timeout: Duration) -> Result<Option<Event>>;
}

pub trait RenderStream: Send {
    fn size(&self) -> Result<TerminalSize>;

    /// Enter raw mode on a blank alternate screen
    fn open_session(&mut self) -> Result<()>;

    /// Restore the terminal left by `open_session`, cursor visible
    fn close_session(&mut self) -> Result<()>;

    fn clear(&mut self) -> Result<()>;

    /// Paint `text` at the start of `row`; the caller pads it to the width
    fn draw_row(&mut self, row: u16, text: &str, style: RowStyle) -> Result<()>;

    fn hide_cursor(&mut self) -> Result<()>;

    /// Show the cursor at `column` of `row`
    fn park_cursor(&mut self, column: u16, row: u16) -> Result<()>;

    /// Flush queued output to the screen
    fn present(&mut self) -> Result<()>;
}
