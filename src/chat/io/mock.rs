//! # Mock Screen I/O
//!
//! Scripted input and a render stream that records what it was asked to
//! draw, for driving the chat screen without a terminal.

use super::{EventStream, RenderStream, RowStyle, TerminalSize};
use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Replays queued events; reports no input once they run out
#[derive(Debug, Default)]
pub struct MockEventStream {
    events: VecDeque<Event>,
}

impl MockEventStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_event(&mut self, event: Event) {
        self.events.push_back(event);
    }

    /// Queue one key press per character of `text`
    pub fn push_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.push_key(KeyCode::Char(ch), KeyModifiers::NONE);
        }
    }

    pub fn push_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        self.push_event(Event::Key(KeyEvent::new(code, modifiers)));
    }
}

impl EventStream for MockEventStream {
    fn next_event(&mut self, _timeout: Duration) -> Result<Option<Event>> {
        Ok(self.events.pop_front())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCommand {
    OpenSession,
    CloseSession,
    Clear,
    DrawRow {
        row: u16,
        text: String,
        style: RowStyle,
    },
    HideCursor,
    ParkCursor(u16, u16),
    Present,
}

/// Command log shared with tests; readable after the stream is moved
pub type CommandHistory = Arc<Mutex<Vec<RenderCommand>>>;

pub struct MockRenderStream {
    commands: CommandHistory,
    size: TerminalSize,
    session_open: bool,
    cursor_visible: bool,
}

impl MockRenderStream {
    pub fn new() -> Self {
        Self::with_size((80, 24))
    }

    pub fn with_size(size: TerminalSize) -> Self {
        Self {
            commands: Arc::default(),
            size,
            session_open: false,
            cursor_visible: true,
        }
    }

    pub fn history(&self) -> CommandHistory {
        Arc::clone(&self.commands)
    }

    pub fn is_session_open(&self) -> bool {
        self.session_open
    }

    pub fn is_cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    fn record(&self, command: RenderCommand) {
        self.commands
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(command);
    }
}

impl Default for MockRenderStream {
    fn default() -> Self {
        Self::new()
    }
}

/// Replay the recorded rows and return the screen, one line per drawn row
///
/// A `Clear` blanks everything drawn before it. Trailing padding is trimmed.
pub fn screen_text(history: &CommandHistory) -> String {
    let commands = history.lock().unwrap_or_else(|e| e.into_inner());
    let mut rows: BTreeMap<u16, &str> = BTreeMap::new();

    for command in commands.iter() {
        match command {
            RenderCommand::Clear => rows.clear(),
            RenderCommand::DrawRow { row, text, .. } => {
                rows.insert(*row, text.trim_end());
            }
            _ => {}
        }
    }

    let lines: Vec<&str> = rows.into_values().collect();
    lines.join("\n")
}

impl RenderStream for MockRenderStream {
    fn size(&self) -> Result<TerminalSize> {
        Ok(self.size)
    }

    fn open_session(&mut self) -> Result<()> {
        self.record(RenderCommand::OpenSession);
        self.session_open = true;
        Ok(())
    }

    fn close_session(&mut self) -> Result<()> {
        self.record(RenderCommand::CloseSession);
        self.session_open = false;
        self.cursor_visible = true;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.record(RenderCommand::Clear);
        Ok(())
    }

    fn draw_row(&mut self, row: u16, text: &str, style: RowStyle) -> Result<()> {
        self.record(RenderCommand::DrawRow {
            row,
            text: text.to_string(),
            style,
        });
        Ok(())
    }

    fn hide_cursor(&mut self) -> Result<()> {
        self.record(RenderCommand::HideCursor);
        self.cursor_visible = false;
        Ok(())
    }

    fn park_cursor(&mut self, column: u16, row: u16) -> Result<()> {
        self.record(RenderCommand::ParkCursor(column, row));
        self.cursor_visible = true;
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        self.record(RenderCommand::Present);
        Ok(())
    }
}
