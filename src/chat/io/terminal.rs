//! crossterm-backed screen I/O.

use super::{EventStream, RenderStream, RowStyle, TerminalSize};
use anyhow::Result;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use std::io::{self, Stdout, Write};
use std::time::Duration;

#[derive(Debug, Default)]
pub struct TerminalEventStream;

impl TerminalEventStream {
    pub fn new() -> Self {
        Self
    }
}

impl EventStream for TerminalEventStream {
    fn next_event(&mut self, timeout: Duration) -> Result<Option<Event>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        Ok(Some(event::read()?))
    }
}

/// Draws on stdout; an open session is closed again on drop
pub struct TerminalRenderStream {
    out: Stdout,
    session_open: bool,
}

impl TerminalRenderStream {
    pub fn new() -> Self {
        Self {
            out: io::stdout(),
            session_open: false,
        }
    }
}

impl Default for TerminalRenderStream {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderStream for TerminalRenderStream {
    fn size(&self) -> Result<TerminalSize> {
        Ok(terminal::size()?)
    }

    fn open_session(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.session_open = true;
        execute!(self.out, EnterAlternateScreen, Clear(ClearType::All))?;
        Ok(())
    }

    fn close_session(&mut self) -> Result<()> {
        if !self.session_open {
            return Ok(());
        }
        self.session_open = false;
        execute!(self.out, Show, LeaveAlternateScreen)?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        queue!(self.out, Clear(ClearType::All))?;
        Ok(())
    }

    fn draw_row(&mut self, row: u16, text: &str, style: RowStyle) -> Result<()> {
        queue!(self.out, MoveTo(0, row))?;
        match style {
            RowStyle::Plain => queue!(self.out, Print(text))?,
            RowStyle::Inverted => queue!(
                self.out,
                SetAttribute(Attribute::Reverse),
                Print(text),
                SetAttribute(Attribute::Reset)
            )?,
        }
        Ok(())
    }

    fn hide_cursor(&mut self) -> Result<()> {
        queue!(self.out, Hide)?;
        Ok(())
    }

    fn park_cursor(&mut self, column: u16, row: u16) -> Result<()> {
        queue!(self.out, MoveTo(column, row), Show)?;
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

impl Drop for TerminalRenderStream {
    fn drop(&mut self) {
        if let Err(e) = self.close_session() {
            tracing::error!("Failed to restore the terminal: {}", e);
        }
    }
}
