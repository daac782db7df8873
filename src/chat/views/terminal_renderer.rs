//! # Terminal Renderer
//!
//! Draws the chat screen through a `RenderStream`:
//!
//! ```text
//! row 0 .. h-3   message board (wrapped, newest at the bottom)
//! row h-2        status line
//! row h-1        "> " input line
//! ```

use crate::chat::events::ViewEvent;
use crate::chat::io::{RenderStream, RowStyle, TerminalSize};
use crate::chat::models::ComposeModel;
use anyhow::Result;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const INPUT_PROMPT: &str = "> ";

/// Everything the renderer needs to draw one frame
#[derive(Debug, Clone, Copy)]
pub struct ChatScreen<'a> {
    pub board_text: &'a str,
    pub compose: &'a ComposeModel,
    pub board_url: &'a str,
    pub username: &'a str,
    pub request_pending: bool,
    /// Wrapped lines scrolled back from the newest
    pub scroll_back: usize,
}

pub struct TerminalRenderer<RS: RenderStream> {
    render_stream: RS,
    terminal_size: TerminalSize,
}

impl<RS: RenderStream> TerminalRenderer<RS> {
    pub fn with_render_stream(render_stream: RS) -> Result<Self> {
        let terminal_size = render_stream.size()?;
        Ok(Self {
            render_stream,
            terminal_size,
        })
    }

    pub fn initialize(&mut self) -> Result<()> {
        self.render_stream.open_session()
    }

    pub fn cleanup(&mut self) -> Result<()> {
        self.render_stream.close_session()
    }

    pub fn update_size(&mut self, width: u16, height: u16) {
        self.terminal_size = (width, height);
    }

    pub fn render_stream(&self) -> &RS {
        &self.render_stream
    }

    fn width(&self) -> usize {
        usize::from(self.terminal_size.0)
    }

    /// Rows available to the board
    pub fn board_rows(&self) -> usize {
        usize::from(self.terminal_size.1.saturating_sub(2))
    }

    /// Largest useful `scroll_back` for the given board text
    pub fn max_scroll_back(&self, board_text: &str) -> usize {
        wrap_text(board_text, self.width())
            .len()
            .saturating_sub(self.board_rows())
    }

    pub fn render_full(&mut self, screen: &ChatScreen) -> Result<()> {
        self.render_stream.hide_cursor()?;
        self.render_stream.clear()?;
        self.draw_board(screen)?;
        self.draw_status(screen)?;
        self.draw_input(screen)
    }

    pub fn render_board(&mut self, screen: &ChatScreen) -> Result<()> {
        self.render_stream.hide_cursor()?;
        self.draw_board(screen)?;
        // Leave the cursor on the input line
        self.draw_input(screen)
    }

    pub fn render_status_bar(&mut self, screen: &ChatScreen) -> Result<()> {
        self.render_stream.hide_cursor()?;
        self.draw_status(screen)?;
        self.draw_input(screen)
    }

    pub fn render_input(&mut self, screen: &ChatScreen) -> Result<()> {
        self.render_stream.hide_cursor()?;
        self.draw_input(screen)
    }

    pub fn handle_view_event(&mut self, event: &ViewEvent, screen: &ChatScreen) -> Result<()> {
        match event {
            ViewEvent::FullRedrawRequired => self.render_full(screen),
            ViewEvent::BoardRedrawRequired => self.render_board(screen),
            ViewEvent::InputRedrawRequired => self.render_input(screen),
            ViewEvent::StatusBarUpdateRequired => self.render_status_bar(screen),
        }
    }

    fn draw_board(&mut self, screen: &ChatScreen) -> Result<()> {
        let width = self.width();
        let rows = self.board_rows();
        let lines = wrap_text(screen.board_text, width);

        let max_back = lines.len().saturating_sub(rows);
        let end = lines.len() - screen.scroll_back.min(max_back);
        let start = end.saturating_sub(rows);

        for row in 0..rows {
            let line = lines.get(start + row).map_or("", String::as_str);
            self.render_stream
                .draw_row(row as u16, &pad_to_width(line, width), RowStyle::Plain)?;
        }
        Ok(())
    }

    fn draw_status(&mut self, screen: &ChatScreen) -> Result<()> {
        let width = self.width();
        let row = self.terminal_size.1.saturating_sub(2);
        let state = if screen.request_pending {
            "Sending..."
        } else {
            "Ready"
        };
        let scroll = if screen.scroll_back > 0 {
            format!(" | scrolled {}", screen.scroll_back)
        } else {
            String::new()
        };
        let text = format!(
            " {} @ {} | {}{} | Enter: post  Ctrl+R: refresh  Esc: quit",
            screen.username, screen.board_url, state, scroll
        );

        self.render_stream.draw_row(
            row,
            &pad_to_width(&truncate_to_width(&text, width), width),
            RowStyle::Inverted,
        )
    }

    fn draw_input(&mut self, screen: &ChatScreen) -> Result<()> {
        let width = self.width();
        let row = self.terminal_size.1.saturating_sub(1);
        let prompt_width = INPUT_PROMPT.width();
        let field_width = width.saturating_sub(prompt_width).max(1);

        // Scroll the field horizontally so the cursor stays visible
        let text = screen.compose.text();
        let cursor_col = screen.compose.cursor_display_column();
        let mut skip_cols = 0;
        let mut skipped = text.chars();
        while cursor_col.saturating_sub(skip_cols) >= field_width {
            match skipped.next() {
                Some(ch) => skip_cols += ch.width().unwrap_or(0),
                None => break,
            }
        }
        let visible = truncate_to_width(skipped.as_str(), field_width);

        self.render_stream.draw_row(
            row,
            &pad_to_width(&format!("{INPUT_PROMPT}{visible}"), width),
            RowStyle::Plain,
        )?;

        let cursor_x =
            (prompt_width + cursor_col.saturating_sub(skip_cols)).min(width.saturating_sub(1));
        self.render_stream.park_cursor(cursor_x as u16, row)?;
        self.render_stream.present()
    }
}

/// Wrap text into display lines no wider than `width` columns
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for raw_line in text.split('\n') {
        let raw_line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
        let mut current = String::new();
        let mut current_width = 0;

        for ch in raw_line.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if current_width + ch_width > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(ch);
            current_width += ch_width;
        }
        lines.push(current);
    }

    lines
}

fn truncate_to_width(text: &str, width: usize) -> String {
    let mut used = 0;
    text.chars()
        .take_while(|ch| {
            used += ch.width().unwrap_or(0);
            used <= width
        })
        .collect()
}

fn pad_to_width(text: &str, width: usize) -> String {
    let padding = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(padding))
}
