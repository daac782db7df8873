//! # Application Controller
//!
//! Owns the event loop: maps key presses to chat intents and turns view
//! events into renders. Rendering only happens on this thread; results from
//! the request worker arrive as `ViewEvent`s over a channel.

use super::chat_controller::ChatController;
use crate::chat::events::ViewEvent;
use crate::chat::io::{EventStream, RenderStream, TerminalEventStream, TerminalRenderStream};
use crate::chat::models::{BoardModel, ComposeModel};
use crate::chat::services::{BoardTransport, HttpTransport};
use crate::chat::views::{BoardView, ChatScreen, TerminalRenderer};
use crate::cmd_args::CommandLineArgs;
use crate::config::ChatSettings;
use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// The main application controller
pub struct AppController<ES: EventStream, RS: RenderStream> {
    controller: ChatController,
    board_view: Arc<BoardView>,
    compose: ComposeModel,
    view_renderer: TerminalRenderer<RS>,
    event_stream: ES,
    view_events: Receiver<ViewEvent>,
    scroll_back: usize,
    request_pending: bool,
    should_quit: bool,
}

impl AppController<TerminalEventStream, TerminalRenderStream> {
    /// Production wiring: real terminal and HTTP transport
    pub fn new(cmd_args: &CommandLineArgs) -> Result<Self> {
        let settings = ChatSettings::resolve(cmd_args);
        tracing::debug!(
            "Board '{}' as '{}'",
            settings.board_url(),
            settings.username()
        );

        Self::with_io_streams(
            settings,
            Arc::new(HttpTransport::new()?),
            TerminalEventStream::new(),
            TerminalRenderStream::new(),
        )
    }
}

impl<ES: EventStream, RS: RenderStream> AppController<ES, RS> {
    /// Create the controller with injected transport and I/O streams
    pub fn with_io_streams(
        settings: ChatSettings,
        transport: Arc<dyn BoardTransport>,
        event_stream: ES,
        render_stream: RS,
    ) -> Result<Self> {
        let model = Arc::new(BoardModel::new(settings, transport)?);
        let view_renderer = TerminalRenderer::with_render_stream(render_stream)?;

        let (sender, view_events) = mpsc::channel();
        let board_view = Arc::new(BoardView::with_notifier(sender));

        let mut controller = ChatController::new(model);
        controller.register_view(board_view.clone());

        Ok(Self {
            controller,
            board_view,
            compose: ComposeModel::new(),
            view_renderer,
            event_stream,
            view_events,
            scroll_back: 0,
            request_pending: false,
            should_quit: false,
        })
    }

    pub fn controller(&self) -> &ChatController {
        &self.controller
    }

    pub fn board_view(&self) -> &Arc<BoardView> {
        &self.board_view
    }

    pub fn compose(&self) -> &ComposeModel {
        &self.compose
    }

    /// Run until the user quits; the terminal is restored even on error
    pub fn run(&mut self) -> Result<()> {
        self.view_renderer.initialize()?;

        let result = self.event_loop();
        let cleanup = self.view_renderer.cleanup();

        result.and(cleanup)
    }

    fn event_loop(&mut self) -> Result<()> {
        self.controller.initialize();
        self.render([ViewEvent::FullRedrawRequired])?;

        while !self.should_quit {
            if let Some(event) = self.event_stream.next_event(POLL_INTERVAL)? {
                let view_events = self.handle_event(event);
                self.render(view_events)?;
            }

            let mut pending: Vec<ViewEvent> = self.view_events.try_iter().collect();
            let busy = self.controller.model().is_request_pending();
            if busy != self.request_pending {
                self.request_pending = busy;
                pending.push(ViewEvent::StatusBarUpdateRequired);
            }
            if !pending.is_empty() && !self.should_quit {
                self.render(pending)?;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Vec<ViewEvent> {
        match event {
            Event::Key(key_event) => {
                tracing::debug!("Received key event: {:?}", key_event);
                self.handle_key(key_event)
            }
            Event::Resize(width, height) => {
                self.view_renderer.update_size(width, height);
                vec![ViewEvent::FullRedrawRequired]
            }
            _ => Vec::new(),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<ViewEvent> {
        if key.kind == KeyEventKind::Release {
            return Vec::new();
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('r') if ctrl => {
                self.controller.send_get_request();
            }
            KeyCode::Enter => {
                self.controller.send_post_request(self.compose.text());
            }
            KeyCode::Char(ch) if !ctrl => {
                self.compose.insert_char(ch);
                return vec![ViewEvent::InputRedrawRequired];
            }
            KeyCode::Backspace => {
                self.compose.backspace();
                return vec![ViewEvent::InputRedrawRequired];
            }
            KeyCode::Delete => {
                self.compose.delete();
                return vec![ViewEvent::InputRedrawRequired];
            }
            KeyCode::Left => {
                self.compose.move_left();
                return vec![ViewEvent::InputRedrawRequired];
            }
            KeyCode::Right => {
                self.compose.move_right();
                return vec![ViewEvent::InputRedrawRequired];
            }
            KeyCode::Home => {
                self.compose.move_home();
                return vec![ViewEvent::InputRedrawRequired];
            }
            KeyCode::End => {
                self.compose.move_end();
                return vec![ViewEvent::InputRedrawRequired];
            }
            KeyCode::PageUp => {
                let page = self.view_renderer.board_rows().max(1);
                let max = self
                    .view_renderer
                    .max_scroll_back(&self.board_view.displayed_text());
                self.scroll_back = (self.scroll_back + page).min(max);
                return vec![
                    ViewEvent::BoardRedrawRequired,
                    ViewEvent::StatusBarUpdateRequired,
                ];
            }
            KeyCode::PageDown => {
                let page = self.view_renderer.board_rows().max(1);
                self.scroll_back = self.scroll_back.saturating_sub(page);
                return vec![
                    ViewEvent::BoardRedrawRequired,
                    ViewEvent::StatusBarUpdateRequired,
                ];
            }
            _ => {}
        }

        Vec::new()
    }

    fn render(&mut self, events: impl IntoIterator<Item = ViewEvent>) -> Result<()> {
        let board_text = self.board_view.displayed_text();
        let settings = self.controller.model().settings();
        let screen = ChatScreen {
            board_text: &board_text,
            compose: &self.compose,
            board_url: settings.board_url(),
            username: settings.username(),
            request_pending: self.request_pending,
            scroll_back: self.scroll_back,
        };

        for event in ViewEvent::coalesce(events) {
            self.view_renderer.handle_view_event(&event, &screen)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::io::{MockEventStream, MockRenderStream, RenderCommand};
    use crate::chat::services::MockTransport;
    use reqwest::Method;

    fn app_with(
        events: MockEventStream,
        transport: Arc<MockTransport>,
    ) -> AppController<MockEventStream, MockRenderStream> {
        AppController::with_io_streams(
            ChatSettings::default(),
            transport,
            events,
            MockRenderStream::new(),
        )
        .unwrap()
    }

    #[test]
    fn typing_should_fill_the_compose_line() {
        let mut events = MockEventStream::new();
        events.push_text("hey");
        events.push_key(KeyCode::Backspace, KeyModifiers::NONE);
        events.push_key(KeyCode::Esc, KeyModifiers::NONE);
        let mut app = app_with(events, Arc::new(MockTransport::new()));

        app.run().unwrap();

        assert_eq!(app.compose().text(), "he");
    }

    #[test]
    fn enter_should_post_without_clearing_input() {
        let mut events = MockEventStream::new();
        events.push_text("hi");
        events.push_key(KeyCode::Enter, KeyModifiers::NONE);
        events.push_key(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let transport = Arc::new(MockTransport::new());
        let mut app = app_with(events, transport.clone());

        app.run().unwrap();

        let handle = app.controller().model().last_request().unwrap();
        assert!(handle.wait_timeout(Duration::from_secs(5)));

        let posts: Vec<_> = transport
            .requests()
            .into_iter()
            .filter(|r| r.method == Method::POST)
            .collect();
        assert_eq!(posts.len(), 1);
        assert_eq!(
            posts[0].body_json(),
            Some(serde_json::json!({"name": "USER", "message": "hi"}))
        );
        assert_eq!(app.compose().text(), "hi");
    }

    #[test]
    fn run_should_restore_the_terminal() {
        let mut events = MockEventStream::new();
        events.push_key(KeyCode::Esc, KeyModifiers::NONE);
        let stream = MockRenderStream::new();
        let history = stream.history();
        let mut app = AppController::with_io_streams(
            ChatSettings::default(),
            Arc::new(MockTransport::new()),
            events,
            stream,
        )
        .unwrap();

        app.run().unwrap();

        let commands = history.lock().unwrap().clone();
        assert_eq!(commands.first(), Some(&RenderCommand::OpenSession));
        assert_eq!(commands.last(), Some(&RenderCommand::CloseSession));
    }
}
