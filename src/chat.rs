//! # Chat Module - MVC Architecture
//!
//! A single-screen client for a shared message board:
//!
//! - **Model**: `BoardModel` (output text, pending message, board JSON,
//!   request lifecycle) and `ComposeModel` (the input line)
//! - **View**: `BoardView` (listens to the model) and `TerminalRenderer`
//! - **Controller**: `ChatController` (intents) and `AppController` (event loop)
//!
//! ```text
//! ┌────────────────┐  intents  ┌──────────────┐  submit  ┌──────────────────┐
//! │ AppController  │──────────▶│ BoardModel   │─────────▶│ RequestExecutor  │
//! │ (key events)   │           │              │◀─────────│ (worker thread)  │
//! └───────▲────────┘           └──────┬───────┘  result  └──────────────────┘
//!         │ ViewEvent                 │ property change
//!         │                    ┌──────▼───────┐
//!         └────────────────────│  BoardView   │
//!                              └──────────────┘
//! ```

pub mod controllers;
pub mod events;
pub mod io;
pub mod models;
pub mod services;
pub mod views;

pub use controllers::{AppController, ChatController};
pub use events::{PropertyChangeEvent, PropertyChangeListener, ViewEvent};
pub use models::{BoardModel, ComposeModel, OUTPUT_PROPERTY};
pub use services::{BoardTransport, HttpTransport, RequestHandle};
pub use views::{BoardView, TerminalRenderer};
