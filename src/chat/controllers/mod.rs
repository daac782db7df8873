//! # Controllers
//!
//! `ChatController` forwards user intents to the model; `AppController`
//! runs the terminal event loop around it.

pub mod app_controller;
pub mod chat_controller;

pub use app_controller::AppController;
pub use chat_controller::ChatController;
