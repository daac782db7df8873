//! # Models
//!
//! The board model (remote state and request lifecycle) and the compose
//! model (the local input line).

pub mod board_model;
pub mod compose_model;

pub use board_model::{BoardModel, OUTPUT_PROPERTY};
pub use compose_model::ComposeModel;
