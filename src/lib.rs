//! # SimpleChat - Terminal Client for a Shared Message Board
//!
//! Shows the board fetched from a remote endpoint and posts new messages to it.
//! Requests run on one background worker; a new request cancels the previous
//! one, and results flow back to the screen through property-change events.

pub mod chat;
pub mod cmd_args;
pub mod config;

pub use chat::*;
