//! Failure kinds of a board request.
//!
//! None of these reach the model: the request task logs them and reports
//! "no result".

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("request was cancelled")]
    Cancelled,

    #[error("HTTP transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response JSON is not an object")]
    NotAnObject,

    #[error("no pending message to post")]
    NothingToSend,
}

impl RequestError {
    /// Short label used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            RequestError::Cancelled => "cancelled",
            RequestError::Transport(_) => "transport",
            RequestError::Io(_) => "io",
            RequestError::Json(_) => "json",
            RequestError::NotAnObject => "not-an-object",
            RequestError::NothingToSend => "nothing-to-send",
        }
    }
}
