//! Configuration constants and utilities for simplechat
//!
//! The board endpoint and username are compile-time defaults that can be
//! overridden through the environment or the command line. Timeouts are fixed.

use crate::cmd_args::CommandLineArgs;
use std::time::Duration;

/// Default board endpoint used for GET, POST and DELETE
pub const DEFAULT_BOARD_URL: &str = "https://testbed.jaysnellen.com:8443/SimpleChat/board";

/// Default name attached to outgoing messages
pub const DEFAULT_USERNAME: &str = "USER";

/// Environment variable name for overriding the board URL
pub const BOARD_URL_ENV_VAR: &str = "SIMPLECHAT_BOARD_URL";

/// Environment variable name for overriding the username
pub const USERNAME_ENV_VAR: &str = "SIMPLECHAT_USERNAME";

/// Environment variable holding the tracing filter directives
pub const LOG_LEVEL_ENV_VAR: &str = "SIMPLECHAT_LOG_LEVEL";

/// Time allowed to establish a connection
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Time allowed to read a response once connected
pub const READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Text shown when the board has no messages yet
pub const EMPTY_BOARD_PLACEHOLDER: &str =
    "Nothing to show here. Post a message above to begin chatting...";

/// Get the board URL, checking environment variable first, then falling back to default
pub fn get_board_url() -> String {
    env_or_default(BOARD_URL_ENV_VAR, DEFAULT_BOARD_URL)
}

/// Get the username, checking environment variable first, then falling back to default
pub fn get_username() -> String {
    env_or_default(USERNAME_ENV_VAR, DEFAULT_USERNAME)
}

fn env_or_default(var: &str, default: &str) -> String {
    std::env::var_os(var)
        .and_then(|val| val.into_string().ok())
        .filter(|val| !val.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Resolved endpoint settings for a chat session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSettings {
    board_url: String,
    username: String,
}

impl ChatSettings {
    pub fn new(board_url: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            board_url: board_url.into(),
            username: username.into(),
        }
    }

    /// Resolve settings with command line taking precedence over the environment
    pub fn resolve(cmd_args: &CommandLineArgs) -> Self {
        let board_url = cmd_args
            .board_url()
            .cloned()
            .unwrap_or_else(get_board_url);
        let username = cmd_args.username().cloned().unwrap_or_else(get_username);
        Self::new(board_url, username)
    }

    pub fn board_url(&self) -> &str {
        &self.board_url
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self::new(DEFAULT_BOARD_URL, DEFAULT_USERNAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Tests in this module mutate process-wide environment variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn with_env_var<F: FnOnce()>(var: &str, value: Option<&str>, f: F) {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let original = std::env::var_os(var);

        match value {
            Some(v) => std::env::set_var(var, v),
            None => std::env::remove_var(var),
        }

        f();

        match original {
            Some(val) => std::env::set_var(var, val),
            None => std::env::remove_var(var),
        }
    }

    #[test]
    fn test_default_constants() {
        assert_eq!(DEFAULT_USERNAME, "USER");
        assert_eq!(CONNECT_TIMEOUT, Duration::from_secs(15));
        assert_eq!(READ_TIMEOUT, Duration::from_secs(10));
        assert!(DEFAULT_BOARD_URL.starts_with("https://"));
    }

    #[test]
    fn test_get_board_url_default() {
        with_env_var(BOARD_URL_ENV_VAR, None, || {
            assert_eq!(get_board_url(), DEFAULT_BOARD_URL);
        });
    }

    #[test]
    fn test_get_board_url_env_override() {
        with_env_var(BOARD_URL_ENV_VAR, Some("http://localhost:9000/board"), || {
            assert_eq!(get_board_url(), "http://localhost:9000/board");
        });
    }

    #[test]
    fn test_blank_env_value_falls_back_to_default() {
        with_env_var(USERNAME_ENV_VAR, Some("  "), || {
            assert_eq!(get_username(), DEFAULT_USERNAME);
        });
    }

    #[test]
    fn test_cli_takes_precedence_over_env() {
        with_env_var(USERNAME_ENV_VAR, Some("from-env"), || {
            let args = CommandLineArgs::parse_from(["simplechat", "--name", "from-cli"]);
            let settings = ChatSettings::resolve(&args);
            assert_eq!(settings.username(), "from-cli");

            let args = CommandLineArgs::parse_from(["simplechat"]);
            let settings = ChatSettings::resolve(&args);
            assert_eq!(settings.username(), "from-env");
        });
    }
}
