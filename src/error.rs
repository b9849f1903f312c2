//! Custom error types for bugprompt
//!
//! User-friendly error messages for all failure scenarios.

use thiserror::Error;

/// Notification text used when a failure carries no usable server message
pub const GENERIC_FAILURE_MESSAGE: &str = "An error occurred";

/// Main error type for the bugprompt application
#[derive(Error, Debug)]
pub enum BugpromptError {
    /// The endpoint answered with a non-success status
    #[error("The server rejected the request (HTTP {status}): {}", message.as_deref().unwrap_or(GENERIC_FAILURE_MESSAGE))]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Server-provided `error` text, if the body had one
        message: Option<String>,
    },

    /// The endpoint answered 2xx but the body was not a usable prompt
    #[error("The server response could not be read: {0}")]
    MalformedResponse(String),

    /// Network request error (no response at all)
    #[error("Network request failed: {0}\n\n  → Is the prompt server running? Check 'bugprompt config get endpoint'.")]
    Network(#[from] reqwest::Error),

    /// Clipboard write failed
    #[error("Clipboard is unavailable: {0}")]
    Clipboard(String),

    /// Required form fields are blank
    #[error("Please fill in all required fields")]
    Incomplete(Vec<String>),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Endpoint URL could not be parsed
    #[error("Invalid endpoint URL: {0}\n\n  → Expected something like http://localhost:5000/api/process")]
    InvalidEndpoint(#[from] url::ParseError),

    /// IO error
    #[error("File operation failed: {0}")]
    Io(#[from] std::io::Error),

    /// TOML serialization/deserialization error
    #[error("Configuration file is invalid: {0}")]
    Toml(String),

    /// Terminal/TUI error
    #[error("Terminal error: {0}\n\n  → Try resizing your terminal or restarting it.")]
    Terminal(String),

    /// Invalid input from user
    #[error("{0}")]
    InvalidInput(String),
}

impl BugpromptError {
    /// Text shown in the notification when a submission fails.
    ///
    /// Only a rejection carrying a server `error` string is shown verbatim;
    /// every other failure falls back to the generic message.
    pub fn notification_message(&self) -> String {
        match self {
            BugpromptError::Rejected {
                message: Some(message),
                ..
            } if !message.is_empty() => message.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

impl From<toml::de::Error> for BugpromptError {
    fn from(err: toml::de::Error) -> Self {
        BugpromptError::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for BugpromptError {
    fn from(err: toml::ser::Error) -> Self {
        BugpromptError::Toml(err.to_string())
    }
}

impl From<arboard::Error> for BugpromptError {
    fn from(err: arboard::Error) -> Self {
        BugpromptError::Clipboard(err.to_string())
    }
}

/// Result type alias using BugpromptError
pub type Result<T> = std::result::Result<T, BugpromptError>;
