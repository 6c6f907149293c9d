use std::error::Error as StdError;
use std::fmt;

use crate::core::chat_stream::format_api_error;

/// Failures surfaced by the backend adapter.
#[derive(Debug)]
pub enum ChatError {
    /// The host given to `/c` could not be turned into a usable base URL.
    InvalidHost {
        /// What the user typed.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The HTTP exchange itself failed (connection refused, reset, timeout).
    Http(reqwest::Error),

    /// The server answered with a non-success status.
    Api {
        status: reqwest::StatusCode,
        /// Response body, already formatted for display.
        body: String,
    },

    /// The server reported an error inside an otherwise successful stream.
    Stream(String),
}

impl ChatError {
    pub fn invalid_host(input: impl Into<String>, reason: impl Into<String>) -> Self {
        ChatError::InvalidHost {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Consume a non-success response into an `Api` error.
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<no body>".to_string());
        ChatError::Api {
            status,
            body: format_api_error(&body),
        }
    }
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::InvalidHost { input, reason } => {
                write!(f, "Invalid host '{input}': {reason}")
            }
            ChatError::Http(source) => write!(f, "HTTP request failed: {source}"),
            ChatError::Api { status, body } => {
                write!(f, "Request failed with status {status}: {body}")
            }
            ChatError::Stream(message) => write!(f, "{message}"),
        }
    }
}

impl StdError for ChatError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ChatError::Http(source) => Some(source),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(value: reqwest::Error) -> Self {
        ChatError::Http(value)
    }
}
