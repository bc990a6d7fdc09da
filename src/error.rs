//! Error and fetch-outcome types shared by the remote clients and the sync.

use std::fmt;

use thiserror::Error;

/// Failures that abort a sync run.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("{service} rejected the credentials: {message}")]
    Auth {
        service: &'static str,
        message: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} returned status {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("Failed to decode {service} response: {message}")]
    Decode {
        service: &'static str,
        message: String,
    },

    #[error("Invalid cookie string: {0}")]
    InvalidCookie(String),

    #[error("Invalid URL '{0}'")]
    InvalidUrl(String),
}

/// Why a tolerated fetch produced no data.
#[derive(Debug, Clone, PartialEq)]
pub enum EmptyReason {
    /// Non-success HTTP status.
    Status(u16),
    /// The body was missing expected fields or had an unexpected shape.
    Malformed(String),
    /// The request never produced a response.
    Transport(String),
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyReason::Status(status) => write!(f, "status {}", status),
            EmptyReason::Malformed(e) => write!(f, "malformed response: {}", e),
            EmptyReason::Transport(e) => write!(f, "transport error: {}", e),
        }
    }
}

/// Result of a reading-source call whose failure degrades the sync instead
/// of aborting it.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Fetched(T),
    Empty(EmptyReason),
}

impl<T> FetchOutcome<T> {
    pub fn and_then<U>(self, f: impl FnOnce(T) -> FetchOutcome<U>) -> FetchOutcome<U> {
        match self {
            FetchOutcome::Fetched(value) => f(value),
            FetchOutcome::Empty(reason) => FetchOutcome::Empty(reason),
        }
    }
}
