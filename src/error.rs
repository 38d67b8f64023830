//! Error handling for the Viddler client.
//!
//! The error type is built with `thiserror` and follows a small, fixed
//! taxonomy that the retry loop consults through [`Error::is_retryable`]:
//!
//! ```text
//! Error
//! ├── Network        - transport layer (connection, TLS, timeout); retryable
//! ├── Status         - HTTP status != 200; retryable
//! ├── EmptyResponse  - HTTP 200 with an empty body; retryable
//! ├── Parse          - malformed body for the declared format; terminal
//! ├── InvalidRequest - bad call parameters (e.g. missing file); terminal
//! ├── Authentication - missing/empty API key; terminal
//! └── Exhausted      - all attempts failed, wrapping the last error; terminal
//! ```
//!
//! Large variants are boxed to keep the enum small, and message fields use
//! `Cow<'static, str>` so static messages allocate nothing.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised by the transport layer before an HTTP status is available.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum NetworkError {
    /// Request timed out.
    #[error("request timeout")]
    Timeout,

    /// Connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// SSL/TLS error.
    #[error("SSL/TLS error: {0}")]
    Ssl(String),

    /// Opaque transport error for underlying issues.
    /// Uses `Box<dyn StdError>` to hide implementation details while
    /// preserving the source.
    #[error("transport error")]
    Transport(#[source] Box<dyn StdError + Send + Sync + 'static>),
}

/// Details of a response-decoding failure.
///
/// Carries a truncated preview of the offending body so logs stay bounded.
#[derive(Debug)]
pub struct ParseError {
    /// What went wrong (usually the serde error message).
    pub message: String,
    /// Truncated preview of the body that failed to decode.
    pub preview: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (body: {:?})", self.message, self.preview)
    }
}

impl StdError for ParseError {}

/// Main error type for all client operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Network-related errors encapsulating transport layer issues.
    /// Boxed to reduce enum size.
    #[error("Network error: {0}")]
    Network(#[source] Box<NetworkError>),

    /// The server answered with a non-200 status code.
    #[error("HTTP status {status}")]
    Status {
        /// HTTP status code of the failed response.
        status: u16,
        /// Response body as returned by the server (possibly empty).
        body: String,
    },

    /// The server answered 200 with an empty body.
    #[error("empty response body")]
    EmptyResponse,

    /// The body could not be decoded in the declared response format.
    /// Boxed to reduce enum size.
    #[error("Parse error: {0}")]
    Parse(#[source] Box<ParseError>),

    /// Invalid request parameters (e.g. a binary method without a file).
    #[error("Invalid request: {0}")]
    InvalidRequest(Cow<'static, str>),

    /// Missing or empty API key.
    #[error("Authentication error: {0}")]
    Authentication(Cow<'static, str>),

    /// All retry attempts were used up without a successful response.
    /// Carries the final attempt's error and, when one was observed,
    /// the last HTTP status.
    #[error("all {attempts} attempts failed: {last}")]
    Exhausted {
        /// How many attempts were made.
        attempts: u32,
        /// HTTP status of the final attempt, if the request got that far.
        status: Option<u16>,
        /// The error observed on the final attempt.
        #[source]
        last: Box<Error>,
    },
}

impl Error {
    /// Creates a network error from a connection failure message.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(Box::new(NetworkError::ConnectionFailed(msg.into())))
    }

    /// Creates a request-timeout error.
    pub fn timeout() -> Self {
        Self::Network(Box::new(NetworkError::Timeout))
    }

    /// Creates a non-200 status error.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Creates a parse error with a bounded preview of the offending body.
    pub fn parse(msg: impl Into<String>, body: &str) -> Self {
        Self::Parse(Box::new(ParseError {
            message: msg.into(),
            preview: body.chars().take(120).collect(),
        }))
    }

    /// Creates an invalid request error.
    /// Accepts both `&'static str` (zero allocation) and `String`.
    pub fn invalid_request(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Creates an authentication error.
    pub fn authentication(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Wraps the final attempt's error once the retry budget is spent.
    pub fn exhausted(attempts: u32, last: Error) -> Self {
        let status = last.status_code();
        Self::Exhausted {
            attempts,
            status,
            last: Box::new(last),
        }
    }

    /// Whether the retry loop may try again after this error.
    ///
    /// Transport failures, non-200 statuses and empty bodies are transient;
    /// everything else is terminal and must surface immediately.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Network(_) | Error::Status { .. } | Error::EmptyResponse
        )
    }

    /// The HTTP status associated with this error, if any.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            Error::Exhausted { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<NetworkError> for Error {
    fn from(err: NetworkError) -> Self {
        Self::Network(Box::new(err))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let network = if err.is_timeout() {
            NetworkError::Timeout
        } else if err.is_connect() {
            NetworkError::ConnectionFailed(err.to_string())
        } else {
            NetworkError::Transport(Box::new(err))
        };
        Self::Network(Box::new(network))
    }
}
