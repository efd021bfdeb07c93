//! Classified request error: the one error shape that crosses the
//! transport → retry → client boundary.

use std::fmt;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Classification of a failed attempt, decided where the failure is observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network failure, 5xx, or any other non-success that may clear up on its own.
    Transient,
    /// The request itself is wrong (4xx). Retrying cannot help.
    ClientFault,
    /// The attempt did not finish within its timeout.
    Timeout,
    /// Retry budget consumed; wraps the last cause.
    Exhausted,
}

impl ErrorKind {
    /// Whether another attempt may change the outcome.
    pub fn is_retryable(self) -> bool {
        match self {
            ErrorKind::Transient | ErrorKind::Timeout => true,
            ErrorKind::ClientFault | ErrorKind::Exhausted => false,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Transient => "transient",
            ErrorKind::ClientFault => "client fault",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Exhausted => "exhausted",
        };
        f.write_str(s)
    }
}

/// Error produced by a transport call or by the retry executor.
///
/// Never mutated after construction; [`ClassifiedError::exhausted`] builds a new
/// value that owns the previous one as its source.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ClassifiedError {
    kind: ErrorKind,
    status: Option<u16>,
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl ClassifiedError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
            source: None,
        }
    }

    /// Network-level failure or other recoverable condition.
    pub fn transient(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transient, message)
    }

    /// The attempt was cancelled by its timeout.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    /// A 4xx response.
    pub fn client_fault(status: u16, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ClientFault, message).with_status(status)
    }

    /// Build the error for a non-success HTTP status, classifying it with
    /// [`classify_http_status`](super::classify_http_status).
    pub fn from_status(status: u16, body_hint: &str) -> Self {
        let hint = body_hint.trim();
        let message = if hint.is_empty() {
            format!("HTTP {}", status)
        } else {
            format!("HTTP {}: {}", status, truncate(hint, 200))
        };
        Self::new(super::classify_http_status(status), message).with_status(status)
    }

    /// Terminal error after `attempts` failed attempts; `last` becomes the source.
    pub fn exhausted(attempts: u32, last: ClassifiedError) -> Self {
        Self {
            kind: ErrorKind::Exhausted,
            status: last.status,
            message: format!("Failed after {} attempts: {}", attempts, last.message),
            source: Some(Box::new(last)),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// HTTP status carried by the failure, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
