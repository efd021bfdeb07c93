//! Classify HTTP status codes and curl errors into retry error kinds.

use super::error::ErrorKind;

/// Classify a non-success HTTP status code.
///
/// 4xx is a client fault; everything else (5xx, unexpected 1xx/3xx) is transient.
pub fn classify_http_status(code: u16) -> ErrorKind {
    match code {
        400..=499 => ErrorKind::ClientFault,
        _ => ErrorKind::Transient,
    }
}

/// Classify a curl error.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    // The request can never be sent as written.
    if e.is_url_malformed() || e.is_unsupported_protocol() {
        return ErrorKind::ClientFault;
    }
    ErrorKind::Transient
}
