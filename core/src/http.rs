//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. `PostsClient` builds an
//! `HttpRequest` and parses an `HttpResponse` without touching the network;
//! the round trip itself goes through a `Transport`, which the host supplies
//! (URLSession behind the C ABI, ureq in tests, an in-memory fake in unit
//! tests).
//!
//! All fields use owned types (`String`, `Vec`) so values can cross the FFI
//! boundary without lifetime concerns.

use thiserror::Error;

/// A GET request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

/// An HTTP response described as plain data.
///
/// Constructed by the transport after executing an `HttpRequest`, then
/// passed to `PostsClient::parse_*` for validation and decoding. The body is
/// kept as raw bytes; UTF-8 is checked by the JSON decoder.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Why a round trip failed before any HTTP status was received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The device has no network path at all.
    NotConnected,
    TimedOut,
    HostNotFound,
    Tls,
    ConnectionLost,
    Other,
}

/// A transport-level failure with a structured cause.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind:?}: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Executes exactly one HTTP round trip per call.
///
/// Implementations must be shareable across threads; the core never holds
/// a transport-level lock.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_display_includes_kind_and_message() {
        let err = TransportError::new(TransportErrorKind::TimedOut, "after 10s");
        assert_eq!(err.to_string(), "TimedOut: after 10s");
    }
}
