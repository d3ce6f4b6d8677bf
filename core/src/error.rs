//! Error taxonomy for the posts API client.
//!
//! # Design
//! `NoConnectivity` is split out of `TransportFailure` because the host
//! usually shows an actionable "you are offline" message for it. The split is
//! made from `TransportErrorKind`, never by inspecting message text.
//! `DecodingFailure` keeps the decoder message for logs only; callers match
//! on the variant.

use thiserror::Error;

use crate::http::{TransportError, TransportErrorKind};

/// Errors returned by `PostsClient`, `ResourceClient` and the state types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// A request URL could not be built from the base URL and parameters.
    #[error("invalid request URL: {0}")]
    InvalidRequest(String),

    #[error("no network connection")]
    NoConnectivity,

    /// Any other network-layer failure (timeout, DNS, TLS, reset).
    #[error("transport failure: {0}")]
    TransportFailure(#[source] TransportError),

    /// A response arrived with a status outside 200..=299.
    #[error("server returned HTTP {0}")]
    ServerError(u16),

    #[error("empty response body")]
    EmptyResponse,

    /// The body was present but did not match the expected shape.
    #[error("could not decode response: {0}")]
    DecodingFailure(String),
}

impl ApiError {
    /// Classify a transport failure by its structured cause.
    pub fn from_transport(err: TransportError) -> Self {
        match err.kind {
            TransportErrorKind::NotConnected => ApiError::NoConnectivity,
            _ => ApiError::TransportFailure(err),
        }
    }

    /// HTTP status carried by `ServerError`, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            ApiError::ServerError(status) => Some(*status),
            _ => None,
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        ApiError::from_transport(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_connected_maps_to_no_connectivity() {
        let err = TransportError::new(TransportErrorKind::NotConnected, "offline");
        assert_eq!(ApiError::from_transport(err), ApiError::NoConnectivity);
    }

    #[test]
    fn other_kinds_keep_their_cause() {
        for kind in [
            TransportErrorKind::TimedOut,
            TransportErrorKind::HostNotFound,
            TransportErrorKind::Tls,
            TransportErrorKind::ConnectionLost,
            TransportErrorKind::Other,
        ] {
            let err = TransportError::new(kind, "boom");
            match ApiError::from(err.clone()) {
                ApiError::TransportFailure(cause) => assert_eq!(cause, err),
                other => panic!("{kind:?} classified as {other:?}"),
            }
        }
    }

    #[test]
    fn http_status_only_for_server_error() {
        assert_eq!(ApiError::ServerError(503).http_status(), Some(503));
        assert_eq!(ApiError::EmptyResponse.http_status(), None);
    }

    #[test]
    fn display_messages() {
        assert_eq!(ApiError::ServerError(404).to_string(), "server returned HTTP 404");
        assert_eq!(ApiError::NoConnectivity.to_string(), "no network connection");
    }
}
