//! One network round trip per call: build, execute, parse.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::client::PostsClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::types::{FeedItem, PostDetail};

/// `PostsClient` plus the transport that carries its requests.
///
/// Holds no mutable state. Cloning shares the transport, so one connection
/// pool serves every state object built from the same client.
#[derive(Clone)]
pub struct ResourceClient {
    client: PostsClient,
    transport: Arc<dyn Transport>,
}

impl ResourceClient {
    pub fn new(client: PostsClient, transport: Arc<dyn Transport>) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &PostsClient {
        &self.client
    }

    pub fn fetch_feed(&self) -> Result<Vec<FeedItem>, ApiError> {
        let request = self.client.build_feed()?;
        let response = self.round_trip(&request)?;
        let items = self.client.parse_feed(response).inspect_err(|e| log_failure(&request, e))?;
        debug!(url = %request.url, count = items.len(), "feed decoded");
        Ok(items)
    }

    pub fn fetch_detail(&self, id: i64) -> Result<PostDetail, ApiError> {
        let request = self.client.build_detail(id)?;
        let response = self.round_trip(&request)?;
        self.client.parse_detail(response).inspect_err(|e| log_failure(&request, e))
    }

    fn round_trip(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(url = %request.url, "GET");
        self.transport.execute(request).map_err(|e| {
            let err = ApiError::from_transport(e);
            log_failure(request, &err);
            err
        })
    }
}

impl std::fmt::Debug for ResourceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceClient")
            .field("base_url", &self.client.base_url())
            .finish_non_exhaustive()
    }
}

fn log_failure(request: &HttpRequest, err: &ApiError) {
    warn!(url = %request.url, error = %err, "request failed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{TransportError, TransportErrorKind};
    use crate::testing::FakeTransport;

    fn resource(transport: &Arc<FakeTransport>) -> ResourceClient {
        ResourceClient::new(PostsClient::new("http://feed.test"), transport.clone())
    }

    #[test]
    fn fetch_feed_issues_one_get() {
        let transport = Arc::new(FakeTransport::new());
        transport.push_ok(200, r#"{"posts":[]}"#);
        let items = resource(&transport).fetch_feed().unwrap();
        assert!(items.is_empty());
        assert_eq!(transport.requested_urls(), vec!["http://feed.test/main.json"]);
    }

    #[test]
    fn fetch_detail_hits_id_path() {
        let transport = Arc::new(FakeTransport::new());
        transport.push_ok(
            200,
            r#"{"post":{"postId":12,"timeshamp":0,"title":"t","text":"b","postImage":"http://i","likes_count":1}}"#,
        );
        let detail = resource(&transport).fetch_detail(12).unwrap();
        assert_eq!(detail.id, 12);
        assert_eq!(transport.requested_urls(), vec!["http://feed.test/posts/12.json"]);
    }

    #[test]
    fn offline_is_no_connectivity() {
        let transport = Arc::new(FakeTransport::new());
        transport.push_err(TransportError::new(TransportErrorKind::NotConnected, "airplane mode"));
        let err = resource(&transport).fetch_feed().unwrap_err();
        assert_eq!(err, ApiError::NoConnectivity);
    }

    #[test]
    fn timeout_is_transport_failure_with_cause() {
        let transport = Arc::new(FakeTransport::new());
        transport.push_err(TransportError::new(TransportErrorKind::TimedOut, "60s"));
        match resource(&transport).fetch_detail(1).unwrap_err() {
            ApiError::TransportFailure(cause) => assert_eq!(cause.kind, TransportErrorKind::TimedOut),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn invalid_base_never_reaches_transport() {
        let transport = Arc::new(FakeTransport::new());
        let resource = ResourceClient::new(PostsClient::new("::::"), transport.clone());
        assert!(matches!(resource.fetch_feed(), Err(ApiError::InvalidRequest(_))));
        assert!(transport.requested_urls().is_empty());
    }

    #[test]
    fn clones_share_the_transport() {
        let transport = Arc::new(FakeTransport::new());
        transport.push_ok(200, r#"{"posts":[]}"#);
        transport.push_ok(200, r#"{"posts":[]}"#);
        let a = resource(&transport);
        let b = a.clone();
        a.fetch_feed().unwrap();
        b.fetch_feed().unwrap();
        assert_eq!(transport.requested_urls().len(), 2);
    }
}
