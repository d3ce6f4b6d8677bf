//! Stateless HTTP request builder and response parser for the posts API.
//!
//! # Design
//! `PostsClient` holds only a `base_url` and carries no mutable state between
//! calls. Each endpoint is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! Executing the round trip is somebody else's job (`ResourceClient` with an
//! injected `Transport`, or the host directly through the C ABI).

use serde::de::DeserializeOwned;
use url::Url;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{DetailResponse, FeedItem, FeedResponse, PostDetail};

/// Origin of the published JSON feed.
pub const DEFAULT_BASE_URL: &str = "https://raw.githubusercontent.com/anton-natife/jsons/master/api";

/// Synchronous, stateless client for the posts API.
#[derive(Debug, Clone)]
pub struct PostsClient {
    base_url: String,
}

impl Default for PostsClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl PostsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_feed(&self) -> Result<HttpRequest, ApiError> {
        self.get("main.json")
    }

    /// The id is not checked against the feed; unknown ids are the server's
    /// problem and usually come back as 404.
    pub fn build_detail(&self, id: i64) -> Result<HttpRequest, ApiError> {
        self.get(&format!("posts/{id}.json"))
    }

    pub fn parse_feed(&self, response: HttpResponse) -> Result<Vec<FeedItem>, ApiError> {
        let envelope: FeedResponse = decode(response)?;
        Ok(envelope.posts)
    }

    pub fn parse_detail(&self, response: HttpResponse) -> Result<PostDetail, ApiError> {
        let envelope: DetailResponse = decode(response)?;
        Ok(envelope.post)
    }

    fn get(&self, path: &str) -> Result<HttpRequest, ApiError> {
        let raw = format!("{}/{path}", self.base_url);
        let url = Url::parse(&raw).map_err(|e| ApiError::InvalidRequest(format!("{raw}: {e}")))?;
        Ok(HttpRequest {
            url: url.into(),
            headers: vec![("accept".to_string(), "application/json".to_string())],
        })
    }
}

/// Status, then emptiness (zero bytes), then shape. Invalid UTF-8 is a
/// shape error.
fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    if response.body.is_empty() {
        return Err(ApiError::EmptyResponse);
    }
    serde_json::from_slice(&response.body).map_err(|e| ApiError::DecodingFailure(e.to_string()))
}

fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if (200..=299).contains(&response.status) {
        Ok(())
    } else {
        Err(ApiError::ServerError(response.status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED_BODY: &str = r#"{"posts":[
        {"postId":3,"timeshamp":1700000000,"title":"Third","preview_text":"c","likes_count":1},
        {"postId":1,"timeshamp":1600000000,"title":"First","preview_text":"a","likes_count":0}
    ]}"#;

    fn client() -> PostsClient {
        PostsClient::new("http://localhost:3000")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        raw_response(status, body.as_bytes())
    }

    fn raw_response(status: u16, body: &[u8]) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_vec(),
        }
    }

    #[test]
    fn build_feed_produces_correct_request() {
        let req = client().build_feed().unwrap();
        assert_eq!(req.url, "http://localhost:3000/main.json");
        assert_eq!(
            req.headers,
            vec![("accept".to_string(), "application/json".to_string())]
        );
    }

    #[test]
    fn build_detail_embeds_id() {
        let req = client().build_detail(7).unwrap();
        assert_eq!(req.url, "http://localhost:3000/posts/7.json");
    }

    #[test]
    fn build_detail_does_not_validate_id() {
        let req = client().build_detail(-4).unwrap();
        assert_eq!(req.url, "http://localhost:3000/posts/-4.json");
    }

    #[test]
    fn default_client_targets_published_feed() {
        let req = PostsClient::default().build_feed().unwrap();
        assert_eq!(req.url, format!("{DEFAULT_BASE_URL}/main.json"));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = PostsClient::new("http://localhost:3000/");
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(client.build_feed().unwrap().url, "http://localhost:3000/main.json");
    }

    #[test]
    fn unparseable_base_is_invalid_request() {
        let err = PostsClient::new("not a url").build_feed().unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }

    #[test]
    fn parse_feed_keeps_received_order() {
        let items = client().parse_feed(response(200, FEED_BODY)).unwrap();
        let ids: Vec<i64> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![3, 1]);
        assert_eq!(items[0].preview_text, "c");
        assert_eq!(items[1].like_count, 0);
    }

    #[test]
    fn parse_feed_keeps_duplicates() {
        let body = r#"{"posts":[
            {"postId":1,"timeshamp":0,"title":"a","preview_text":"","likes_count":0},
            {"postId":1,"timeshamp":0,"title":"b","preview_text":"","likes_count":0}
        ]}"#;
        assert_eq!(client().parse_feed(response(200, body)).unwrap().len(), 2);
    }

    #[test]
    fn parse_feed_accepts_any_2xx() {
        assert!(client().parse_feed(response(203, FEED_BODY)).is_ok());
    }

    #[test]
    fn parse_feed_not_found() {
        let err = client().parse_feed(response(404, "")).unwrap_err();
        assert_eq!(err, ApiError::ServerError(404));
    }

    #[test]
    fn status_is_checked_before_body() {
        let err = client().parse_feed(response(500, FEED_BODY)).unwrap_err();
        assert_eq!(err, ApiError::ServerError(500));
    }

    #[test]
    fn redirect_status_is_server_error() {
        let err = client().parse_detail(response(304, "")).unwrap_err();
        assert_eq!(err, ApiError::ServerError(304));
    }

    #[test]
    fn parse_feed_empty_body() {
        let err = client().parse_feed(response(200, "")).unwrap_err();
        assert_eq!(err, ApiError::EmptyResponse);
    }

    #[test]
    fn whitespace_body_is_decoding_failure() {
        let err = client().parse_feed(response(200, " \n\t ")).unwrap_err();
        assert!(matches!(err, ApiError::DecodingFailure(_)));
    }

    #[test]
    fn invalid_utf8_body_is_decoding_failure() {
        let err = client().parse_feed(raw_response(200, b"\xff\xfe{")).unwrap_err();
        assert!(matches!(err, ApiError::DecodingFailure(_)));
    }

    #[test]
    fn bytes_after_nul_are_not_ignored() {
        let err = client()
            .parse_feed(raw_response(200, b"{\"posts\":[]}\0trailing"))
            .unwrap_err();
        assert!(matches!(err, ApiError::DecodingFailure(_)));
    }

    #[test]
    fn leading_nul_is_not_empty() {
        let err = client().parse_detail(raw_response(200, b"\0")).unwrap_err();
        assert!(matches!(err, ApiError::DecodingFailure(_)));
    }

    #[test]
    fn parse_feed_bad_json() {
        let err = client().parse_feed(response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::DecodingFailure(_)));
    }

    #[test]
    fn parse_feed_missing_field() {
        let body = r#"{"posts":[{"postId":1,"title":"no timestamp","preview_text":"","likes_count":0}]}"#;
        let err = client().parse_feed(response(200, body)).unwrap_err();
        assert!(matches!(err, ApiError::DecodingFailure(_)));
    }

    #[test]
    fn parse_detail_success() {
        let body = r#"{"post":{"postId":7,"timeshamp":1700000000,"title":"T","text":"B","postImage":"http://x/i.png","likes_count":42}}"#;
        let detail = client().parse_detail(response(200, body)).unwrap();
        assert_eq!(detail.id, 7);
        assert_eq!(detail.title, "T");
        assert_eq!(detail.body, "B");
        assert_eq!(detail.image_url, "http://x/i.png");
        assert_eq!(detail.like_count, 42);
    }

    #[test]
    fn parse_detail_wrong_envelope() {
        let err = client().parse_detail(response(200, FEED_BODY)).unwrap_err();
        assert!(matches!(err, ApiError::DecodingFailure(_)));
    }
}
