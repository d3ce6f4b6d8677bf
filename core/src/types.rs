//! Wire DTOs for the posts feed.
//!
//! # Design
//! Field names follow Rust conventions; `#[serde(rename)]` keeps the upstream
//! JSON names, including the `timeshamp` misspelling, which is part of the
//! published contract. The mock-server crate defines its own copies of these
//! shapes so integration tests catch schema drift.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// One summary row of the feed.
///
/// Identity is the post id: two items compare equal when their ids match,
/// even if the upstream feed changed the other fields between fetches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedItem {
    #[serde(rename = "postId")]
    pub id: i64,
    #[serde(rename = "timeshamp")]
    pub created_at: i64,
    pub title: String,
    pub preview_text: String,
    #[serde(rename = "likes_count")]
    pub like_count: u64,
}

impl PartialEq for FeedItem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FeedItem {}

impl Hash for FeedItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// The full record for a single post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostDetail {
    #[serde(rename = "postId")]
    pub id: i64,
    #[serde(rename = "timeshamp")]
    pub created_at: i64,
    pub title: String,
    #[serde(rename = "text")]
    pub body: String,
    #[serde(rename = "postImage")]
    pub image_url: String,
    #[serde(rename = "likes_count")]
    pub like_count: u64,
}

/// Envelope of `GET {base}/main.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedResponse {
    pub posts: Vec<FeedItem>,
}

/// Envelope of `GET {base}/posts/{id}.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailResponse {
    pub post: PostDetail,
}
