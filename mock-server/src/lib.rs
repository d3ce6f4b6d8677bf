use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::debug;

const PREVIEW_CHARS: usize = 80;

/// A post as stored by the server; the feed row is derived from it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "postId")]
    pub post_id: i64,
    pub timeshamp: i64,
    pub title: String,
    pub text: String,
    #[serde(rename = "postImage")]
    pub post_image: String,
    pub likes_count: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeedPost {
    #[serde(rename = "postId")]
    pub post_id: i64,
    pub timeshamp: i64,
    pub title: String,
    pub preview_text: String,
    pub likes_count: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Feed {
    pub posts: Vec<FeedPost>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Detail {
    pub post: Post,
}

impl From<&Post> for FeedPost {
    fn from(post: &Post) -> Self {
        FeedPost {
            post_id: post.post_id,
            timeshamp: post.timeshamp,
            title: post.title.clone(),
            preview_text: post.text.chars().take(PREVIEW_CHARS).collect(),
            likes_count: post.likes_count,
        }
    }
}

pub type Db = Arc<Vec<Post>>;

/// Fixture served by `app()`.
pub fn seed() -> Vec<Post> {
    vec![
        Post {
            post_id: 111,
            timeshamp: 1_700_000_000,
            title: "Morning in the mountains".to_string(),
            text: "We left before sunrise and reached the ridge just as the fog \
                   burned off the valley. The trail was quiet the whole way up."
                .to_string(),
            post_image: "https://picsum.photos/id/1018/600/400".to_string(),
            likes_count: 42,
        },
        Post {
            post_id: 112,
            timeshamp: 1_614_902_400,
            title: "Short one".to_string(),
            text: "Fits in a single line.".to_string(),
            post_image: "https://picsum.photos/id/1025/600/400".to_string(),
            likes_count: 0,
        },
        Post {
            post_id: 113,
            timeshamp: 1_704_067_200,
            title: "New year, new city".to_string(),
            text: "Moved across the country in late December. Boxes are still \
                   everywhere, but the coffee place downstairs already knows my order."
                .to_string(),
            post_image: "https://picsum.photos/id/1040/600/400".to_string(),
            likes_count: 1_234,
        },
    ]
}

pub fn app() -> Router {
    app_with(seed())
}

pub fn app_with(posts: Vec<Post>) -> Router {
    let db: Db = Arc::new(posts);
    Router::new()
        .route("/main.json", get(feed))
        .route("/posts/{file}", get(post))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn feed(State(db): State<Db>) -> Json<Feed> {
    debug!(count = db.len(), "serving feed");
    Json(Feed {
        posts: db.iter().map(FeedPost::from).collect(),
    })
}

/// `/posts/{id}.json`; anything that is not an integer id with the `.json`
/// suffix is a 404, same as an unknown id.
async fn post(State(db): State<Db>, Path(file): Path<String>) -> Result<Json<Detail>, StatusCode> {
    let id: i64 = file
        .strip_suffix(".json")
        .and_then(|id| id.parse().ok())
        .ok_or(StatusCode::NOT_FOUND)?;
    debug!(id, "serving post");
    db.iter()
        .find(|p| p.post_id == id)
        .cloned()
        .map(|post| Json(Detail { post }))
        .ok_or(StatusCode::NOT_FOUND)
}
