//! Client core for the posts feed app.
//!
//! # Overview
//! Fetches a static JSON feed of posts and per-post detail records, and
//! keeps the small amount of view state the list and detail screens need.
//! The UI itself lives in the host app and talks to this crate directly or
//! through `posts-ffi`.
//!
//! # Design
//! - `PostsClient` is stateless: `build_*` produces a request, `parse_*`
//!   validates and decodes a response. No I/O.
//! - `ResourceClient` pairs it with an injected `Transport` to perform one
//!   round trip per call.
//! - `FeedState` / `DetailState` hold the last good result and replace it
//!   atomically; failures never touch held state.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod detail;
pub mod error;
pub mod feed;
pub mod format;
pub mod http;
pub mod resource;
pub mod types;

#[cfg(test)]
mod testing;

pub use client::{PostsClient, DEFAULT_BASE_URL};
pub use detail::DetailState;
pub use error::ApiError;
pub use feed::FeedState;
pub use format::{format_date, format_likes};
pub use http::{HttpRequest, HttpResponse, Transport, TransportError, TransportErrorKind};
pub use resource::ResourceClient;
pub use types::{DetailResponse, FeedItem, FeedResponse, PostDetail};
