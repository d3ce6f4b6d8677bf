//! Detail screen state for one post.

use std::sync::{PoisonError, RwLock};

use crate::error::ApiError;
use crate::format::{format_date, format_likes};
use crate::resource::ResourceClient;
use crate::types::PostDetail;

/// Holds at most one `PostDetail`, always for the id given at construction.
/// Viewing another post means building another `DetailState`.
#[derive(Debug)]
pub struct DetailState {
    resource: ResourceClient,
    id: i64,
    detail: RwLock<Option<PostDetail>>,
}

impl DetailState {
    pub fn new(resource: ResourceClient, id: i64) -> Self {
        Self {
            resource,
            id,
            detail: RwLock::new(None),
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    /// Fetch and store the detail. A failed fetch leaves any earlier record
    /// in place.
    pub fn refresh(&self) -> Result<(), ApiError> {
        let fresh = self.resource.fetch_detail(self.id)?;
        *self.detail.write().unwrap_or_else(PoisonError::into_inner) = Some(fresh);
        Ok(())
    }

    pub fn detail(&self) -> Option<PostDetail> {
        self.detail.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// URL for the host to load the post image from.
    pub fn image_url(&self) -> Option<String> {
        self.with_detail(|d| d.image_url.clone())
    }

    pub fn formatted_date(&self) -> String {
        self.with_detail(|d| format_date(d.created_at)).unwrap_or_default()
    }

    pub fn formatted_likes(&self) -> String {
        self.with_detail(|d| format_likes(d.like_count)).unwrap_or_default()
    }

    fn with_detail<T>(&self, f: impl FnOnce(&PostDetail) -> T) -> Option<T> {
        self.detail.read().unwrap_or_else(PoisonError::into_inner).as_ref().map(f)
    }
}
