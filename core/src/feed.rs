//! Most recent feed snapshot plus per-row expansion state.
//!
//! # Design
//! The snapshot is an `Arc<[FeedItem]>` behind an `RwLock`; `refresh` swaps
//! the whole pointer, so readers see either the old list or the new one.
//! Overlapping refreshes are not coordinated: whichever completes last wins.
//! The network call happens outside the lock, so a slow refresh never blocks
//! readers.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::debug;

use crate::error::ApiError;
use crate::resource::ResourceClient;
use crate::types::FeedItem;

#[derive(Debug)]
pub struct FeedState {
    resource: ResourceClient,
    items: RwLock<Arc<[FeedItem]>>,
    // Ids may outlive the rows they refer to; stale entries are harmless.
    expanded: Mutex<HashSet<i64>>,
}

impl FeedState {
    pub fn new(resource: ResourceClient) -> Self {
        Self {
            resource,
            items: RwLock::new(Arc::from(Vec::<FeedItem>::new())),
            expanded: Mutex::new(HashSet::new()),
        }
    }

    /// Fetch the feed and replace the held list. On error the previous list
    /// is kept and the error is returned unchanged.
    ///
    /// Returns the list this call installed, which may already have been
    /// replaced by a concurrent refresh by the time the caller reads it.
    pub fn refresh(&self) -> Result<Arc<[FeedItem]>, ApiError> {
        let fresh: Arc<[FeedItem]> = self.resource.fetch_feed()?.into();
        debug!(count = fresh.len(), "feed replaced");
        *self.items.write().unwrap_or_else(PoisonError::into_inner) = fresh.clone();
        Ok(fresh)
    }

    /// Current snapshot, in the order the server sent it.
    pub fn items(&self) -> Arc<[FeedItem]> {
        self.items.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn item(&self, id: i64) -> Option<FeedItem> {
        self.items().iter().find(|item| item.id == id).cloned()
    }

    pub fn is_expanded(&self, id: i64) -> bool {
        self.expanded.lock().unwrap_or_else(PoisonError::into_inner).contains(&id)
    }

    pub fn toggle_expanded(&self, id: i64) {
        let mut expanded = self.expanded.lock().unwrap_or_else(PoisonError::into_inner);
        if !expanded.remove(&id) {
            expanded.insert(id);
        }
    }
}
