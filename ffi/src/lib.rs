//! C-ABI wrapper around `posts-core`.
//!
//! # Overview
//! Exposes the posts client and the feed/detail view state through
//! `extern "C"` functions so the native app can drive them without linking
//! serde or knowing anything about the wire format.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Two ways to do I/O: `posts_build_*` / `posts_parse_*` let the host run
//!   the request itself; the state handles take an `FfiTransport` and call
//!   back into the host from `refresh`.
//! - A single `FfiPostsResult` envelope with `FfiDataTag` + `void* data`
//!   conveys success payloads and errors uniformly.
//! - The C caller owns all returned pointers and must call the matching
//!   `posts_*_free` / `posts_free_*` function to release them.

pub mod types;

use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use posts_core::{ApiError, DetailState, FeedState, PostsClient, ResourceClient};

use types::*;

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new `PostsClient` bound to `base_url`.
///
/// Returns null if `base_url` is null or if an internal panic occurs.
/// The caller must free the returned pointer with `posts_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn posts_client_new(base_url: *const c_char) -> *mut FfiPostsClient {
    catch_unwind(|| {
        if base_url.is_null() {
            return std::ptr::null_mut();
        }
        let client = PostsClient::new(&read_c_str(base_url));
        Box::into_raw(Box::new(FfiPostsClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Create a `PostsClient` bound to the published feed.
#[unsafe(no_mangle)]
pub extern "C" fn posts_client_new_default() -> *mut FfiPostsClient {
    catch_unwind(|| {
        Box::into_raw(Box::new(FfiPostsClient {
            inner: PostsClient::default(),
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `posts_client_new*`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn posts_client_free(client: *mut FfiPostsClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Host-does-IO: build request / parse response
// ---------------------------------------------------------------------------

/// Build the feed request.
///
/// Returns null if `client` is null or the URL cannot be built.
/// The caller must free the returned pointer with `posts_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn posts_build_feed(client: *const FfiPostsClient) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        match client.inner.build_feed() {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the detail request for post `id`.
///
/// Returns null if `client` is null or the URL cannot be built.
#[unsafe(no_mangle)]
pub extern "C" fn posts_build_detail(client: *const FfiPostsClient, id: i64) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        match client.inner.build_detail(id) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Parse the response to a feed request.
///
/// Returns a result with `data_tag = FeedList` on success. A response whose
/// `transport_error` is set is classified like any other transport failure.
#[unsafe(no_mangle)]
pub extern "C" fn posts_parse_feed(
    client: *const FfiPostsClient,
    response: *const FfiHttpResponse,
) -> *mut FfiPostsResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiPostsResult::null_arg("client");
        }
        if response.is_null() {
            return FfiPostsResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        let parsed = resp
            .to_core()
            .map_err(ApiError::from_transport)
            .and_then(|r| client.inner.parse_feed(r));
        match parsed {
            Ok(items) => FfiPostsResult::ok_feed_list(&items),
            Err(e) => FfiPostsResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiPostsResult::panic("panic in posts_parse_feed"))
}

/// Parse the response to a detail request.
///
/// Returns a result with `data_tag = PostDetail` on success.
#[unsafe(no_mangle)]
pub extern "C" fn posts_parse_detail(
    client: *const FfiPostsClient,
    response: *const FfiHttpResponse,
) -> *mut FfiPostsResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiPostsResult::null_arg("client");
        }
        if response.is_null() {
            return FfiPostsResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        let parsed = resp
            .to_core()
            .map_err(ApiError::from_transport)
            .and_then(|r| client.inner.parse_detail(r));
        match parsed {
            Ok(detail) => FfiPostsResult::ok_detail(detail),
            Err(e) => FfiPostsResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiPostsResult::panic("panic in posts_parse_detail"))
}

// ---------------------------------------------------------------------------
// Feed state
// ---------------------------------------------------------------------------

fn resource(client: &FfiPostsClient, transport: &FfiTransport) -> Option<ResourceClient> {
    let transport = HostTransport::from_ffi(transport)?;
    Some(ResourceClient::new(client.inner.clone(), Arc::new(transport)))
}

/// Create feed state that fetches through `transport`.
///
/// Returns null if `client` is null or `transport.execute` is null.
/// The caller must free the returned pointer with `posts_feed_state_free`.
#[unsafe(no_mangle)]
pub extern "C" fn posts_feed_state_new(
    client: *const FfiPostsClient,
    transport: FfiTransport,
) -> *mut FfiFeedState {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        match resource(client, &transport) {
            Some(resource) => Box::into_raw(Box::new(FfiFeedState {
                inner: FeedState::new(resource),
            })),
            None => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free feed state. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn posts_feed_state_free(state: *mut FfiFeedState) {
    if !state.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(state) });
        }));
    }
}

/// Fetch the feed. Blocks until the host transport returns.
///
/// On success the result carries the list this call fetched
/// (`data_tag = FeedList`), even if another thread has refreshed since. On
/// failure the previously held list is unchanged.
#[unsafe(no_mangle)]
pub extern "C" fn posts_feed_state_refresh(state: *const FfiFeedState) -> *mut FfiPostsResult {
    catch_unwind(AssertUnwindSafe(|| {
        if state.is_null() {
            return FfiPostsResult::null_arg("state");
        }
        let state = unsafe { &*state };
        match state.inner.refresh() {
            Ok(installed) => FfiPostsResult::ok_feed_list(installed.iter()),
            Err(e) => FfiPostsResult::from_error(e),
        }
    }))
    .unwrap_or_else(|_| FfiPostsResult::panic("panic in posts_feed_state_refresh"))
}

/// Snapshot of the held list (`data_tag = FeedList`).
#[unsafe(no_mangle)]
pub extern "C" fn posts_feed_state_items(state: *const FfiFeedState) -> *mut FfiPostsResult {
    catch_unwind(AssertUnwindSafe(|| {
        if state.is_null() {
            return FfiPostsResult::null_arg("state");
        }
        let state = unsafe { &*state };
        FfiPostsResult::ok_feed_list(state.inner.items().iter())
    }))
    .unwrap_or_else(|_| FfiPostsResult::panic("panic in posts_feed_state_items"))
}

/// Look up a held row by id. Not finding it is a success with
/// `data_tag = None`.
#[unsafe(no_mangle)]
pub extern "C" fn posts_feed_state_item(state: *const FfiFeedState, id: i64) -> *mut FfiPostsResult {
    catch_unwind(AssertUnwindSafe(|| {
        if state.is_null() {
            return FfiPostsResult::null_arg("state");
        }
        let state = unsafe { &*state };
        match state.inner.item(id) {
            Some(item) => FfiPostsResult::ok_feed_item(item),
            None => FfiPostsResult::ok_empty(),
        }
    }))
    .unwrap_or_else(|_| FfiPostsResult::panic("panic in posts_feed_state_item"))
}

/// Whether row `id` shows its full preview text. False for null `state`.
#[unsafe(no_mangle)]
pub extern "C" fn posts_feed_state_is_expanded(state: *const FfiFeedState, id: i64) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if state.is_null() {
            return false;
        }
        unsafe { &*state }.inner.is_expanded(id)
    }))
    .unwrap_or(false)
}

/// Flip the expansion of row `id`. No-op for null `state`.
#[unsafe(no_mangle)]
pub extern "C" fn posts_feed_state_toggle_expanded(state: *const FfiFeedState, id: i64) {
    if state.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        unsafe { &*state }.inner.toggle_expanded(id);
    }));
}

// ---------------------------------------------------------------------------
// Detail state
// ---------------------------------------------------------------------------

/// Create detail state for post `id`, fetching through `transport`.
///
/// Returns null if `client` is null or `transport.execute` is null.
/// The caller must free the returned pointer with `posts_detail_state_free`.
#[unsafe(no_mangle)]
pub extern "C" fn posts_detail_state_new(
    client: *const FfiPostsClient,
    transport: FfiTransport,
    id: i64,
) -> *mut FfiDetailState {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        match resource(client, &transport) {
            Some(resource) => Box::into_raw(Box::new(FfiDetailState {
                inner: DetailState::new(resource, id),
            })),
            None => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free detail state. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn posts_detail_state_free(state: *mut FfiDetailState) {
    if !state.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(state) });
        }));
    }
}

/// Fetch the detail. Blocks until the host transport returns.
///
/// On success the result carries the record (`data_tag = PostDetail`).
#[unsafe(no_mangle)]
pub extern "C" fn posts_detail_state_refresh(state: *const FfiDetailState) -> *mut FfiPostsResult {
    catch_unwind(AssertUnwindSafe(|| {
        if state.is_null() {
            return FfiPostsResult::null_arg("state");
        }
        let state = unsafe { &*state };
        match state.inner.refresh().map(|()| state.inner.detail()) {
            Ok(Some(detail)) => FfiPostsResult::ok_detail(detail),
            Ok(None) => FfiPostsResult::ok_empty(),
            Err(e) => FfiPostsResult::from_error(e),
        }
    }))
    .unwrap_or_else(|_| FfiPostsResult::panic("panic in posts_detail_state_refresh"))
}

/// The held record, or `data_tag = None` before the first good refresh.
#[unsafe(no_mangle)]
pub extern "C" fn posts_detail_state_detail(state: *const FfiDetailState) -> *mut FfiPostsResult {
    catch_unwind(AssertUnwindSafe(|| {
        if state.is_null() {
            return FfiPostsResult::null_arg("state");
        }
        match unsafe { &*state }.inner.detail() {
            Some(detail) => FfiPostsResult::ok_detail(detail),
            None => FfiPostsResult::ok_empty(),
        }
    }))
    .unwrap_or_else(|_| FfiPostsResult::panic("panic in posts_detail_state_detail"))
}

/// `"14 November 2023"`, or `""` when nothing is held.
///
/// Returns null only if `state` is null. Free with `posts_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn posts_detail_state_formatted_date(state: *const FfiDetailState) -> *mut c_char {
    catch_unwind(AssertUnwindSafe(|| {
        if state.is_null() {
            return std::ptr::null_mut();
        }
        to_c_string(unsafe { &*state }.inner.formatted_date())
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// `"❤️ 42"`, or `""` when nothing is held.
///
/// Returns null only if `state` is null. Free with `posts_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn posts_detail_state_formatted_likes(state: *const FfiDetailState) -> *mut c_char {
    catch_unwind(AssertUnwindSafe(|| {
        if state.is_null() {
            return std::ptr::null_mut();
        }
        to_c_string(unsafe { &*state }.inner.formatted_likes())
    }))
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `posts_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn posts_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| unsafe { FfiHttpRequest::free(req) });
}

/// Free an `FfiPostsResult`. Safe to call with null. Uses `data_tag` to
/// determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn posts_free_result(result: *mut FfiPostsResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| unsafe { FfiPostsResult::free(result) });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn posts_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| unsafe { drop_c_string(s) });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
