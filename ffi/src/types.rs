//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! tagged enums with explicit discriminants. Conversion functions live here
//! to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::{c_void, CStr, CString};
use std::os::raw::c_char;

use posts_core::{
    ApiError, DetailState, FeedItem, FeedState, HttpRequest, HttpResponse, PostDetail, PostsClient,
    Transport, TransportError, TransportErrorKind,
};

/// Opaque handle to a `PostsClient`.
pub struct FfiPostsClient {
    pub(crate) inner: PostsClient,
}

/// Opaque handle to a `FeedState`.
pub struct FfiFeedState {
    pub(crate) inner: FeedState,
}

/// Opaque handle to a `DetailState`.
pub struct FfiDetailState {
    pub(crate) inner: DetailState,
}

/// Copy a Rust string into a C string owned by the caller. Interior NUL
/// bytes are dropped.
pub(crate) fn to_c_string(s: String) -> *mut c_char {
    let c = CString::new(s).unwrap_or_else(|e| {
        let mut bytes = e.into_vec();
        bytes.retain(|b| *b != 0);
        CString::new(bytes).unwrap_or_default()
    });
    c.into_raw()
}

/// Read a borrowed C string; null and invalid UTF-8 read as empty.
pub(crate) fn read_c_str(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().unwrap_or("").to_string()
}

/// Release a C string created by `to_c_string`. Null is ignored.
pub(crate) unsafe fn drop_c_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(unsafe { CString::from_raw(ptr) });
    }
}

/// Leak a vector as a pointer to its first element; null when empty.
fn into_raw_slice<T>(items: Vec<T>) -> *mut T {
    if items.is_empty() {
        return std::ptr::null_mut();
    }
    Box::into_raw(items.into_boxed_slice()) as *mut T
}

/// Reclaim a slice leaked by `into_raw_slice`.
unsafe fn from_raw_slice<T>(ptr: *mut T, len: u32) -> Box<[T]> {
    unsafe { Box::from_raw(std::ptr::slice_from_raw_parts_mut(ptr, len as usize)) }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// A GET request described as C-compatible plain data.
#[repr(C)]
pub struct FfiHttpRequest {
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: HttpRequest) -> *mut Self {
        let headers_len = req.headers.len() as u32;
        let headers = into_raw_slice(
            req.headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: to_c_string(k),
                    value: to_c_string(v),
                })
                .collect(),
        );
        Box::into_raw(Box::new(FfiHttpRequest {
            url: to_c_string(req.url),
            headers,
            headers_len,
        }))
    }

    /// Free a request created by `from_core`. Null is ignored.
    pub(crate) unsafe fn free(req: *mut Self) {
        if req.is_null() {
            return;
        }
        let req = unsafe { Box::from_raw(req) };
        unsafe { drop_c_string(req.url) };
        if !req.headers.is_null() {
            for h in unsafe { from_raw_slice(req.headers, req.headers_len) }.iter() {
                unsafe {
                    drop_c_string(h.key);
                    drop_c_string(h.value);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// Transport outcome reported by the host. `None` means an HTTP response
/// was received and `status`/`body` are meaningful.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FfiTransportErrorKind {
    None = 0,
    NotConnected = 1,
    TimedOut = 2,
    HostNotFound = 3,
    Tls = 4,
    ConnectionLost = 5,
    Other = 6,
}

impl FfiTransportErrorKind {
    fn to_core(self) -> Option<TransportErrorKind> {
        match self {
            FfiTransportErrorKind::None => None,
            FfiTransportErrorKind::NotConnected => Some(TransportErrorKind::NotConnected),
            FfiTransportErrorKind::TimedOut => Some(TransportErrorKind::TimedOut),
            FfiTransportErrorKind::HostNotFound => Some(TransportErrorKind::HostNotFound),
            FfiTransportErrorKind::Tls => Some(TransportErrorKind::Tls),
            FfiTransportErrorKind::ConnectionLost => Some(TransportErrorKind::ConnectionLost),
            FfiTransportErrorKind::Other => Some(TransportErrorKind::Other),
        }
    }
}

/// An HTTP response, or a transport failure, described as C-compatible data.
///
/// The host builds this after executing an `FfiHttpRequest`. `body` points
/// to `body_len` raw bytes (not NUL-terminated, any encoding); a null `body`
/// reads as empty. The FFI layer copies what it needs and never frees these
/// pointers.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const u8,
    pub body_len: usize,
    pub transport_error: FfiTransportErrorKind,
    pub transport_message: *const c_char,
}

impl FfiHttpResponse {
    pub(crate) fn to_core(&self) -> Result<HttpResponse, TransportError> {
        match self.transport_error.to_core() {
            Some(kind) => Err(TransportError::new(kind, read_c_str(self.transport_message))),
            None => Ok(HttpResponse {
                status: self.status,
                headers: Vec::new(),
                body: self.body_bytes(),
            }),
        }
    }

    fn body_bytes(&self) -> Vec<u8> {
        if self.body.is_null() || self.body_len == 0 {
            return Vec::new();
        }
        unsafe { std::slice::from_raw_parts(self.body, self.body_len) }.to_vec()
    }
}

// ---------------------------------------------------------------------------
// Host transport
// ---------------------------------------------------------------------------

/// Performs the GET described by `request` and returns the outcome. Must be
/// callable from any thread.
pub type FfiExecuteFn =
    extern "C" fn(request: *const FfiHttpRequest, user_data: *mut c_void) -> FfiHttpResponse;

/// Called once the core has copied a response, so the host can free the
/// buffers it handed out.
pub type FfiReleaseFn = extern "C" fn(response: *const FfiHttpResponse, user_data: *mut c_void);

/// Host networking callbacks passed to the state constructors.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct FfiTransport {
    pub execute: Option<FfiExecuteFn>,
    pub release: Option<FfiReleaseFn>,
    pub user_data: *mut c_void,
}

/// `Transport` backed by host callbacks.
pub(crate) struct HostTransport {
    execute: FfiExecuteFn,
    release: Option<FfiReleaseFn>,
    user_data: *mut c_void,
}

// The host promises `execute`/`release` are thread-safe for its `user_data`.
unsafe impl Send for HostTransport {}
unsafe impl Sync for HostTransport {}

impl HostTransport {
    pub(crate) fn from_ffi(transport: &FfiTransport) -> Option<Self> {
        Some(Self {
            execute: transport.execute?,
            release: transport.release,
            user_data: transport.user_data,
        })
    }
}

impl Transport for HostTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let ffi_req = FfiHttpRequest::from_core(request.clone());
        let response = (self.execute)(ffi_req, self.user_data);
        unsafe { FfiHttpRequest::free(ffi_req) };
        let result = response.to_core();
        if let Some(release) = self.release {
            release(&response, self.user_data);
        }
        result
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiPostsResult`.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    InvalidRequest = 1,
    NoConnectivity = 2,
    TransportFailure = 3,
    ServerError = 4,
    EmptyResponse = 5,
    DecodingFailure = 6,
    Panic = 7,
    NullArg = 8,
}

/// Tag that tells `posts_free_result` what `FfiPostsResult::data` points to.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiDataTag {
    None = 0,
    FeedItem = 1,
    FeedList = 2,
    PostDetail = 3,
}

/// One feed row exposed to C.
#[repr(C)]
pub struct FfiFeedItem {
    pub id: i64,
    pub created_at: i64,
    pub title: *mut c_char,
    pub preview_text: *mut c_char,
    pub like_count: u64,
}

impl FfiFeedItem {
    fn from_core(item: FeedItem) -> Self {
        FfiFeedItem {
            id: item.id,
            created_at: item.created_at,
            title: to_c_string(item.title),
            preview_text: to_c_string(item.preview_text),
            like_count: item.like_count,
        }
    }

    unsafe fn free_fields(&self) {
        unsafe {
            drop_c_string(self.title);
            drop_c_string(self.preview_text);
        }
    }
}

/// The feed exposed to C, in received order.
#[repr(C)]
pub struct FfiFeedList {
    pub items: *mut FfiFeedItem,
    pub len: u32,
}

/// A post detail exposed to C.
#[repr(C)]
pub struct FfiPostDetail {
    pub id: i64,
    pub created_at: i64,
    pub title: *mut c_char,
    pub body: *mut c_char,
    pub image_url: *mut c_char,
    pub like_count: u64,
}

impl FfiPostDetail {
    unsafe fn free_fields(&self) {
        unsafe {
            drop_c_string(self.title);
            drop_c_string(self.body);
            drop_c_string(self.image_url);
        }
    }
}

/// Result envelope for parse and state operations.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the payload tagged by `data_tag` (null with tag `None` when
/// there is nothing to return, e.g. an id lookup that found nothing).
/// On failure `error_code` describes the category, `error_message` is a
/// human-readable C string, `http_status` is set for `ServerError`, and
/// `data` is null.
#[repr(C)]
pub struct FfiPostsResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_tag: FfiDataTag,
    pub data: *mut c_void,
}

impl FfiPostsResult {
    fn ok(data_tag: FfiDataTag, data: *mut c_void) -> *mut Self {
        Box::into_raw(Box::new(FfiPostsResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: 0,
            data_tag,
            data,
        }))
    }

    fn err(error_code: FfiErrorCode, http_status: u16, msg: String) -> *mut Self {
        Box::into_raw(Box::new(FfiPostsResult {
            error_code,
            error_message: to_c_string(msg),
            http_status,
            data_tag: FfiDataTag::None,
            data: std::ptr::null_mut(),
        }))
    }

    /// Build a success result with no data payload.
    pub(crate) fn ok_empty() -> *mut Self {
        Self::ok(FfiDataTag::None, std::ptr::null_mut())
    }

    pub(crate) fn ok_feed_item(item: FeedItem) -> *mut Self {
        let data = Box::into_raw(Box::new(FfiFeedItem::from_core(item)));
        Self::ok(FfiDataTag::FeedItem, data as *mut c_void)
    }

    pub(crate) fn ok_feed_list<'a>(items: impl IntoIterator<Item = &'a FeedItem>) -> *mut Self {
        let items: Vec<FfiFeedItem> = items
            .into_iter()
            .map(|item| FfiFeedItem::from_core(item.clone()))
            .collect();
        let len = items.len() as u32;
        let list = Box::new(FfiFeedList {
            items: into_raw_slice(items),
            len,
        });
        Self::ok(FfiDataTag::FeedList, Box::into_raw(list) as *mut c_void)
    }

    pub(crate) fn ok_detail(detail: PostDetail) -> *mut Self {
        let data = Box::into_raw(Box::new(FfiPostDetail {
            id: detail.id,
            created_at: detail.created_at,
            title: to_c_string(detail.title),
            body: to_c_string(detail.body),
            image_url: to_c_string(detail.image_url),
            like_count: detail.like_count,
        }));
        Self::ok(FfiDataTag::PostDetail, data as *mut c_void)
    }

    /// Build an error result from an `ApiError`.
    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let msg = err.to_string();
        let code = match &err {
            ApiError::InvalidRequest(_) => FfiErrorCode::InvalidRequest,
            ApiError::NoConnectivity => FfiErrorCode::NoConnectivity,
            ApiError::TransportFailure(_) => FfiErrorCode::TransportFailure,
            ApiError::ServerError(_) => FfiErrorCode::ServerError,
            ApiError::EmptyResponse => FfiErrorCode::EmptyResponse,
            ApiError::DecodingFailure(_) => FfiErrorCode::DecodingFailure,
        };
        Self::err(code, err.http_status().unwrap_or(0), msg)
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::err(FfiErrorCode::NullArg, 0, format!("null argument: {name}"))
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::err(FfiErrorCode::Panic, 0, msg.to_string())
    }

    /// Free a result and whatever `data` points to. Null is ignored.
    pub(crate) unsafe fn free(result: *mut Self) {
        if result.is_null() {
            return;
        }
        let result = unsafe { Box::from_raw(result) };
        unsafe { drop_c_string(result.error_message) };
        if result.data.is_null() {
            return;
        }
        match result.data_tag {
            FfiDataTag::FeedItem => {
                let item = unsafe { Box::from_raw(result.data as *mut FfiFeedItem) };
                unsafe { item.free_fields() };
            }
            FfiDataTag::FeedList => {
                let list = unsafe { Box::from_raw(result.data as *mut FfiFeedList) };
                if !list.items.is_null() {
                    for item in unsafe { from_raw_slice(list.items, list.len) }.iter() {
                        unsafe { item.free_fields() };
                    }
                }
            }
            FfiDataTag::PostDetail => {
                let detail = unsafe { Box::from_raw(result.data as *mut FfiPostDetail) };
                unsafe { detail.free_fields() };
            }
            FfiDataTag::None => {}
        }
    }
}
