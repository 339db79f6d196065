//! `#[repr(C)]` types for the FFI boundary.
//!
//! Each type mirrors a core type with C-compatible representations:
//! `*mut c_char` instead of `String`, pointer + length instead of `Vec`, and
//! tagged enums with explicit discriminants. Conversions live here so
//! `lib.rs` stays focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use todo_view::{HostDriver, HostEffect, HttpMethod, HttpRequest, Notification, NotifyLevel};

/// Opaque handle to a view controller. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiTodoView {
    pub(crate) inner: HostDriver,
}

/// Copy `s` into a C string owned by the caller. Interior NULs yield "".
pub(crate) fn c_string(s: String) -> *mut c_char {
    CString::new(s).unwrap_or_default().into_raw()
}

/// Hand a vector to C as pointer + length. Empty vectors become null.
/// Lengths are `u32` on the C side; anything past `u32::MAX` is dropped.
pub(crate) fn into_raw_parts<T>(mut items: Vec<T>) -> (*mut T, u32) {
    if items.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    items.truncate(u32::MAX as usize);
    let len = u32::try_from(items.len()).unwrap_or(u32::MAX);
    let ptr = Box::into_raw(items.into_boxed_slice()) as *mut T;
    (ptr, len)
}

/// Reclaim a buffer produced by `into_raw_parts`.
///
/// # Safety
/// `ptr` and `len` must come from a single `into_raw_parts` call.
pub(crate) unsafe fn from_raw_parts<T>(ptr: *mut T, len: u32) -> Vec<T> {
    if ptr.is_null() || len == 0 {
        return Vec::new();
    }
    let slice = std::ptr::slice_from_raw_parts_mut(ptr, len as usize);
    unsafe { Box::from_raw(slice) }.into_vec()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Delete = 3,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request the host must execute.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: HttpRequest) -> *mut Self {
        let headers: Vec<FfiHeader> = req
            .headers
            .into_iter()
            .map(|(key, value)| FfiHeader {
                key: c_string(key),
                value: c_string(value),
            })
            .collect();
        let (headers, headers_len) = into_raw_parts(headers);

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            path: c_string(req.path),
            headers,
            headers_len,
            body: req.body.map(c_string).unwrap_or(std::ptr::null_mut()),
        }))
    }

    /// Release a request produced by `from_core`.
    ///
    /// # Safety
    /// `req` must be null or come from `from_core`, and not be used afterwards.
    pub(crate) unsafe fn free(req: *mut Self) {
        if req.is_null() {
            return;
        }
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.path);
        free_c_string(req.body);
        for header in unsafe { from_raw_parts(req.headers, req.headers_len) } {
            free_c_string(header.key);
            free_c_string(header.value);
        }
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller builds this on the stack after executing a request, then
/// passes a pointer to `todo_view_complete`. The FFI layer reads but does not
/// free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Effects
// ---------------------------------------------------------------------------

/// What an `FfiEffect` asks the host to do.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiEffectKind {
    /// Execute `request`, then call `todo_view_complete` or `todo_view_fail` with `token`.
    Http = 0,
    /// Show `message` (and `icon`, if not null) as a toast.
    Notify = 1,
    /// After `delay_ms`, call `todo_view_disarm_elapsed` with `generation`.
    ScheduleDisarm = 2,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiNotifyLevel {
    Success = 0,
    Info = 1,
}

impl From<NotifyLevel> for FfiNotifyLevel {
    fn from(level: NotifyLevel) -> Self {
        match level {
            NotifyLevel::Success => FfiNotifyLevel::Success,
            NotifyLevel::Info => FfiNotifyLevel::Info,
        }
    }
}

/// One effect. Fields that do not belong to `kind` are zero or null.
#[repr(C)]
pub struct FfiEffect {
    pub kind: FfiEffectKind,
    pub token: u64,
    pub request: *mut FfiHttpRequest,
    pub level: FfiNotifyLevel,
    pub message: *mut c_char,
    pub icon: *mut c_char,
    pub generation: u64,
    pub delay_ms: u64,
}

impl FfiEffect {
    fn empty(kind: FfiEffectKind) -> Self {
        FfiEffect {
            kind,
            token: 0,
            request: std::ptr::null_mut(),
            level: FfiNotifyLevel::Info,
            message: std::ptr::null_mut(),
            icon: std::ptr::null_mut(),
            generation: 0,
            delay_ms: 0,
        }
    }

    fn notify(notification: Notification) -> Self {
        FfiEffect {
            level: notification.level.into(),
            message: c_string(notification.message),
            icon: notification.icon.map(c_string).unwrap_or(std::ptr::null_mut()),
            ..FfiEffect::empty(FfiEffectKind::Notify)
        }
    }
}

impl From<HostEffect> for FfiEffect {
    fn from(effect: HostEffect) -> Self {
        match effect {
            HostEffect::Http { token, request } => FfiEffect {
                token,
                request: FfiHttpRequest::from_core(request),
                ..FfiEffect::empty(FfiEffectKind::Http)
            },
            HostEffect::Notify(notification) => FfiEffect::notify(notification),
            HostEffect::ScheduleDisarm { generation, after } => FfiEffect {
                generation,
                delay_ms: u64::try_from(after.as_millis()).unwrap_or(u64::MAX),
                ..FfiEffect::empty(FfiEffectKind::ScheduleDisarm)
            },
        }
    }
}

/// Effects produced by one call. Free with `todo_free_effects`.
#[repr(C)]
pub struct FfiEffectList {
    pub items: *mut FfiEffect,
    pub len: u32,
}

impl FfiEffectList {
    pub(crate) fn from_core(effects: Vec<HostEffect>) -> *mut Self {
        let items: Vec<FfiEffect> = effects.into_iter().map(FfiEffect::from).collect();
        let (items, len) = into_raw_parts(items);
        Box::into_raw(Box::new(FfiEffectList { items, len }))
    }

    /// # Safety
    /// `list` must be null or come from `from_core`, and not be used afterwards.
    pub(crate) unsafe fn free(list: *mut Self) {
        if list.is_null() {
            return;
        }
        let list = unsafe { Box::from_raw(list) };
        for effect in unsafe { from_raw_parts(list.items, list.len) } {
            unsafe { FfiHttpRequest::free(effect.request) };
            free_c_string(effect.message);
            free_c_string(effect.icon);
        }
    }
}

/// Free a C string produced by `c_string`. Null is ignored.
pub(crate) fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}
