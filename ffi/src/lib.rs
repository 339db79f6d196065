//! C-ABI wrapper around the todo view controller.
//!
//! # Overview
//! A native UI layer creates a view with `todo_view_new`, reports every user
//! action through the matching `todo_view_*` function, and renders the JSON
//! from `todo_view_snapshot_json`. The library performs no I/O: each call
//! returns an `FfiEffectList` telling the host which HTTP requests to run,
//! which toasts to show and which timers to arm. Answers come back through
//! `todo_view_complete` / `todo_view_fail` / `todo_view_disarm_elapsed`.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary; a panic or a null required argument
//!   yields a null return.
//! - Calls that produce no effects return an empty list, never null.
//! - The C caller owns all returned pointers and must release them with
//!   `todo_free_effects`, `todo_free_string` or `todo_view_free`.

pub mod types;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use chrono::Utc;
use todo_view::{Config, Event, HostDriver, HostEffect, HttpResponse, TodoClient, TodoId};

use types::*;

/// Borrow a C string as UTF-8, replacing invalid sequences.
fn read_str(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}

/// Run `f` against the view behind `view` and hand its effects to C.
fn with_view(
    view: *mut FfiTodoView,
    f: impl FnOnce(&mut HostDriver) -> Vec<HostEffect>,
) -> *mut FfiEffectList {
    if view.is_null() {
        return std::ptr::null_mut();
    }
    catch_unwind(AssertUnwindSafe(|| {
        let view = unsafe { &mut *view };
        FfiEffectList::from_core(f(&mut view.inner))
    }))
    .unwrap_or(std::ptr::null_mut())
}

fn dispatch(view: *mut FfiTodoView, event: Event) -> *mut FfiEffectList {
    with_view(view, |driver| driver.dispatch(event, Utc::now()))
}

// ---------------------------------------------------------------------------
// View lifecycle
// ---------------------------------------------------------------------------

/// Create a view bound to the store at `base_url`.
///
/// Returns null if `base_url` is null or if an internal panic occurs.
/// The caller must free the returned pointer with `todo_view_free`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_view_new(base_url: *const c_char) -> *mut FfiTodoView {
    catch_unwind(|| {
        let Some(url) = read_str(base_url) else {
            return std::ptr::null_mut();
        };
        let driver = HostDriver::new(TodoClient::new(&url));
        Box::into_raw(Box::new(FfiTodoView { inner: driver }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Create a view bound to the hosted store.
///
/// Returns null if an internal panic occurs. Free with `todo_view_free`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_view_new_default() -> *mut FfiTodoView {
    catch_unwind(|| {
        let driver = HostDriver::new(TodoClient::from_config(&Config::default()));
        Box::into_raw(Box::new(FfiTodoView { inner: driver }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a view created by `todo_view_new` or `todo_view_new_default`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_view_free(view: *mut FfiTodoView) {
    if !view.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(view) });
        }));
    }
}

/// Issue the initial list fetch.
#[unsafe(no_mangle)]
pub extern "C" fn todo_view_start(view: *mut FfiTodoView) -> *mut FfiEffectList {
    with_view(view, |driver| driver.start(Utc::now()))
}

/// Current view state as a JSON object:
/// `{input, todos: [{id, task, completed, last_update}], editing_todo_id, pending_double_click}`.
///
/// Returns null if `view` is null. Free with `todo_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_view_snapshot_json(view: *const FfiTodoView) -> *mut c_char {
    if view.is_null() {
        return std::ptr::null_mut();
    }
    catch_unwind(AssertUnwindSafe(|| {
        let view = unsafe { &*view };
        match serde_json::to_string(view.inner.state()) {
            Ok(json) => c_string(json),
            Err(_) => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// User events
// ---------------------------------------------------------------------------

/// Replace the text buffer. Returns null if `text` is null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_view_set_input(view: *mut FfiTodoView, text: *const c_char) -> *mut FfiEffectList {
    let Some(text) = read_str(text) else {
        return std::ptr::null_mut();
    };
    dispatch(view, Event::InputChanged(text))
}

/// Create a todo from the text buffer. Blank input yields no effects.
#[unsafe(no_mangle)]
pub extern "C" fn todo_view_create(view: *mut FfiTodoView) -> *mut FfiEffectList {
    dispatch(view, Event::CreateRequested)
}

/// Open `id` for editing, loading its text into the buffer.
#[unsafe(no_mangle)]
pub extern "C" fn todo_view_begin_edit(view: *mut FfiTodoView, id: u64) -> *mut FfiEffectList {
    dispatch(view, Event::EditRequested(TodoId(id)))
}

/// Save `task` as the new text of `id`. Returns null if `task` is null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_view_save_edit(view: *mut FfiTodoView, id: u64, task: *const c_char) -> *mut FfiEffectList {
    let Some(task) = read_str(task) else {
        return std::ptr::null_mut();
    };
    dispatch(view, Event::UpdateRequested { id: TodoId(id), task })
}

#[unsafe(no_mangle)]
pub extern "C" fn todo_view_cancel_edit(view: *mut FfiTodoView) -> *mut FfiEffectList {
    dispatch(view, Event::EditCancelled)
}

#[unsafe(no_mangle)]
pub extern "C" fn todo_view_delete(view: *mut FfiTodoView, id: u64) -> *mut FfiEffectList {
    dispatch(view, Event::DeleteRequested(TodoId(id)))
}

#[unsafe(no_mangle)]
pub extern "C" fn todo_view_toggle(view: *mut FfiTodoView, id: u64) -> *mut FfiEffectList {
    dispatch(view, Event::ToggleRequested(TodoId(id)))
}

/// Report a click on an item. Toggles it, or opens it for editing while a
/// double-click window is armed.
#[unsafe(no_mangle)]
pub extern "C" fn todo_view_click(view: *mut FfiTodoView, id: u64) -> *mut FfiEffectList {
    dispatch(view, Event::ItemClicked(TodoId(id)))
}

/// Report a double-click on an item. Arms the disambiguation window.
#[unsafe(no_mangle)]
pub extern "C" fn todo_view_double_click(view: *mut FfiTodoView, id: u64) -> *mut FfiEffectList {
    dispatch(view, Event::ItemDoubleClicked(TodoId(id)))
}

// ---------------------------------------------------------------------------
// Host callbacks
// ---------------------------------------------------------------------------

/// A `ScheduleDisarm` timer fired.
#[unsafe(no_mangle)]
pub extern "C" fn todo_view_disarm_elapsed(view: *mut FfiTodoView, generation: u64) -> *mut FfiEffectList {
    dispatch(view, Event::DoubleClickWindowElapsed { generation })
}

/// Deliver the response to the request issued under `token`.
///
/// Returns null if `response` is null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_view_complete(
    view: *mut FfiTodoView,
    token: u64,
    response: *const FfiHttpResponse,
) -> *mut FfiEffectList {
    if response.is_null() {
        return std::ptr::null_mut();
    }
    let response = unsafe { &*response };
    let response = HttpResponse {
        status: response.status,
        headers: Vec::new(),
        body: read_str(response.body).unwrap_or_default(),
    };
    with_view(view, |driver| driver.complete(token, response, Utc::now()))
}

/// The request issued under `token` failed before a response arrived.
/// `reason` may be null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_view_fail(view: *mut FfiTodoView, token: u64, reason: *const c_char) -> *mut FfiEffectList {
    let reason = read_str(reason).unwrap_or_else(|| "transport failure".to_string());
    with_view(view, |driver| driver.fail(token, &reason, Utc::now()))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiEffectList` and every request and string it points to.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_free_effects(list: *mut FfiEffectList) {
    if list.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| unsafe { FfiEffectList::free(list) }));
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| free_c_string(s)));
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
