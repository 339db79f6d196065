//! Drive the C API the way a native host would: execute every HTTP effect
//! with ureq against a live mock store and feed the answers back.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use todo_view_ffi::types::{FfiEffectKind, FfiEffectList, FfiHttpMethod, FfiHttpRequest, FfiHttpResponse, FfiTodoView};
use todo_view_ffi::*;

fn start_mock_store() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_store::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn c(ptr: *const c_char) -> String {
    unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string()
}

/// Execute a request read straight out of the C structs.
fn execute(req: &FfiHttpRequest) -> (u16, String) {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();
    let path = c(req.path);
    let body = (!req.body.is_null()).then(|| c(req.body));

    let mut response = match (req.method, body) {
        (FfiHttpMethod::Get, _) => agent.get(&path).call(),
        (FfiHttpMethod::Delete, _) => agent.delete(&path).call(),
        (FfiHttpMethod::Post, Some(body)) => agent.post(&path).content_type("application/json").send(body.as_bytes()),
        (FfiHttpMethod::Put, Some(body)) => agent.put(&path).content_type("application/json").send(body.as_bytes()),
        (method, None) => panic!("{method:?} without a body"),
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    (status, response.body_mut().read_to_string().unwrap_or_default())
}

#[derive(Debug, Default)]
struct Outcome {
    toasts: Vec<String>,
    timers: Vec<(u64, u64)>,
}

/// Consume `list`, answering every HTTP effect until none remain.
fn pump(view: *mut FfiTodoView, list: *mut FfiEffectList, out: &mut Outcome) {
    assert!(!list.is_null());
    let mut queue = vec![list];
    while let Some(list) = queue.pop() {
        let items = {
            let list = unsafe { &*list };
            if list.len == 0 {
                &[][..]
            } else {
                unsafe { std::slice::from_raw_parts(list.items, list.len as usize) }
            }
        };
        for effect in items {
            match effect.kind {
                FfiEffectKind::Http => {
                    let (status, body) = execute(unsafe { &*effect.request });
                    let body = CString::new(body).unwrap();
                    let response = FfiHttpResponse {
                        status,
                        body: body.as_ptr(),
                    };
                    queue.push(todo_view_complete(view, effect.token, &response));
                }
                FfiEffectKind::Notify => out.toasts.push(c(effect.message)),
                FfiEffectKind::ScheduleDisarm => out.timers.push((effect.generation, effect.delay_ms)),
            }
        }
        todo_free_effects(list);
    }
}

fn snapshot(view: *mut FfiTodoView) -> serde_json::Value {
    let json = todo_view_snapshot_json(view);
    let value = serde_json::from_str(&c(json)).unwrap();
    todo_free_string(json);
    value
}

#[test]
fn native_host_round_trip() {
    let base_url = CString::new(start_mock_store()).unwrap();
    let view = todo_view_new(base_url.as_ptr());
    let mut out = Outcome::default();

    pump(view, todo_view_start(view), &mut out);
    assert_eq!(snapshot(view)["todos"], serde_json::json!([]));

    let text = CString::new("From C").unwrap();
    pump(view, todo_view_set_input(view, text.as_ptr()), &mut out);
    pump(view, todo_view_create(view), &mut out);
    assert_eq!(out.toasts, vec!["Todo is created".to_string()]);

    let state = snapshot(view);
    assert_eq!(state["input"], "");
    let id = state["todos"][0]["id"].as_u64().unwrap();
    assert_eq!(state["todos"][0]["task"], "From C");

    pump(view, todo_view_click(view, id), &mut out);
    assert_eq!(snapshot(view)["todos"][0]["completed"], true);

    pump(view, todo_view_double_click(view, id), &mut out);
    let (generation, delay_ms) = out.timers[0];
    assert_eq!(delay_ms, 300);
    pump(view, todo_view_click(view, id), &mut out);
    assert_eq!(snapshot(view)["editing_todo_id"], id);
    pump(view, todo_view_disarm_elapsed(view, generation), &mut out);

    let task = CString::new("From C, edited").unwrap();
    pump(view, todo_view_save_edit(view, id, task.as_ptr()), &mut out);
    let state = snapshot(view);
    assert!(state["editing_todo_id"].is_null());
    assert_eq!(state["todos"][0]["task"], "From C, edited");
    assert_eq!(state["todos"][0]["completed"], true);

    // reload confirms the store kept both changes
    pump(view, todo_view_start(view), &mut out);
    let state = snapshot(view);
    assert_eq!(state["todos"][0]["task"], "From C, edited");
    assert_eq!(state["todos"][0]["completed"], true);

    pump(view, todo_view_delete(view, id), &mut out);
    assert_eq!(out.toasts.last().map(String::as_str), Some("Todo Deleted!"));
    assert_eq!(snapshot(view)["todos"], serde_json::json!([]));

    todo_view_free(view);
}
