//! Full lifecycle through `HostDriver` against the live mock store.
//!
//! Starts the mock store on a random port and acts as the host: every
//! `HostEffect::Http` is executed with ureq and the answer fed back through
//! `complete`. Timers are fired by hand.

use chrono::Utc;
use todo_view::{
    Event, HostDriver, HostEffect, HttpMethod, HttpRequest, HttpResponse, Notification, NotifyLevel, TodoClient,
};

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Status codes are returned as data so the driver decides what a 4xx/5xx
/// means.
fn execute(req: HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut response = match (req.method, req.body) {
        (HttpMethod::Get, _) => agent.get(&req.path).call(),
        (HttpMethod::Delete, _) => agent.delete(&req.path).call(),
        (HttpMethod::Post, Some(body)) => agent
            .post(&req.path)
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Post, None) => agent.post(&req.path).send_empty(),
        (HttpMethod::Put, Some(body)) => agent
            .put(&req.path)
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Put, None) => agent.put(&req.path).send_empty(),
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse {
        status,
        headers: Vec::new(),
        body,
    }
}

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

/// Play host: run every request to completion, collect everything else.
fn pump(driver: &mut HostDriver, effects: Vec<HostEffect>) -> Vec<HostEffect> {
    let mut queue = effects;
    let mut rest = Vec::new();
    while let Some(effect) = queue.pop() {
        match effect {
            HostEffect::Http { token, request } => {
                let response = execute(request);
                queue.extend(driver.complete(token, response, Utc::now()));
            }
            other => rest.push(other),
        }
    }
    rest
}

fn send(driver: &mut HostDriver, event: Event) -> Vec<HostEffect> {
    let effects = driver.dispatch(event, Utc::now());
    pump(driver, effects)
}

#[test]
fn crud_lifecycle() {
    let base_url = start_mock_store();
    let mut driver = HostDriver::new(TodoClient::new(&base_url));

    // Step 1: initial load: empty store.
    let effects = driver.start(Utc::now());
    assert!(pump(&mut driver, effects).is_empty());
    assert!(driver.state().todos.is_empty(), "expected empty list");

    // Step 2: blank input issues nothing.
    send(&mut driver, Event::InputChanged("   ".to_string()));
    assert!(driver.dispatch(Event::CreateRequested, Utc::now()).is_empty());

    // Step 3: create two todos.
    for task in ["Integration test", "Second"] {
        send(&mut driver, Event::InputChanged(task.to_string()));
        let rest = send(&mut driver, Event::CreateRequested);
        assert_eq!(rest, vec![HostEffect::Notify(Notification::created())]);
        assert_eq!(driver.state().input, "");
    }
    let first = driver.state().todos[0].clone();
    let second = driver.state().todos[1].clone();
    assert_eq!(first.task, "Integration test");
    assert!(!first.completed);
    assert!(first.last_update <= second.last_update);

    // Step 4: a plain click toggles the first todo.
    send(&mut driver, Event::ItemClicked(first.id));
    let toggled = driver.state().todo(first.id).unwrap().clone();
    assert!(toggled.completed);
    assert!(toggled.last_update >= first.last_update);

    // Step 5: double-click arms the window, the next click edits instead.
    let rest = send(&mut driver, Event::ItemDoubleClicked(second.id));
    let generation = match rest.as_slice() {
        [HostEffect::ScheduleDisarm { generation, .. }] => *generation,
        other => panic!("expected disarm timer, got {other:?}"),
    };
    assert!(send(&mut driver, Event::ItemClicked(second.id)).is_empty());
    assert_eq!(driver.state().editing_todo_id, Some(second.id));
    assert_eq!(driver.state().input, "Second");
    assert!(!driver.state().todo(second.id).unwrap().completed);
    send(&mut driver, Event::DoubleClickWindowElapsed { generation });
    assert!(!driver.state().pending_double_click);

    // Step 6: save the edit; completion status survives.
    send(
        &mut driver,
        Event::UpdateRequested {
            id: second.id,
            task: "Second, edited".to_string(),
        },
    );
    assert_eq!(driver.state().editing_todo_id, None);
    assert_eq!(driver.state().todo(second.id).unwrap().task, "Second, edited");

    // Step 7: reload from the store and compare what it kept.
    let effects = driver.start(Utc::now());
    pump(&mut driver, effects);
    let reloaded = driver.state().todos.clone();
    assert_eq!(reloaded.len(), 2);
    assert!(reloaded.iter().any(|t| t.id == first.id && t.completed));
    assert!(reloaded
        .iter()
        .any(|t| t.id == second.id && t.task == "Second, edited" && !t.completed));

    // Step 8: delete.
    let rest = send(&mut driver, Event::DeleteRequested(first.id));
    match rest.as_slice() {
        [HostEffect::Notify(notification)] => assert_eq!(notification.level, NotifyLevel::Info),
        other => panic!("expected delete notification, got {other:?}"),
    }
    assert!(driver.state().todo(first.id).is_none());

    // Step 9: delete again: store says 404, nothing changes.
    let before = driver.state().clone();
    assert!(send(&mut driver, Event::DeleteRequested(first.id)).is_empty());
    assert_eq!(driver.state(), &before);
    assert_eq!(driver.in_flight(), 0);
}
