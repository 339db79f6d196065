//! Single-mutator event loop that drives the controller on tokio.
//!
//! Only `Runtime::run` touches the `ViewState`. UI events arrive through a
//! `Dispatcher`; store calls and disarm timers run as spawned tasks and post
//! their completion back as events, so no transition ever waits on the
//! network. After each applied event a snapshot is published on a watch
//! channel, which is the UI's cue to re-render.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::controller::{update, Effect, Event};
use crate::notify::Notifier;
use crate::state::ViewState;
use crate::store::{self, RemoteStore};

/// Handle the UI uses to feed events into a running `Runtime`.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    tx: mpsc::UnboundedSender<Event>,
}

impl Dispatcher {
    /// Queue `event`. Returns false once the runtime has stopped.
    pub fn send(&self, event: Event) -> bool {
        if self.tx.send(event).is_err() {
            warn!("runtime stopped, event dropped");
            return false;
        }
        true
    }
}

pub struct Runtime {
    state: ViewState,
    store: Arc<dyn RemoteStore>,
    notifier: Arc<dyn Notifier>,
    ui_rx: mpsc::UnboundedReceiver<Event>,
    completions_tx: mpsc::UnboundedSender<Event>,
    completions_rx: mpsc::UnboundedReceiver<Event>,
    view_tx: watch::Sender<ViewState>,
    disarm: Option<JoinHandle<()>>,
}

impl Runtime {
    pub fn new(store: Arc<dyn RemoteStore>, notifier: Arc<dyn Notifier>) -> (Self, Dispatcher) {
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let (view_tx, _) = watch::channel(ViewState::new());
        let runtime = Runtime {
            state: ViewState::new(),
            store,
            notifier,
            ui_rx,
            completions_tx,
            completions_rx,
            view_tx,
            disarm: None,
        };
        (runtime, Dispatcher { tx: ui_tx })
    }

    /// Snapshots published after every applied event.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.view_tx.subscribe()
    }

    /// Fetch the list, then apply events until every `Dispatcher` is dropped.
    ///
    /// Completions still in flight at that point are discarded.
    pub async fn run(mut self) -> ViewState {
        self.apply(Event::LoadRequested);
        loop {
            let event = tokio::select! {
                Some(event) = self.completions_rx.recv() => event,
                event = self.ui_rx.recv() => match event {
                    Some(event) => event,
                    None => break,
                },
            };
            self.apply(event);
        }
        if let Some(handle) = self.disarm.take() {
            handle.abort();
        }
        debug!("runtime stopped");
        self.state
    }

    fn apply(&mut self, event: Event) {
        let effects = update(&mut self.state, event, Utc::now());
        self.view_tx.send_replace(self.state.clone());
        for effect in effects {
            self.perform(effect);
        }
    }

    fn perform(&mut self, effect: Effect) {
        match effect {
            Effect::Store(request) => {
                debug!(kind = request.kind(), "store request issued");
                let store = Arc::clone(&self.store);
                let tx = self.completions_tx.clone();
                tokio::spawn(async move {
                    let event = store::execute(store.as_ref(), request).await;
                    let _ = tx.send(event);
                });
            }
            Effect::Notify(notification) => self.notifier.notify(&notification),
            Effect::ScheduleDisarm { generation, after } => {
                if let Some(previous) = self.disarm.take() {
                    previous.abort();
                }
                self.disarm = Some(self.schedule_disarm(generation, after));
            }
        }
    }

    fn schedule_disarm(&self, generation: u64, after: Duration) -> JoinHandle<()> {
        let tx = self.completions_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let _ = tx.send(Event::DoubleClickWindowElapsed { generation });
        })
    }
}
