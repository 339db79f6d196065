//! View-state controller and remote store adapter for a todo list UI.
//!
//! # Overview
//! The UI layer renders a `ViewState` and reports user intent as `Event`s.
//! `controller::update` applies each event and returns the `Effect`s that
//! must happen next: calls against the remote store, toast notifications and
//! the double-click disarm timer. Two drivers carry those effects out:
//!
//! - `Runtime` runs on tokio against any `RemoteStore` (`HttpStore` in
//!   production, a fake in tests) and publishes snapshots on a watch channel.
//! - `HostDriver` hands `HttpRequest`s and timers to the host instead, so a
//!   caller across the C ABI can own all I/O.
//!
//! `TodoClient` is the stateless request builder / response parser both
//! paths share.

pub mod client;
pub mod config;
pub mod controller;
pub mod driver;
pub mod error;
pub mod http;
pub mod notify;
pub mod runtime;
pub mod state;
pub mod store;
pub mod types;

pub use client::TodoClient;
pub use config::Config;
pub use controller::{update, Effect, Event, StoreRequest, DOUBLE_CLICK_WINDOW};
pub use driver::{HostDriver, HostEffect};
pub use error::StoreError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use notify::{LogNotifier, Notification, Notifier, NotifyLevel};
pub use runtime::{Dispatcher, Runtime};
pub use state::ViewState;
pub use store::{HttpStore, RemoteStore};
pub use types::{CreatedTodo, TodoFields, TodoId, TodoItem};
