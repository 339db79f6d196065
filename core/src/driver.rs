//! Host-does-IO driver.
//!
//! `HostDriver` runs the same controller as `Runtime`, but instead of
//! touching the network or a clock it hands each request to the host as an
//! `HttpRequest` tagged with a token. The host performs the round-trip and
//! reports back through `complete` (or `fail` for transport errors); timer
//! effects are likewise the host's to schedule.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::client::TodoClient;
use crate::controller::{update, Effect, Event, Outcome, StoreRequest};
use crate::error::StoreError;
use crate::http::{HttpRequest, HttpResponse};
use crate::notify::Notification;
use crate::state::ViewState;
use crate::types::TodoFields;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEffect {
    /// Execute `request` and report the answer under `token`.
    Http { token: u64, request: HttpRequest },
    Notify(Notification),
    /// Call back with `Event::DoubleClickWindowElapsed { generation }` after `after`.
    ScheduleDisarm { generation: u64, after: Duration },
}

#[derive(Debug)]
pub struct HostDriver {
    client: TodoClient,
    state: ViewState,
    next_token: u64,
    in_flight: HashMap<u64, StoreRequest>,
}

impl HostDriver {
    pub fn new(client: TodoClient) -> Self {
        Self {
            client,
            state: ViewState::new(),
            next_token: 1,
            in_flight: HashMap::new(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Issue the initial list fetch.
    pub fn start(&mut self, now: DateTime<Utc>) -> Vec<HostEffect> {
        self.dispatch(Event::LoadRequested, now)
    }

    pub fn dispatch(&mut self, event: Event, now: DateTime<Utc>) -> Vec<HostEffect> {
        let mut host_effects = Vec::new();
        let mut pending = vec![event];
        // A request that cannot be built fails immediately; its completion is
        // applied in the same call.
        while let Some(event) = pending.pop() {
            for effect in update(&mut self.state, event, now) {
                match effect {
                    Effect::Store(request) => match self.build(&request) {
                        Ok(http) => {
                            let token = self.next_token;
                            self.next_token += 1;
                            debug!(token, kind = request.kind(), "store request handed to host");
                            self.in_flight.insert(token, request);
                            host_effects.push(HostEffect::Http {
                                token,
                                request: http,
                            });
                        }
                        Err(err) => pending.push(request.failed(err)),
                    },
                    Effect::Notify(notification) => host_effects.push(HostEffect::Notify(notification)),
                    Effect::ScheduleDisarm { generation, after } => {
                        host_effects.push(HostEffect::ScheduleDisarm { generation, after })
                    }
                }
            }
        }
        host_effects
    }

    /// Apply the response to the request issued under `token`.
    pub fn complete(&mut self, token: u64, response: HttpResponse, now: DateTime<Utc>) -> Vec<HostEffect> {
        let Some(request) = self.in_flight.remove(&token) else {
            warn!(token, "response for unknown request token");
            return Vec::new();
        };
        let outcome = match &request {
            StoreRequest::Load => Outcome::Listed(self.client.parse_list_todos(response)),
            StoreRequest::Create { .. } => Outcome::Created(self.client.parse_create_todo(response)),
            StoreRequest::Edit { .. } | StoreRequest::Toggle { .. } => {
                Outcome::Done(self.client.parse_update_todo(response))
            }
            StoreRequest::Delete { .. } => Outcome::Done(self.client.parse_delete_todo(response)),
        };
        let event = request.completion_event(outcome);
        self.dispatch(event, now)
    }

    /// The request issued under `token` never produced a response.
    pub fn fail(&mut self, token: u64, reason: &str, now: DateTime<Utc>) -> Vec<HostEffect> {
        let Some(request) = self.in_flight.remove(&token) else {
            warn!(token, "failure for unknown request token");
            return Vec::new();
        };
        let event = request.failed(StoreError::Network(reason.to_string()));
        self.dispatch(event, now)
    }

    fn build(&self, request: &StoreRequest) -> Result<HttpRequest, StoreError> {
        match request {
            StoreRequest::Load => Ok(self.client.build_list_todos()),
            StoreRequest::Create { task } => self.client.build_create_todo(&TodoFields {
                task: task.clone(),
                completed: false,
            }),
            StoreRequest::Edit { id, task, completed } | StoreRequest::Toggle { id, task, completed } => {
                self.client.build_update_todo(
                    *id,
                    &TodoFields {
                        task: task.clone(),
                        completed: *completed,
                    },
                )
            }
            StoreRequest::Delete { id } => Ok(self.client.build_delete_todo(*id)),
        }
    }
}
