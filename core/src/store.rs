//! Remote store adapter: the async seam between the controller and the REST API.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::client::TodoClient;
use crate::config::Config;
use crate::controller::{Event, Outcome, StoreRequest};
use crate::error::StoreError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreatedTodo, TodoFields, TodoId, TodoItem};

#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn list(&self) -> Result<Vec<TodoItem>, StoreError>;
    /// New todos are always created incomplete.
    async fn create(&self, task: &str) -> Result<CreatedTodo, StoreError>;
    async fn update(&self, id: TodoId, task: &str, completed: bool) -> Result<(), StoreError>;
    async fn delete(&self, id: TodoId) -> Result<(), StoreError>;
}

#[async_trait]
impl<S: RemoteStore + ?Sized> RemoteStore for Arc<S> {
    async fn list(&self) -> Result<Vec<TodoItem>, StoreError> {
        (**self).list().await
    }

    async fn create(&self, task: &str) -> Result<CreatedTodo, StoreError> {
        (**self).create(task).await
    }

    async fn update(&self, id: TodoId, task: &str, completed: bool) -> Result<(), StoreError> {
        (**self).update(id, task, completed).await
    }

    async fn delete(&self, id: TodoId) -> Result<(), StoreError> {
        (**self).delete(id).await
    }
}

/// Run `request` against `store` and wrap the answer as a completion event.
pub async fn execute(store: &dyn RemoteStore, request: StoreRequest) -> Event {
    let outcome = match &request {
        StoreRequest::Load => Outcome::Listed(store.list().await),
        StoreRequest::Create { task } => Outcome::Created(store.create(task).await),
        StoreRequest::Edit { id, task, completed } | StoreRequest::Toggle { id, task, completed } => {
            Outcome::Done(store.update(*id, task, *completed).await)
        }
        StoreRequest::Delete { id } => Outcome::Done(store.delete(*id).await),
    };
    request.completion_event(outcome)
}

/// `RemoteStore` over HTTP, executing the requests built by `TodoClient`.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: TodoClient,
    http: reqwest::Client,
}

impl HttpStore {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: TodoClient::new(base_url),
            http: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            client: TodoClient::from_config(config),
            http: reqwest::Client::new(),
        }
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, StoreError> {
        debug!(method = ?request.method, path = %request.path, "sending store request");
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };
        let mut builder = self.http.request(method, &request.path);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(key, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (key.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        debug!(status, "store responded");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[async_trait]
impl RemoteStore for HttpStore {
    async fn list(&self) -> Result<Vec<TodoItem>, StoreError> {
        let response = self.send(self.client.build_list_todos()).await?;
        self.client.parse_list_todos(response)
    }

    async fn create(&self, task: &str) -> Result<CreatedTodo, StoreError> {
        let fields = TodoFields {
            task: task.to_string(),
            completed: false,
        };
        let response = self.send(self.client.build_create_todo(&fields)?).await?;
        self.client.parse_create_todo(response)
    }

    async fn update(&self, id: TodoId, task: &str, completed: bool) -> Result<(), StoreError> {
        let fields = TodoFields {
            task: task.to_string(),
            completed,
        };
        let response = self.send(self.client.build_update_todo(id, &fields)?).await?;
        self.client.parse_update_todo(response)
    }

    async fn delete(&self, id: TodoId) -> Result<(), StoreError> {
        let response = self.send(self.client.build_delete_todo(id)).await?;
        self.client.parse_delete_todo(response)
    }
}
