//! Stateless request builder and response parser for the remote store.
//!
//! `TodoClient` holds only a `base_url`. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`; the caller executes the round-trip.

use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::StoreError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreatedRecord, CreatedTodo, Envelope, Record, TodoFields, TodoId, TodoItem};

/// Synchronous, stateless client for the todo collection of the store.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.base_url)
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/todos", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_todo(&self, fields: &TodoFields) -> Result<HttpRequest, StoreError> {
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/todos", self.base_url),
            headers: json_headers(),
            body: Some(encode(fields)?),
        })
    }

    pub fn build_update_todo(&self, id: TodoId, fields: &TodoFields) -> Result<HttpRequest, StoreError> {
        Ok(HttpRequest {
            method: HttpMethod::Put,
            path: format!("{}/todos/{id}", self.base_url),
            headers: json_headers(),
            body: Some(encode(fields)?),
        })
    }

    pub fn build_delete_todo(&self, id: TodoId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/todos/{id}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<TodoItem>, StoreError> {
        check_status(&response)?;
        let records: Envelope<Vec<Record>> = decode(&response.body)?;
        Ok(records.data.into_iter().map(TodoItem::from).collect())
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<CreatedTodo, StoreError> {
        check_status(&response)?;
        let created: Envelope<CreatedRecord> = decode(&response.body)?;
        Ok(created.data.into())
    }

    /// The update response body is not consumed.
    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<(), StoreError> {
        check_status(&response)
    }

    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), StoreError> {
        check_status(&response)
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![("content-type".to_string(), "application/json".to_string())]
}

fn encode(fields: &TodoFields) -> Result<String, StoreError> {
    serde_json::to_string(&Envelope { data: fields }).map_err(|e| StoreError::Encode(e.to_string()))
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, StoreError> {
    serde_json::from_str(body).map_err(|e| StoreError::Decode(e.to_string()))
}

/// Map non-2xx status codes to the appropriate `StoreError` variant.
fn check_status(response: &HttpResponse) -> Result<(), StoreError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(StoreError::NotFound);
    }
    Err(StoreError::Rejected {
        status: response.status,
        body: response.body.clone(),
    })
}
