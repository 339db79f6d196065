//! In-memory stand-in for the remote todo content API.
//!
//! Speaks the same envelope dialect as the hosted store: every record is
//! `{ id, attributes: { data, status, createdAt, updatedAt, publishedAt } }`
//! and every response body is wrapped in `{ data, meta }`. Ids are
//! sequential, starting at 1.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attributes {
    pub data: String,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    pub attributes: Attributes,
}

/// Response wrapper used by every successful route.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(default)]
    pub meta: Map<String, Value>,
}

impl<T> Envelope<T> {
    fn new(data: T) -> Self {
        Self {
            data,
            meta: Map::new(),
        }
    }
}

#[derive(Deserialize)]
pub struct WriteRequest<T> {
    pub data: T,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub data: String,
    #[serde(default)]
    pub status: bool,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub data: Option<String>,
    pub status: Option<bool>,
}

#[derive(Default)]
pub struct Records {
    next_id: u64,
    rows: BTreeMap<u64, Record>,
}

pub type Db = Arc<RwLock<Records>>;

/// 404 with the store's error body.
pub struct NotFound;

impl IntoResponse for NotFound {
    fn into_response(self) -> Response {
        let body = json!({
            "data": null,
            "error": {
                "status": 404,
                "name": "NotFoundError",
                "message": "Not Found",
                "details": {}
            }
        });
        (StatusCode::NOT_FOUND, Json(body)).into_response()
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Records::default()));
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", get(get_todo).put(update_todo).delete(delete_todo))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock store listening");
    }
    axum::serve(listener, app()).await
}

async fn list_todos(State(db): State<Db>) -> Json<Envelope<Vec<Record>>> {
    let records = db.read().await;
    Json(Envelope::new(records.rows.values().cloned().collect()))
}

async fn create_todo(
    State(db): State<Db>,
    Json(input): Json<WriteRequest<CreateTodo>>,
) -> Json<Envelope<Record>> {
    let now = Utc::now();
    let mut records = db.write().await;
    records.next_id += 1;
    let record = Record {
        id: records.next_id,
        attributes: Attributes {
            data: input.data.data,
            status: input.data.status,
            created_at: now,
            updated_at: now,
            published_at: now,
        },
    };
    records.rows.insert(record.id, record.clone());
    info!(id = record.id, "created todo");
    Json(Envelope::new(record))
}

async fn get_todo(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<Envelope<Record>>, NotFound> {
    let records = db.read().await;
    records
        .rows
        .get(&id)
        .cloned()
        .map(|record| Json(Envelope::new(record)))
        .ok_or(NotFound)
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<WriteRequest<UpdateTodo>>,
) -> Result<Json<Envelope<Record>>, NotFound> {
    let mut records = db.write().await;
    let record = records.rows.get_mut(&id).ok_or(NotFound)?;
    if let Some(data) = input.data.data {
        record.attributes.data = data;
    }
    if let Some(status) = input.data.status {
        record.attributes.status = status;
    }
    record.attributes.updated_at = Utc::now();
    info!(id, "updated todo");
    Ok(Json(Envelope::new(record.clone())))
}

async fn delete_todo(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<Envelope<Record>>, NotFound> {
    let mut records = db.write().await;
    let record = records.rows.remove(&id).ok_or(NotFound)?;
    info!(id, "deleted todo");
    Ok(Json(Envelope::new(record)))
}
