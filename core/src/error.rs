//! Failures surfaced by the remote store adapter.
//!
//! `Network` covers transport failures; `NotFound` and `Rejected` cover
//! non-2xx answers. The controller treats all of them the same way: log,
//! leave the view state alone, no retry.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The request never produced an HTTP response.
    #[error("network failure: {0}")]
    Network(String),

    /// The store returned 404 for the addressed todo.
    #[error("todo not found")]
    NotFound,

    /// The store returned a non-2xx status other than 404.
    #[error("request rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The response body did not match the expected envelope.
    #[error("could not decode store response: {0}")]
    Decode(String),

    /// The request payload could not be encoded as JSON.
    #[error("could not encode request body: {0}")]
    Encode(String),
}

impl StoreError {
    /// True when the store answered but refused the request.
    pub fn is_rejection(&self) -> bool {
        matches!(self, StoreError::NotFound | StoreError::Rejected { .. })
    }
}
