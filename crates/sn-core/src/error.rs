//! Error types for the canvas core and its persistence collaborator.

use crate::id::ConnectionId;
use thiserror::Error;

/// Result type alias for persistence operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Reasons a connection cannot be added to a graph.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionError {
    /// An identical (from, to, fromSide, toSide) edge already exists.
    #[error("connection already exists")]
    DuplicateEdge,

    /// Both endpoints are on the same note.
    #[error("a note cannot be connected to itself")]
    SelfLoop,

    /// Another connection already carries this id.
    #[error("connection id {0} is already in use")]
    IdInUse(ConnectionId),
}

/// Errors surfaced by a `NoteStore` or `BlobStore`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The referenced record does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// The request was malformed (missing content, bad type, ...).
    #[error("invalid request: {0}")]
    Invalid(String),

    /// The connection graph rejected the edge.
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Blob upload failed.
    #[error("upload failed: {0}")]
    Upload(String),
}

impl StoreError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// True when the error means the target record is gone.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}
