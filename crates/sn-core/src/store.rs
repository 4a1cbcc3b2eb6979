//! Persistence collaborator interfaces.
//!
//! The canvas core never talks to a database or blob bucket directly; the
//! host supplies implementations of these traits and runs commits against
//! them (see `sn-editor`'s commit queue). [`crate::memory_store::MemoryStore`]
//! implements both for tests and local replay.

use crate::error::StoreResult;
use crate::id::{ConnectionId, NoteId, NotebookId};
use crate::model::{
    Connection, Note, NoteKind, NotePatch, Notebook, NotebookSnapshot, NotebookSummary, Side,
};
use kurbo::Point;

/// Key-value persistence for notebooks, notes, and connections.
pub trait NoteStore {
    /// All notebooks, newest first.
    fn list_notebooks(&self) -> StoreResult<Vec<NotebookSummary>>;

    fn create_notebook(
        &mut self,
        name: &str,
        subtitle: Option<&str>,
        cover_image: Option<&str>,
    ) -> StoreResult<Notebook>;

    /// The notebook with its notes in creation order and every connection
    /// touching them.
    fn fetch_notebook(&self, id: NotebookId) -> StoreResult<NotebookSnapshot>;

    /// Delete a notebook, its notes, and all connections touching them.
    fn delete_notebook(&mut self, id: NotebookId) -> StoreResult<()>;

    /// Create a note. `position` of `None` lets the store choose.
    fn create_note(
        &mut self,
        notebook: NotebookId,
        kind: NoteKind,
        content: &str,
        position: Option<Point>,
    ) -> StoreResult<Note>;

    fn update_note(&mut self, id: NoteId, patch: &NotePatch) -> StoreResult<Note>;

    fn delete_note(&mut self, id: NoteId) -> StoreResult<()>;

    fn create_connection(
        &mut self,
        notebook: NotebookId,
        from: NoteId,
        to: NoteId,
        from_side: Side,
        to_side: Side,
    ) -> StoreResult<Connection>;

    /// Delete a connection. Unknown ids succeed.
    fn delete_connection(&mut self, id: ConnectionId) -> StoreResult<()>;
}

/// Blob storage for pasted images.
pub trait BlobStore {
    /// Store the bytes and return a URL the image can be loaded from.
    fn upload_image(&mut self, bytes: &[u8], mime: &str) -> StoreResult<String>;
}
