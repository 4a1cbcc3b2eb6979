//! Write-behind commits.
//!
//! The session never calls persistence itself. It emits [`Commit`]s; the
//! host executes them against its stores (on whatever thread or runtime it
//! likes) and hands each [`CommitOutcome`] back through
//! [`Session::apply_outcome`](crate::session::Session::apply_outcome).
//! Outcomes may arrive late and in any order.
//!
//! [`CommitQueue`] is the simplest such host: a FIFO drained synchronously.

use crate::session::{Effect, Session};
use sn_core::{
    BlobStore, Connection, ConnectionId, Note, NoteId, NoteKind, NotePatch, NoteStore, NotebookId,
    NotebookSnapshot, Point, Side, StoreResult,
};
use std::collections::VecDeque;

/// A persistence request produced by the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Commit {
    Fetch {
        notebook: NotebookId,
    },
    CreateNote {
        notebook: NotebookId,
        kind: NoteKind,
        content: String,
        position: Option<Point>,
    },
    UpdateNote {
        note: NoteId,
        patch: NotePatch,
    },
    DeleteNote {
        note: NoteId,
    },
    CreateConnection {
        notebook: NotebookId,
        from: NoteId,
        to: NoteId,
        from_side: Side,
        to_side: Side,
    },
    DeleteConnection {
        connection: ConnectionId,
    },
    /// Upload pasted image bytes; on success the session follows up with a
    /// `CreateNote` at `position`.
    UploadImage {
        bytes: Vec<u8>,
        mime: String,
        position: Point,
    },
}

impl Commit {
    pub fn name(&self) -> &'static str {
        match self {
            Commit::Fetch { .. } => "fetch",
            Commit::CreateNote { .. } => "create_note",
            Commit::UpdateNote { .. } => "update_note",
            Commit::DeleteNote { .. } => "delete_note",
            Commit::CreateConnection { .. } => "create_connection",
            Commit::DeleteConnection { .. } => "delete_connection",
            Commit::UploadImage { .. } => "upload_image",
        }
    }
}

/// The store's answer to a [`Commit`].
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    Fetched(StoreResult<NotebookSnapshot>),
    NoteCreated(StoreResult<Note>),
    NoteUpdated {
        note: NoteId,
        result: StoreResult<Note>,
    },
    NoteDeleted {
        note: NoteId,
        result: StoreResult<()>,
    },
    ConnectionCreated(StoreResult<Connection>),
    ConnectionDeleted {
        connection: ConnectionId,
        result: StoreResult<()>,
    },
    ImageUploaded {
        position: Point,
        result: StoreResult<String>,
    },
}

/// Run one commit against the stores.
pub fn execute<S>(store: &mut S, commit: Commit) -> CommitOutcome
where
    S: NoteStore + BlobStore + ?Sized,
{
    log::info!("commit {}", commit.name());
    match commit {
        Commit::Fetch { notebook } => CommitOutcome::Fetched(store.fetch_notebook(notebook)),
        Commit::CreateNote {
            notebook,
            kind,
            content,
            position,
        } => CommitOutcome::NoteCreated(store.create_note(notebook, kind, &content, position)),
        Commit::UpdateNote { note, patch } => CommitOutcome::NoteUpdated {
            note,
            result: store.update_note(note, &patch),
        },
        Commit::DeleteNote { note } => CommitOutcome::NoteDeleted {
            note,
            result: store.delete_note(note),
        },
        Commit::CreateConnection {
            notebook,
            from,
            to,
            from_side,
            to_side,
        } => CommitOutcome::ConnectionCreated(
            store.create_connection(notebook, from, to, from_side, to_side),
        ),
        Commit::DeleteConnection { connection } => CommitOutcome::ConnectionDeleted {
            connection,
            result: store.delete_connection(connection),
        },
        Commit::UploadImage {
            bytes,
            mime,
            position,
        } => CommitOutcome::ImageUploaded {
            position,
            result: store.upload_image(&bytes, &mime),
        },
    }
}

/// FIFO of commits awaiting execution.
#[derive(Debug, Default)]
pub struct CommitQueue {
    pending: VecDeque<Commit>,
}

impl CommitQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Queue the commits among `effects` and return everything else.
    pub fn absorb(&mut self, effects: impl IntoIterator<Item = Effect>) -> Vec<Effect> {
        let mut rest = Vec::new();
        for effect in effects {
            match effect {
                Effect::Commit(commit) => self.pending.push_back(commit),
                other => rest.push(other),
            }
        }
        rest
    }

    /// Take the oldest commit without running it.
    pub fn pop(&mut self) -> Option<Commit> {
        self.pending.pop_front()
    }

    /// Execute pending commits in order, feeding each outcome back to the
    /// session, until nothing is left. Follow-up commits the session emits
    /// are queued behind the current ones. Returns the non-commit effects
    /// produced along the way.
    pub fn run<S>(&mut self, store: &mut S, session: &mut Session) -> Vec<Effect>
    where
        S: NoteStore + BlobStore + ?Sized,
    {
        let mut surfaced = Vec::new();
        while let Some(commit) = self.pending.pop_front() {
            let outcome = execute(store, commit);
            let follow_up = session.apply_outcome(outcome);
            surfaced.extend(self.absorb(follow_up));
        }
        surfaced
    }
}
