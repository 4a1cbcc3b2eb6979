//! One open notebook view.
//!
//! `Session` is the presentation-facing core. It owns the local,
//! authoritative copy of the notebook and its connections plus the
//! transient interaction state, handles input serially, and answers every
//! handler with a short list of [`Effect`]s. Persistence happens behind
//! the session's back: commits go out as effects and their outcomes come
//! back through [`Session::apply_outcome`].
//!
//! ## Write-behind rules
//!
//! | Change | Local state | Commit |
//! |--------|-------------|--------|
//! | drag / resize | applied on every move | `UpdateNote` on release |
//! | text edit | applied on save | `UpdateNote` |
//! | connect | inserted when acknowledged | `CreateConnection` |
//! | delete connection / note | removed immediately | `DeleteConnection` / `DeleteNote` |
//! | paste / create note | inserted when acknowledged | `CreateNote` (after `UploadImage` for images) |
//!
//! Failed commits become notifications; nothing is rolled back.
//! Acknowledged updates are never written over local geometry or content,
//! so a late response cannot undo a newer edit.

use crate::commit::{Commit, CommitOutcome};
use crate::edit::EditBuffer;
use crate::input::{InputEvent, Modifiers};
use crate::machine::{self, Release};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use serde::Serialize;
use smallvec::SmallVec;
use sn_core::{
    Band, CanvasBounds, CanvasConfig, ConnectionGraph, ConnectionId, InteractionState, Note,
    NoteId, NoteKind, NotePatch, Notebook, NotebookId, NotebookSnapshot, Point, StoreError,
    compute_bounds, place_new_note,
};
use sn_render::{Frame, PointerTarget, Primitive, hit_test, project};

/// Something the host must act on.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Run this against the stores and feed the outcome back.
    Commit(Commit),
    /// Show a non-blocking message.
    Notify(Notification),
    /// The notebook is gone; return to the notebook list.
    NavigateToList,
}

pub type Effects = SmallVec<[Effect; 2]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyLevel {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotifyLevel,
    pub message: String,
}

impl Notification {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NotifyLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotifyLevel::Error,
            message: message.into(),
        }
    }
}

fn commit(c: Commit) -> Effects {
    let mut out = Effects::new();
    out.push(Effect::Commit(c));
    out
}

fn notify(n: Notification) -> Effects {
    let mut out = Effects::new();
    out.push(Effect::Notify(n));
    out
}

pub struct Session {
    notebook: Notebook,
    graph: ConnectionGraph,
    interaction: InteractionState,
    editing: Option<EditBuffer>,
    /// Last sampled pointer position, canvas-local.
    pointer: Option<Point>,
    bounds: CanvasBounds,
    config: CanvasConfig,
}

impl Session {
    /// Open a session on an already-fetched notebook.
    pub fn new(snapshot: NotebookSnapshot, config: CanvasConfig) -> Self {
        let NotebookSnapshot {
            notebook,
            connections,
        } = snapshot;
        let bounds = compute_bounds(&notebook.notes, &config);
        log::info!(
            "open notebook {} ({} notes, {} connections)",
            notebook.id,
            notebook.notes.len(),
            connections.len()
        );
        Self {
            notebook,
            graph: ConnectionGraph::from_connections(connections),
            interaction: InteractionState::Idle,
            editing: None,
            pointer: None,
            bounds,
            config,
        }
    }

    /// Open an empty session and request the notebook's contents.
    pub fn open(id: NotebookId, config: CanvasConfig) -> (Self, Effects) {
        let empty = NotebookSnapshot {
            notebook: Notebook::new(id, ""),
            connections: Vec::new(),
        };
        let session = Self::new(empty, config);
        let effects = session.refresh();
        (session, effects)
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn notebook(&self) -> &Notebook {
        &self.notebook
    }

    pub fn notes(&self) -> &[Note] {
        &self.notebook.notes
    }

    pub fn note(&self, id: NoteId) -> Option<&Note> {
        self.notebook.note(id)
    }

    pub fn graph(&self) -> &ConnectionGraph {
        &self.graph
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn editing(&self) -> Option<&EditBuffer> {
        self.editing.as_ref()
    }

    pub fn bounds(&self) -> CanvasBounds {
        self.bounds
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// The notebook and its local connections as they stand now.
    pub fn snapshot(&self) -> NotebookSnapshot {
        NotebookSnapshot {
            notebook: self.notebook.clone(),
            connections: self.graph.connections().cloned().collect(),
        }
    }

    // ─── Frame derivation ────────────────────────────────────────────────

    fn frame(&self) -> Frame<'_> {
        Frame {
            notes: &self.notebook.notes,
            connections: &self.graph,
            interaction: &self.interaction,
            editing: self.editing.as_ref().map(|e| e.note),
            pointer: self.pointer,
            config: &self.config,
        }
    }

    /// The connection under the last sampled pointer position.
    pub fn hovered_connection(&self) -> Option<ConnectionId> {
        let frame = self.frame();
        frame.hovered_connection(&frame.segments())
    }

    /// This frame's draw list.
    pub fn render(&self) -> Vec<Primitive> {
        project(&self.frame())
    }

    /// What a pointer at `p` would land on.
    pub fn target_at(&self, p: Point) -> PointerTarget {
        hit_test(&self.notebook.notes, p, &self.config)
    }

    // ─── Pointer ─────────────────────────────────────────────────────────

    pub fn on_pointer_down(&mut self, target: PointerTarget, pos: Point) -> Effects {
        self.pointer = Some(pos);
        machine::pointer_down(
            &mut self.interaction,
            &self.notebook.notes,
            target,
            pos,
            self.editing.is_some(),
        );
        Effects::new()
    }

    pub fn on_pointer_move(&mut self, pos: Point) -> Effects {
        self.pointer = Some(pos);
        machine::pointer_move(&mut self.interaction, &mut self.notebook.notes, pos, &self.config);
        Effects::new()
    }

    pub fn on_pointer_up(&mut self, pos: Point) -> Effects {
        self.pointer = Some(pos);
        let release = machine::pointer_up(&mut self.interaction, &self.notebook.notes, pos, &self.config);
        match release {
            Release::Nothing | Release::Missed => Effects::new(),
            Release::Moved { note, x, y } => {
                self.settle_bounds();
                commit(Commit::UpdateNote {
                    note,
                    patch: NotePatch::position(x, y),
                })
            }
            Release::Resized {
                note,
                width,
                height,
            } => {
                self.settle_bounds();
                commit(Commit::UpdateNote {
                    note,
                    patch: NotePatch::size(width, height),
                })
            }
            Release::Connect {
                from,
                from_side,
                to,
                to_side,
            } => match self.graph.check(from, to, from_side, to_side) {
                Ok(()) => commit(Commit::CreateConnection {
                    notebook: self.notebook.id,
                    from,
                    to,
                    from_side,
                    to_side,
                }),
                Err(err) => {
                    log::warn!("connect {from}:{} -> {to}:{} rejected: {err}", from_side.as_str(), to_side.as_str());
                    notify(Notification::warning(err.to_string()))
                }
            },
        }
    }

    /// Enter edit mode on a text note. Ignored mid-drag or mid-resize.
    pub fn on_double_click(&mut self, note: NoteId) -> Effects {
        if self.interaction.moving_note().is_some() {
            return Effects::new();
        }
        if let Some(n) = self.notebook.note(note)
            && n.kind == NoteKind::Text
        {
            log::debug!("edit {note}");
            self.editing = Some(EditBuffer::open(note, &n.content));
        }
        Effects::new()
    }

    // ─── Keyboard & editing ──────────────────────────────────────────────

    /// Replace the working text of the note being edited.
    pub fn set_edit_text(&mut self, text: &str) -> Effects {
        if let Some(buf) = &mut self.editing {
            buf.set_text(text);
        }
        Effects::new()
    }

    pub fn on_key_down(&mut self, key: &str, modifiers: Modifiers) -> Effects {
        let Some(action) = ShortcutMap::resolve(key, modifiers, self.editing.is_some()) else {
            return Effects::new();
        };
        match action {
            ShortcutAction::DeleteHoveredConnection => match self.hovered_connection() {
                Some(id) => self.delete_connection(id),
                None => Effects::new(),
            },
            ShortcutAction::SaveEdit => self.save_edit(),
            ShortcutAction::Cancel => {
                if let Some(buf) = self.editing.take() {
                    log::debug!("edit {} cancelled", buf.note);
                } else if matches!(self.interaction, InteractionState::Connecting { .. }) {
                    machine::cancel(&mut self.interaction);
                }
                Effects::new()
            }
        }
    }

    /// Close edit mode, writing the buffer to the note if it changed.
    pub fn save_edit(&mut self) -> Effects {
        let Some(buf) = self.editing.take() else {
            return Effects::new();
        };
        let note = buf.note;
        let Some(content) = buf.finish() else {
            return Effects::new();
        };
        match self.notebook.note_mut(note) {
            Some(n) => n.content.clone_from(&content),
            None => return Effects::new(),
        }
        commit(Commit::UpdateNote {
            note,
            patch: NotePatch::content(content),
        })
    }

    // ─── Notes & connections ─────────────────────────────────────────────

    /// Where the layout planner would put a new note right now.
    pub fn next_note_position(&self) -> Point {
        let band = Band::for_canvas_height(self.bounds.height, &self.config);
        place_new_note(&self.notebook.notes, band, &self.config)
    }

    pub fn create_note(&mut self, kind: NoteKind, content: &str) -> Effects {
        if content.trim().is_empty() {
            return Effects::new();
        }
        commit(Commit::CreateNote {
            notebook: self.notebook.id,
            kind,
            content: content.to_owned(),
            position: Some(self.next_note_position()),
        })
    }

    /// Remove a note locally and request its deletion. Connections touching
    /// it stay in the local graph and stop rendering.
    pub fn delete_note(&mut self, id: NoteId) -> Effects {
        if self.notebook.remove_note(id).is_none() {
            return Effects::new();
        }
        if self.editing.as_ref().is_some_and(|e| e.note == id) {
            self.editing = None;
        }
        self.settle_bounds();
        commit(Commit::DeleteNote { note: id })
    }

    pub fn delete_connection(&mut self, id: ConnectionId) -> Effects {
        if self.graph.delete(id).is_some() {
            log::debug!("delete connection {id}");
        }
        commit(Commit::DeleteConnection { connection: id })
    }

    pub fn on_paste_text(&mut self, text: &str) -> Effects {
        if self.editing.is_some() {
            return Effects::new();
        }
        self.create_note(NoteKind::Text, text.trim())
    }

    pub fn on_paste_image(&mut self, bytes: Vec<u8>, mime: &str) -> Effects {
        if self.editing.is_some() {
            return Effects::new();
        }
        commit(Commit::UploadImage {
            bytes,
            mime: mime.to_owned(),
            position: self.next_note_position(),
        })
    }

    pub fn refresh(&self) -> Effects {
        commit(Commit::Fetch {
            notebook: self.notebook.id,
        })
    }

    /// Dispatch a normalized input event.
    pub fn handle(&mut self, event: &InputEvent) -> Effects {
        match event {
            InputEvent::PointerDown { x, y } => {
                let p = Point::new(*x, *y);
                let target = self.target_at(p);
                self.on_pointer_down(target, p)
            }
            InputEvent::PointerMove { x, y } => self.on_pointer_move(Point::new(*x, *y)),
            InputEvent::PointerUp { x, y } => self.on_pointer_up(Point::new(*x, *y)),
            InputEvent::DoubleClick { x, y } => match self.target_at(Point::new(*x, *y)).note() {
                Some(note) => self.on_double_click(note),
                None => Effects::new(),
            },
            InputEvent::Key { key, modifiers } => self.on_key_down(key, *modifiers),
            InputEvent::EditText { text } => self.set_edit_text(text),
            InputEvent::PasteText { text } => self.on_paste_text(text),
            InputEvent::PasteImage { bytes, mime } => self.on_paste_image(bytes.clone(), mime),
        }
    }

    // ─── Commit outcomes ─────────────────────────────────────────────────

    /// Feed back the result of a commit.
    pub fn apply_outcome(&mut self, outcome: CommitOutcome) -> Effects {
        match outcome {
            CommitOutcome::Fetched(Ok(snapshot)) => {
                self.replace_from(snapshot);
                Effects::new()
            }
            CommitOutcome::Fetched(Err(err)) if err.is_not_found() => {
                log::warn!("notebook {} is gone: {err}", self.notebook.id);
                let mut out = Effects::new();
                out.push(Effect::NavigateToList);
                out
            }
            CommitOutcome::Fetched(Err(err)) => {
                self.failed("load notebook", NotifyLevel::Error, &err)
            }
            CommitOutcome::NoteCreated(Ok(note)) => {
                if !self.notebook.contains(note.id) {
                    self.notebook.push_note(note);
                    self.settle_bounds();
                }
                self.refresh()
            }
            CommitOutcome::NoteCreated(Err(err)) => {
                self.failed("create note", NotifyLevel::Warning, &err)
            }
            CommitOutcome::NoteUpdated { note, result } => match result {
                Ok(_) => {
                    log::trace!("update ack for {note} discarded");
                    Effects::new()
                }
                Err(err) => self.failed(&format!("save note {note}"), NotifyLevel::Warning, &err),
            },
            CommitOutcome::NoteDeleted { note, result } => match result {
                Ok(()) => self.refresh(),
                Err(err) => {
                    self.failed(&format!("delete note {note}"), NotifyLevel::Warning, &err)
                }
            },
            CommitOutcome::ConnectionCreated(Ok(conn)) => {
                let id = conn.id;
                if let Err(err) = self.graph.insert(conn) {
                    log::debug!("connection {id} already present locally: {err}");
                }
                self.refresh()
            }
            CommitOutcome::ConnectionCreated(Err(err)) => {
                self.failed("create connection", NotifyLevel::Warning, &err)
            }
            CommitOutcome::ConnectionDeleted { connection, result } => match result {
                Ok(()) => self.refresh(),
                Err(err) => self.failed(
                    &format!("delete connection {connection}"),
                    NotifyLevel::Warning,
                    &err,
                ),
            },
            CommitOutcome::ImageUploaded { position, result } => match result {
                Ok(url) => commit(Commit::CreateNote {
                    notebook: self.notebook.id,
                    kind: NoteKind::Image,
                    content: url,
                    position: Some(position),
                }),
                Err(err) => self.failed("upload image", NotifyLevel::Error, &err),
            },
        }
    }

    fn failed(&self, what: &str, level: NotifyLevel, err: &StoreError) -> Effects {
        log::warn!("failed to {what}: {err}");
        notify(Notification {
            level,
            message: format!("Failed to {what}: {err}"),
        })
    }

    /// Adopt a fetched snapshot. The note under an active drag or resize
    /// keeps its local geometry; a gesture whose note vanished is dropped.
    fn replace_from(&mut self, snapshot: NotebookSnapshot) {
        let held = self
            .interaction
            .moving_note()
            .and_then(|id| self.notebook.note(id))
            .map(|n| (n.id, n.rect()));

        let NotebookSnapshot {
            notebook,
            connections,
        } = snapshot;
        self.notebook = notebook;
        self.graph = ConnectionGraph::from_connections(connections);

        if let Some((id, rect)) = held
            && let Some(n) = self.notebook.note_mut(id)
        {
            n.x = rect.x0;
            n.y = rect.y0;
            n.width = rect.width();
            n.height = rect.height();
        }

        let gesture_note = match self.interaction {
            InteractionState::Idle => None,
            InteractionState::Dragging { note, .. } | InteractionState::Resizing { note, .. } => {
                Some(note)
            }
            InteractionState::Connecting { from_note, .. } => Some(from_note),
        };
        if let Some(id) = gesture_note
            && !self.notebook.contains(id)
        {
            log::debug!("gesture on removed note {id} dropped");
            machine::cancel(&mut self.interaction);
        }
        if self
            .editing
            .as_ref()
            .is_some_and(|e| !self.notebook.contains(e.note))
        {
            self.editing = None;
        }

        log::info!(
            "refreshed notebook {} ({} notes, {} connections)",
            self.notebook.id,
            self.notebook.notes.len(),
            self.graph.len()
        );
        self.settle_bounds();
    }

    /// Recompute canvas bounds unless a drag or resize is in progress.
    fn settle_bounds(&mut self) {
        if self.interaction.moving_note().is_none() {
            self.bounds = compute_bounds(&self.notebook.notes, &self.config);
        }
    }
}
