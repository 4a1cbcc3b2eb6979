//! Notebook data model.
//!
//! A notebook owns an ordered list of note cards placed on an unbounded
//! canvas. Connections are directed edges between anchor points on two
//! cards; they live in [`crate::graph::ConnectionGraph`] and refer to notes
//! by id only, so a connection may outlive one of its endpoints.
//!
//! All coordinates are canvas-local; mapping from screen space is the
//! host's concern.

use crate::config::CanvasConfig;
use crate::geometry;
use crate::id::{ConnectionId, NoteId, NotebookId};
use chrono::{DateTime, Utc};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

// ─── Sides & kinds ───────────────────────────────────────────────────────

/// One of the four anchor positions on a card edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// All sides, in hit-test order.
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Right => "right",
            Side::Bottom => "bottom",
            Side::Left => "left",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    /// Plain text, editable in place.
    Text,
    /// `content` holds the image URL.
    Image,
}

// ─── Notes ───────────────────────────────────────────────────────────────

/// A card on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    #[serde(rename = "type")]
    pub kind: NoteKind,
    pub content: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub created_at: DateTime<Utc>,
}

impl Note {
    /// A note with the configured default size.
    pub fn new(id: NoteId, kind: NoteKind, content: impl Into<String>, x: f64, y: f64) -> Self {
        let cfg = CanvasConfig::default();
        Self {
            id,
            kind,
            content: content.into(),
            x,
            y,
            width: cfg.default_note_width,
            height: cfg.default_note_height,
            created_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Anchor point on the given side of this card.
    pub fn anchor(&self, side: Side) -> Point {
        geometry::anchor_point(self.rect(), side)
    }

    /// Apply a partial update. Position is floored at the origin and size
    /// at the configured minimums; out-of-range values are clamped, never
    /// rejected.
    pub fn apply_patch(&mut self, patch: &NotePatch, cfg: &CanvasConfig) {
        if let Some(x) = patch.x {
            self.x = x.max(0.0);
        }
        if let Some(y) = patch.y {
            self.y = y.max(0.0);
        }
        if let Some(w) = patch.width {
            self.width = w.max(cfg.min_note_width);
        }
        if let Some(h) = patch.height {
            self.height = h.max(cfg.min_note_height);
        }
        if let Some(content) = &patch.content {
            self.content.clone_from(content);
        }
    }
}

/// Partial note update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl NotePatch {
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    pub fn size(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Default::default()
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_none()
            && self.y.is_none()
            && self.width.is_none()
            && self.height.is_none()
            && self.content.is_none()
    }
}

// ─── Connections ─────────────────────────────────────────────────────────

/// A directed edge from an anchor on one note to an anchor on another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: ConnectionId,
    pub from_note_id: NoteId,
    pub to_note_id: NoteId,
    pub from_side: Side,
    pub to_side: Side,
}

/// The identity of an edge for deduplication purposes.
pub type EdgeKey = (NoteId, NoteId, Side, Side);

impl Connection {
    pub fn key(&self) -> EdgeKey {
        (self.from_note_id, self.to_note_id, self.from_side, self.to_side)
    }

    pub fn touches(&self, note: NoteId) -> bool {
        self.from_note_id == note || self.to_note_id == note
    }
}

// ─── Notebooks ───────────────────────────────────────────────────────────

/// A named canvas owning its notes in creation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notebook {
    pub id: NotebookId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl Notebook {
    pub fn new(id: NotebookId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            subtitle: None,
            cover_image: None,
            created_at: Utc::now(),
            notes: Vec::new(),
        }
    }

    pub fn note(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn note_mut(&mut self, id: NoteId) -> Option<&mut Note> {
        self.notes.iter_mut().find(|n| n.id == id)
    }

    pub fn contains(&self, id: NoteId) -> bool {
        self.notes.iter().any(|n| n.id == id)
    }

    /// Append a note, keeping creation order.
    pub fn push_note(&mut self, note: Note) {
        self.notes.push(note);
    }

    pub fn remove_note(&mut self, id: NoteId) -> Option<Note> {
        let pos = self.notes.iter().position(|n| n.id == id)?;
        Some(self.notes.remove(pos))
    }
}

/// A notebook together with every connection touching its notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotebookSnapshot {
    #[serde(flatten)]
    pub notebook: Notebook,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

/// One row of the notebook list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotebookSummary {
    pub id: NotebookId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub note_count: usize,
    pub created_at: DateTime<Utc>,
}
