//! Model + interaction state → draw list.
//!
//! A pure function re-derived every frame; nothing here is cached between
//! frames. Hover is computed from the sampled pointer position rather than
//! from enter/leave events.
//!
//! Draw order (back to front): connections, delete marker, drag line,
//! notes in creation order, anchors.

use crate::hit::anchor_target;
use sn_core::{
    CanvasConfig, ConnectionGraph, ConnectionId, ConnectionSegment, InteractionState, Note, NoteId,
    NoteKind, Point, Rect, Side, hit_test_segments, project_for_render,
};

/// How a card should look this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteVisual {
    Idle,
    Dragging,
    Resizing,
    Editing,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Connection {
        id: ConnectionId,
        from: Point,
        to: Point,
        hovered: bool,
    },
    /// The "×" affordance at the midpoint of a hovered connection.
    DeleteMarker { connection: ConnectionId, center: Point },
    /// The rubber-band line of an in-progress connect gesture.
    DragLine { from: Point, to: Point },
    Note {
        id: NoteId,
        rect: Rect,
        kind: NoteKind,
        visual: NoteVisual,
    },
    Anchor {
        note: NoteId,
        side: Side,
        point: Point,
        highlighted: bool,
    },
}

/// Everything a frame is derived from.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub notes: &'a [Note],
    pub connections: &'a ConnectionGraph,
    pub interaction: &'a InteractionState,
    /// The text note currently in edit mode, if any.
    pub editing: Option<NoteId>,
    /// Last sampled pointer position in canvas coordinates.
    pub pointer: Option<Point>,
    pub config: &'a CanvasConfig,
}

impl Frame<'_> {
    pub fn segments(&self) -> Vec<ConnectionSegment> {
        project_for_render(self.connections.connections(), self.notes)
    }

    /// The connection under the pointer. Only live while no gesture is active.
    pub fn hovered_connection(&self, segments: &[ConnectionSegment]) -> Option<ConnectionId> {
        if !self.interaction.is_idle() {
            return None;
        }
        let p = self.pointer?;
        hit_test_segments(segments, p, self.config.connection_hit_band)
    }

    /// The anchor a connect gesture would land on if released now.
    pub fn drop_target(&self) -> Option<(NoteId, Side)> {
        match *self.interaction {
            InteractionState::Connecting {
                from_note, pointer, ..
            } => anchor_target(self.notes, pointer, self.config.anchor_hit_radius, from_note),
            _ => None,
        }
    }

    fn visual(&self, id: NoteId) -> NoteVisual {
        match *self.interaction {
            InteractionState::Dragging { note, .. } if note == id => NoteVisual::Dragging,
            InteractionState::Resizing { note, .. } if note == id => NoteVisual::Resizing,
            _ if self.editing == Some(id) => NoteVisual::Editing,
            _ => NoteVisual::Idle,
        }
    }
}

/// Build this frame's draw list.
pub fn project(frame: &Frame<'_>) -> Vec<Primitive> {
    let segments = frame.segments();
    let hovered = frame.hovered_connection(&segments);
    let mut out = Vec::with_capacity(segments.len() + frame.notes.len() * 5 + 2);

    for seg in &segments {
        out.push(Primitive::Connection {
            id: seg.id,
            from: seg.from,
            to: seg.to,
            hovered: hovered == Some(seg.id),
        });
    }
    if let Some(seg) = segments.iter().find(|s| Some(s.id) == hovered) {
        out.push(Primitive::DeleteMarker {
            connection: seg.id,
            center: seg.midpoint(),
        });
    }

    if let InteractionState::Connecting {
        from_note,
        from_side,
        pointer,
    } = *frame.interaction
        && let Some(source) = frame.notes.iter().find(|n| n.id == from_note)
    {
        out.push(Primitive::DragLine {
            from: source.anchor(from_side),
            to: pointer,
        });
    }

    for note in frame.notes {
        out.push(Primitive::Note {
            id: note.id,
            rect: note.rect(),
            kind: note.kind,
            visual: frame.visual(note.id),
        });
    }

    let target = frame.drop_target();
    for note in frame.notes {
        for side in Side::ALL {
            out.push(Primitive::Anchor {
                note: note.id,
                side,
                point: note.anchor(side),
                highlighted: target == Some((note.id, side)),
            });
        }
    }

    log::trace!(
        "projected {} primitives ({} connections, hovered {:?})",
        out.len(),
        segments.len(),
        hovered
    );
    out
}
