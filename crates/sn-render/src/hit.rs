//! Hit testing: canvas point → pointer target.
//!
//! Reverse-walks the notes (last painted = topmost) and resolves which
//! part of which card lies under the pointer. Anchors are drawn above
//! every card, so they are tested across all notes before any card region.

use sn_core::geometry::{contains_point, within_anchor_hit_radius};
use sn_core::{CanvasConfig, Note, NoteId, Point, Rect, Side};

/// What a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// Empty canvas.
    Canvas,
    /// A connection anchor.
    Anchor { note: NoteId, side: Side },
    /// The bottom-right resize grip.
    ResizeHandle(NoteId),
    /// The grab strip along the top of a card.
    DragHandle(NoteId),
    /// Anywhere else on a card (content area).
    Body(NoteId),
}

impl PointerTarget {
    pub fn note(&self) -> Option<NoteId> {
        match self {
            PointerTarget::Canvas => None,
            PointerTarget::Anchor { note, .. } => Some(*note),
            PointerTarget::ResizeHandle(n) | PointerTarget::DragHandle(n) | PointerTarget::Body(n) => {
                Some(*n)
            }
        }
    }
}

pub fn drag_handle_rect(note: &Note, cfg: &CanvasConfig) -> Rect {
    let h = cfg.drag_handle_height.min(note.height);
    Rect::new(note.x, note.y, note.x + note.width, note.y + h)
}

pub fn resize_handle_rect(note: &Note, cfg: &CanvasConfig) -> Rect {
    let s = cfg.resize_handle_size;
    let r = note.rect();
    Rect::new(r.x1 - s, r.y1 - s, r.x1, r.y1)
}

/// Find the topmost target at `p`.
pub fn hit_test(notes: &[Note], p: Point, cfg: &CanvasConfig) -> PointerTarget {
    for note in notes.iter().rev() {
        if let Some(side) = anchor_at(note, p, cfg.anchor_hit_radius) {
            return PointerTarget::Anchor {
                note: note.id,
                side,
            };
        }
    }
    for note in notes.iter().rev() {
        if contains_point(resize_handle_rect(note, cfg), p) {
            return PointerTarget::ResizeHandle(note.id);
        }
        if contains_point(drag_handle_rect(note, cfg), p) {
            return PointerTarget::DragHandle(note.id);
        }
        if contains_point(note.rect(), p) {
            return PointerTarget::Body(note.id);
        }
    }
    PointerTarget::Canvas
}

/// The side of `note` whose anchor lies within `radius` of `p`, if any.
pub fn anchor_at(note: &Note, p: Point, radius: f64) -> Option<Side> {
    Side::ALL
        .into_iter()
        .find(|side| within_anchor_hit_radius(p, note.anchor(*side), radius))
}

/// The first anchor within `radius` of `p` on any note other than `exclude`,
/// in note order. This is the drop-target rule for a connect gesture.
pub fn anchor_target(
    notes: &[Note],
    p: Point,
    radius: f64,
    exclude: NoteId,
) -> Option<(NoteId, Side)> {
    notes
        .iter()
        .filter(|n| n.id != exclude)
        .find_map(|n| anchor_at(n, p, radius).map(|side| (n.id, side)))
}
