//! The modal pointer-gesture state of a canvas view.
//!
//! Exactly one variant is active at a time. The value is transient and
//! process-local; it is never persisted. Transitions live in
//! `sn-editor`; this crate only defines the shape so render projection can
//! read it.

use crate::id::NoteId;
use crate::model::Side;
use kurbo::{Point, Size, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Moving a card. `grab_offset` is pointer − card origin at grab time.
    Dragging { note: NoteId, grab_offset: Vec2 },
    /// Growing or shrinking a card from its bottom-right corner.
    Resizing {
        note: NoteId,
        start_pointer: Point,
        start_size: Size,
    },
    /// Dragging a new connection out of an anchor.
    Connecting {
        from_note: NoteId,
        from_side: Side,
        pointer: Point,
    },
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionState::Idle)
    }

    /// The note whose geometry the current gesture is changing.
    pub fn moving_note(&self) -> Option<NoteId> {
        match self {
            InteractionState::Dragging { note, .. } | InteractionState::Resizing { note, .. } => {
                Some(*note)
            }
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            InteractionState::Idle => "idle",
            InteractionState::Dragging { .. } => "dragging",
            InteractionState::Resizing { .. } => "resizing",
            InteractionState::Connecting { .. } => "connecting",
        }
    }
}
