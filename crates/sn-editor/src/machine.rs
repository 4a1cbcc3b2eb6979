//! Pointer gesture transitions.
//!
//! Pure functions over an explicit [`InteractionState`] value and the
//! notebook's notes. Nothing here talks to persistence: a release returns a
//! [`Release`] describing what happened, and the session turns that into
//! commits.
//!
//! A pointer-down outside `Idle` is ignored, so at most one gesture is
//! active at a time.

use sn_core::{CanvasConfig, InteractionState, Note, NoteId, Point, Side, Size};
use sn_render::{PointerTarget, anchor_target};
use std::mem;

/// The result of ending a gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Release {
    /// No gesture was active.
    Nothing,
    /// A drag ended; the note's final position.
    Moved { note: NoteId, x: f64, y: f64 },
    /// A resize ended; the note's final size.
    Resized {
        note: NoteId,
        width: f64,
        height: f64,
    },
    /// A connect gesture landed on an anchor of another note.
    Connect {
        from: NoteId,
        from_side: Side,
        to: NoteId,
        to_side: Side,
    },
    /// A connect gesture was released away from any eligible anchor.
    Missed,
}

/// Try to start a gesture. Returns `true` when the state changed.
///
/// Drag and resize entry is refused while a text note is being edited.
pub fn pointer_down(
    state: &mut InteractionState,
    notes: &[Note],
    target: PointerTarget,
    pos: Point,
    editing: bool,
) -> bool {
    if !state.is_idle() {
        log::trace!("pointer down ignored while {}", state.name());
        return false;
    }

    let next = match target {
        PointerTarget::DragHandle(id) if !editing => {
            let Some(note) = notes.iter().find(|n| n.id == id) else {
                return false;
            };
            InteractionState::Dragging {
                note: id,
                grab_offset: pos - note.origin(),
            }
        }
        PointerTarget::ResizeHandle(id) if !editing => {
            let Some(note) = notes.iter().find(|n| n.id == id) else {
                return false;
            };
            InteractionState::Resizing {
                note: id,
                start_pointer: pos,
                start_size: Size::new(note.width, note.height),
            }
        }
        PointerTarget::Anchor { note, side } => InteractionState::Connecting {
            from_note: note,
            from_side: side,
            pointer: pos,
        },
        _ => return false,
    };

    log::debug!("gesture start: {} -> {}", state.name(), next.name());
    *state = next;
    true
}

/// Advance the active gesture. Returns the note whose geometry changed.
pub fn pointer_move(
    state: &mut InteractionState,
    notes: &mut [Note],
    pos: Point,
    cfg: &CanvasConfig,
) -> Option<NoteId> {
    match state {
        InteractionState::Idle => None,
        InteractionState::Dragging { note, grab_offset } => {
            let target = notes.iter_mut().find(|n| n.id == *note)?;
            let origin = pos - *grab_offset;
            target.x = origin.x.max(0.0);
            target.y = origin.y.max(0.0);
            log::trace!("drag {} to ({}, {})", note, target.x, target.y);
            Some(*note)
        }
        InteractionState::Resizing {
            note,
            start_pointer,
            start_size,
        } => {
            let target = notes.iter_mut().find(|n| n.id == *note)?;
            let delta = pos - *start_pointer;
            target.width = (start_size.width + delta.x).max(cfg.min_note_width);
            target.height = (start_size.height + delta.y).max(cfg.min_note_height);
            log::trace!("resize {} to {}x{}", note, target.width, target.height);
            Some(*note)
        }
        InteractionState::Connecting { pointer, .. } => {
            *pointer = pos;
            None
        }
    }
}

/// End the active gesture and return to `Idle`.
pub fn pointer_up(
    state: &mut InteractionState,
    notes: &[Note],
    pos: Point,
    cfg: &CanvasConfig,
) -> Release {
    let release = match mem::take(state) {
        InteractionState::Idle => Release::Nothing,
        InteractionState::Dragging { note, .. } => match notes.iter().find(|n| n.id == note) {
            Some(n) => Release::Moved {
                note,
                x: n.x,
                y: n.y,
            },
            None => Release::Nothing,
        },
        InteractionState::Resizing { note, .. } => match notes.iter().find(|n| n.id == note) {
            Some(n) => Release::Resized {
                note,
                width: n.width,
                height: n.height,
            },
            None => Release::Nothing,
        },
        InteractionState::Connecting {
            from_note,
            from_side,
            ..
        } => match anchor_target(notes, pos, cfg.anchor_hit_radius, from_note) {
            Some((to, to_side)) => Release::Connect {
                from: from_note,
                from_side,
                to,
                to_side,
            },
            None => Release::Missed,
        },
    };
    if release != Release::Nothing {
        log::debug!("gesture end: {release:?}");
    }
    release
}

/// Abandon the active gesture without producing a release.
///
/// Geometry already applied by a drag or resize stays in place.
pub fn cancel(state: &mut InteractionState) -> bool {
    let was = mem::take(state);
    !was.is_idle()
}
