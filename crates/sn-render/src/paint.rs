//! Draw list → Vello drawing commands.
//!
//! Paints cards, anchors, connection lines with arrowheads, and the
//! connect drag line. Card contents (text, images) are left to the host's
//! text and image pipeline.

use crate::project::{NoteVisual, Primitive};
use kurbo::{Affine, BezPath, Cap, Circle, Join, Line, Point, RoundedRect, Stroke, Vec2};
use peniko::{Color, Fill};
use vello::Scene;

const CARD_FILL: Color = Color::from_rgba8(255, 255, 255, 255);
const CARD_BORDER: Color = Color::from_rgba8(229, 231, 235, 255);
const CARD_DRAGGING: Color = Color::from_rgba8(239, 68, 68, 255);
const CARD_RESIZING: Color = Color::from_rgba8(192, 132, 252, 255);
const CARD_EDITING: Color = Color::from_rgba8(59, 130, 246, 255);
const LINE: Color = Color::from_rgba8(59, 130, 246, 255);
const LINE_HOVERED: Color = Color::from_rgba8(239, 68, 68, 255);
const DRAG_LINE: Color = Color::from_rgba8(34, 197, 94, 255);
const ANCHOR: Color = Color::from_rgba8(34, 197, 94, 255);
const ANCHOR_HIGHLIGHT: Color = Color::from_rgba8(59, 130, 246, 255);

const CARD_RADIUS: f64 = 8.0;
const ANCHOR_RADIUS: f64 = 6.0;
const MARKER_RADIUS: f64 = 8.0;
const ARROW_LENGTH: f64 = 10.0;
const ARROW_HALF_WIDTH: f64 = 3.5;

/// Paint a whole draw list. Call once per frame with a freshly-cleared `Scene`.
pub fn paint_draw_list(scene: &mut Scene, list: &[Primitive]) {
    for prim in list {
        paint_primitive(scene, prim);
    }
}

fn paint_primitive(scene: &mut Scene, prim: &Primitive) {
    match prim {
        Primitive::Connection {
            from, to, hovered, ..
        } => {
            let (color, width) = if *hovered { (LINE_HOVERED, 3.0) } else { (LINE, 2.0) };
            paint_arrow(scene, *from, *to, color, width);
        }
        Primitive::DeleteMarker { center, .. } => {
            let circle = Circle::new(*center, MARKER_RADIUS);
            scene.fill(Fill::NonZero, Affine::IDENTITY, CARD_FILL, None, &circle);
            scene.stroke(&Stroke::new(2.0), Affine::IDENTITY, LINE_HOVERED, None, &circle);
            let d = MARKER_RADIUS * 0.4;
            let cross = Stroke::new(2.0).with_caps(Cap::Round);
            for (a, b) in [
                (Vec2::new(-d, -d), Vec2::new(d, d)),
                (Vec2::new(-d, d), Vec2::new(d, -d)),
            ] {
                let line = Line::new(*center + a, *center + b);
                scene.stroke(&cross, Affine::IDENTITY, LINE_HOVERED, None, &line);
            }
        }
        Primitive::DragLine { from, to } => paint_arrow(scene, *from, *to, DRAG_LINE, 2.0),
        Primitive::Note { rect, visual, id, .. } => {
            log::trace!("PAINT note {id} {visual:?} at ({}, {})", rect.x0, rect.y0);
            let shape = RoundedRect::from_rect(*rect, CARD_RADIUS);
            scene.fill(Fill::NonZero, Affine::IDENTITY, CARD_FILL, None, &shape);
            let (border, width) = match visual {
                NoteVisual::Idle => (CARD_BORDER, 1.0),
                NoteVisual::Dragging => (CARD_DRAGGING, 2.0),
                NoteVisual::Resizing => (CARD_RESIZING, 2.0),
                NoteVisual::Editing => (CARD_EDITING, 2.0),
            };
            let stroke = Stroke::new(width).with_join(Join::Round);
            scene.stroke(&stroke, Affine::IDENTITY, border, None, &shape);
        }
        Primitive::Anchor {
            point, highlighted, ..
        } => {
            let color = if *highlighted { ANCHOR_HIGHLIGHT } else { ANCHOR };
            let dot = Circle::new(*point, ANCHOR_RADIUS);
            scene.fill(Fill::NonZero, Affine::IDENTITY, color, None, &dot);
            scene.stroke(&Stroke::new(2.0), Affine::IDENTITY, CARD_FILL, None, &dot);
        }
    }
}

fn paint_arrow(scene: &mut Scene, from: Point, to: Point, color: Color, width: f64) {
    let line = Line::new(from, to);
    let stroke = Stroke::new(width).with_caps(Cap::Round);
    scene.stroke(&stroke, Affine::IDENTITY, color, None, &line);
    if let Some(head) = arrow_head(from, to) {
        scene.fill(Fill::NonZero, Affine::IDENTITY, color, None, &head);
    }
}

/// Triangle with its tip at `to`, pointing along `from → to`.
/// `None` for a zero-length line.
pub fn arrow_head(from: Point, to: Point) -> Option<BezPath> {
    let dir = to - from;
    let len = dir.hypot();
    if len < f64::EPSILON {
        return None;
    }
    let unit = dir / len;
    let normal = Vec2::new(-unit.y, unit.x);
    let base = to - unit * ARROW_LENGTH;

    let mut path = BezPath::new();
    path.move_to(to);
    path.line_to(base + normal * ARROW_HALF_WIDTH);
    path.line_to(base - normal * ARROW_HALF_WIDTH);
    path.close_path();
    Some(path)
}
