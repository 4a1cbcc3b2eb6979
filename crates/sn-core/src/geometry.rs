//! Rectangle and point math for the canvas.
//!
//! Anchors are derived, never stored: each is a pure function of a card
//! rectangle and a side.

use crate::model::Side;
use kurbo::{Line, ParamCurveNearest, Point, Rect};

/// Anchor point on `side` of `rect`: edge midpoints.
pub fn anchor_point(rect: Rect, side: Side) -> Point {
    let c = rect.center();
    match side {
        Side::Top => Point::new(c.x, rect.y0),
        Side::Right => Point::new(rect.x1, c.y),
        Side::Bottom => Point::new(c.x, rect.y1),
        Side::Left => Point::new(rect.x0, c.y),
    }
}

/// Euclidean distance.
pub fn distance(p: Point, q: Point) -> f64 {
    p.distance(q)
}

/// True when `p` lies within `radius` of `anchor` (boundary inclusive).
pub fn within_anchor_hit_radius(p: Point, anchor: Point, radius: f64) -> bool {
    distance(p, anchor) <= radius
}

/// Inclusive point-in-rectangle test.
pub fn contains_point(rect: Rect, p: Point) -> bool {
    p.x >= rect.x0 && p.x <= rect.x1 && p.y >= rect.y0 && p.y <= rect.y1
}

/// Shortest distance from `p` to the finite segment `a`–`b`.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    if a == b {
        return distance(p, a);
    }
    Line::new(a, b).nearest(p, 1e-9).distance_sq.sqrt()
}

pub fn midpoint(a: Point, b: Point) -> Point {
    a.midpoint(b)
}
