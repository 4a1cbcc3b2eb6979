//! Canvas extent derived from note extents.

use crate::config::CanvasConfig;
use crate::model::Note;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasBounds {
    pub width: f64,
    pub height: f64,
}

impl CanvasBounds {
    /// The minimum canvas.
    pub fn minimum(cfg: &CanvasConfig) -> Self {
        Self {
            width: cfg.min_canvas_width,
            height: cfg.min_canvas_height,
        }
    }
}

/// Farthest note edge plus the margin, floored at the minimum canvas size.
pub fn compute_bounds(notes: &[Note], cfg: &CanvasConfig) -> CanvasBounds {
    notes.iter().fold(CanvasBounds::minimum(cfg), |acc, n| CanvasBounds {
        width: acc.width.max(n.x + n.width + cfg.bounds_margin),
        height: acc.height.max(n.y + n.height + cfg.bounds_margin),
    })
}
