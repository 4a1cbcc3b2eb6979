//! Insertion layout for new notes.
//!
//! New notes are packed left-to-right along a horizontal band near the
//! bottom of the canvas. Only notes already in that band are avoided;
//! notes in other rows may still overlap the result.

use crate::config::CanvasConfig;
use crate::model::Note;
use kurbo::Point;

/// The row a new note should land in, plus the `x` used when the row is empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub x: f64,
    pub y: f64,
}

impl Band {
    /// The default band for a canvas of the given height:
    /// `y = max(band_min_y, height - band_offset)`, `x = default_column_x`.
    pub fn for_canvas_height(canvas_height: f64, cfg: &CanvasConfig) -> Self {
        Self {
            x: cfg.default_column_x,
            y: (canvas_height - cfg.band_offset).max(cfg.band_min_y),
        }
    }
}

/// Position for a new note: right of the rightmost note in the band, or the
/// band's default `x` when the band is empty.
pub fn place_new_note(notes: &[Note], band: Band, cfg: &CanvasConfig) -> Point {
    let rightmost = notes
        .iter()
        .filter(|n| (n.y - band.y).abs() < cfg.row_tolerance)
        .map(|n| n.x + n.width)
        .fold(None, |acc: Option<f64>, edge| Some(acc.map_or(edge, |a| a.max(edge))));

    let x = match rightmost {
        Some(edge) => edge + cfg.note_gap,
        None => band.x,
    };
    log::debug!("placing note at ({x}, {}), row occupied: {}", band.y, rightmost.is_some());
    Point::new(x, band.y)
}
