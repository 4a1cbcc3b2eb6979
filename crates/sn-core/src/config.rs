//! Canvas tunables.
//!
//! Every magic number the canvas engine uses lives here so hosts can
//! override them (the replay host reads a `config` object from its script).
//! Missing fields fall back to the defaults below.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Smallest width a resize gesture may produce.
    pub min_note_width: f64,
    /// Smallest height a resize gesture may produce.
    pub min_note_height: f64,
    /// Size given to notes created without an explicit size.
    pub default_note_width: f64,
    pub default_note_height: f64,

    /// Pointer-to-anchor distance that counts as "on" the anchor.
    pub anchor_hit_radius: f64,
    /// Full width of the invisible band around a connection line.
    pub connection_hit_band: f64,
    /// Height of the grab strip along the top of a card.
    pub drag_handle_height: f64,
    /// Side of the square resize grip in the bottom-right corner.
    pub resize_handle_size: f64,

    /// Notes whose `y` is within this distance of the band share a row.
    pub row_tolerance: f64,
    /// Horizontal gap between packed notes in a row.
    pub note_gap: f64,
    /// `x` of the first note in an empty row.
    pub default_column_x: f64,
    /// New rows start this far above the bottom of the canvas.
    pub band_offset: f64,
    /// New rows never start above this `y`.
    pub band_min_y: f64,

    /// Empty space kept beyond the farthest note edge.
    pub bounds_margin: f64,
    pub min_canvas_width: f64,
    pub min_canvas_height: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            min_note_width: 200.0,
            min_note_height: 150.0,
            default_note_width: 300.0,
            default_note_height: 200.0,
            anchor_hit_radius: 10.0,
            connection_hit_band: 12.0,
            drag_handle_height: 32.0,
            resize_handle_size: 16.0,
            row_tolerance: 50.0,
            note_gap: 50.0,
            default_column_x: 100.0,
            band_offset: 300.0,
            band_min_y: 100.0,
            bounds_margin: 300.0,
            min_canvas_width: 1400.0,
            min_canvas_height: 600.0,
        }
    }
}
