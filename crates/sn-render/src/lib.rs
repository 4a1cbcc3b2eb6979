pub mod hit;
pub mod paint;
pub mod project;

pub use hit::{PointerTarget, anchor_target, hit_test};
pub use paint::paint_draw_list;
pub use project::{Frame, NoteVisual, Primitive, project};
