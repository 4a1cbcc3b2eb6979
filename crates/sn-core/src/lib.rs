pub mod bounds;
pub mod config;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod id;
pub mod interaction;
pub mod layout;
pub mod memory_store;
pub mod model;
pub mod store;

pub use bounds::{CanvasBounds, compute_bounds};
pub use config::CanvasConfig;
pub use error::{ConnectionError, StoreError, StoreResult};
pub use graph::{ConnectionGraph, ConnectionSegment, hit_test_segments, project_for_render};
pub use id::{ConnectionId, NoteId, NotebookId};
pub use interaction::InteractionState;
pub use layout::{Band, place_new_note};
pub use memory_store::MemoryStore;
pub use model::*;
pub use store::{BlobStore, NoteStore};

// Re-export kurbo geometry types so downstream crates share one Point/Rect.
pub use kurbo::{Point, Rect, Size, Vec2};
