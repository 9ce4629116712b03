//! Line box editing core
//!
//! Backend-independent logic for the line box editor: grouping extracted
//! glyphs into words, merging words into text-line boxes, resize-handle
//! geometry, and the selection/hover state of every editable box.
//!
//! All coordinates are page units with a top-left origin.

pub mod config;
pub mod editable;
pub mod error;
pub mod geometry;
pub mod handles;
pub mod merge;
pub mod scene;
pub mod viewport;
pub mod words;

pub use config::{EditorConfig, ExportConfig, ExportMode};
pub use editable::{BoxEffect, BoxId, BoxPhase, EditableBox, PenKind, ResizeOutcome};
pub use error::CoreError;
pub use geometry::{Point, Rect};
pub use handles::{handle_points, resize_candidate, Anchor, CursorKind, HandlePoint};
pub use merge::{merge_words, LineBox, MergeThresholds};
pub use scene::{BoxScene, HitTarget, SceneEffect};
pub use viewport::Viewport;
pub use words::{group_words, Glyph, WordBox};
