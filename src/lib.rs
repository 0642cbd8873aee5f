//! Freehand stroke rendering: gesture recognition over raw pointer events,
//! velocity-based width estimation, and incremental tessellation of smooth,
//! anti-aliased ink ribbons.
//!
//! The host feeds timestamped pointer events into a [`StrokeController`]
//! and calls [`StrokeController::frame`] once per render frame; finished
//! geometry reaches the host through the [`Canvas`] trait as triangle
//! batches ready for GPU upload.

pub mod config;
pub mod geom;
pub mod input;
pub mod mesh;
pub mod stroke;

pub use config::StrokeConfig;
pub use input::{Gesture, GestureState, LongPressRecognizer, PanRecognizer, VelocityCalculator};
pub use mesh::{Color, Mesh, MeshError, Vertex};
pub use stroke::{Canvas, LinePoint, RibbonTessellator, StrokeController};
