//! Rendering
//!
//! `scene` turns game state into a triangle list in field coordinates;
//! `pipeline` uploads it and maps it to the canvas.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, field_to_ndc, viewport_to_field};
pub use scene::{RenderOptions, match_frame, race_frame, runner_frame};
pub use vertex::Vertex;
