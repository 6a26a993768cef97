/// WF3D Core Library - Shared geometry, transform and curve logic
///
/// This library provides the core of the wireframe renderer: composable
/// affine transforms, parametric shape generation, orthographic mapping to
/// canvas pixels and Hermite/Bezier curve sampling. Output goes through the
/// [`DrawingSurface`] trait so any 2D line API can display it.

pub mod config;
pub mod curve;
pub mod error;
pub mod geometry;
pub mod matrix;
pub mod projection;
pub mod shape;
pub mod surface;
pub mod transform;

// Re-export commonly used types
pub use config::SceneConfig;
pub use curve::{Bezier, Control, ControlHandle, ControlPoint, Curve, Hermite};
pub use error::{Result, Wf3dError};
pub use geometry::{Edge, Mesh, MeshData, ShapeKind, Vertex};
pub use projection::{canvas_to_model, model_to_canvas, Viewport};
pub use shape::{Drawable, Shape, Transformable};
pub use surface::{DrawCommand, DrawingSurface, RecordingSurface};
pub use transform::Transform;
