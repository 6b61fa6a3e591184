//! WebGPU rendering module
//!
//! The renderer only reads the session; `scene` turns a snapshot into
//! flat-coloured triangles and `pipeline` draws them.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, viewport_to_ndc};
pub use scene::{build_scene, pipe_color};
pub use vertex::Vertex;
