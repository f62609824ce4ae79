//! WebGPU rendering module
//!
//! Flat-colored triangle quads built on the CPU each frame, mapped to NDC
//! by the camera offset and drawn in a single pass.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::build_scene;
