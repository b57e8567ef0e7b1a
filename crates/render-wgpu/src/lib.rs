//! wgpu render backend for spincube.
//!
//! Links the demo's vertex and fragment shaders into a render pipeline and
//! draws the cube with the camera's view and projection.
//!
//! # Invariants
//! - Rendering never mutates the scene.
//! - Uniform uploads go through an explicit [`ProgramBinding`]; no bound
//!   program state is shared between draws.

mod backend;
mod gpu;
mod program;

pub use backend::WgpuShaderBackend;
pub use gpu::CubeRenderer;
pub use program::{ProgramBinding, ShaderProgram, Uniform};
