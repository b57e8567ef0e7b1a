//! Rendering adapter: backend-agnostic shader program building plus a text
//! renderer for headless use.
//!
//! # Invariants
//! - Renderers never mutate the scene.
//! - Building a shader program always yields a handle; problems are reported
//!   as diagnostics unless the caller asks for a strict build.

pub mod naga_backend;
mod renderer;
pub mod shader;

pub use naga_backend::{NagaBackend, NagaProgram};
pub use renderer::{DebugTextRenderer, Renderer};
pub use shader::{
    DiagnosticKind, LinkOutput, ProgramBuild, ShaderBackend, ShaderDiagnostic, ShaderError,
    ShaderProgramBuilder, ShaderStage, StageOutput, load_source,
};

pub fn crate_info() -> &'static str {
    "spincube-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
