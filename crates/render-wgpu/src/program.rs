use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Uniform block shared by both stages, laid out as in `vertex.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct Uniforms {
    model: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
}

impl Default for Uniforms {
    fn default() -> Self {
        let identity = Mat4::IDENTITY.to_cols_array_2d();
        Self {
            model: identity,
            view: identity,
            projection: identity,
        }
    }
}

impl Uniforms {
    fn set(&mut self, uniform: Uniform, value: Mat4) {
        let cols = value.to_cols_array_2d();
        match uniform {
            Uniform::Model => self.model = cols,
            Uniform::View => self.view = cols,
            Uniform::Projection => self.projection = cols,
        }
    }
}

/// Named matrix uniforms the program exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Uniform {
    Model,
    View,
    Projection,
}

/// A linked vertex + fragment pipeline and the uniform block it reads.
///
/// May be invalid if compilation or linking failed; drawing with an invalid
/// program surfaces a wgpu validation error instead of rendering.
pub struct ShaderProgram {
    pub(crate) pipeline: wgpu::RenderPipeline,
    pub(crate) uniform_buffer: wgpu::Buffer,
    pub(crate) bind_group: wgpu::BindGroup,
    pub(crate) uniforms: Uniforms,
    label: String,
}

impl ShaderProgram {
    pub(crate) fn new(
        label: &str,
        pipeline: wgpu::RenderPipeline,
        uniform_buffer: wgpu::Buffer,
        bind_group: wgpu::BindGroup,
    ) -> Self {
        Self {
            pipeline,
            uniform_buffer,
            bind_group,
            uniforms: Uniforms::default(),
            label: label.to_string(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Bind the program for uniform uploads and draws. Only one binding can
    /// exist at a time; dropping it ends the binding.
    pub fn bind<'p>(&'p mut self, queue: &'p wgpu::Queue) -> ProgramBinding<'p> {
        ProgramBinding {
            program: self,
            queue,
            dirty: false,
        }
    }
}

/// Scoped binding of a [`ShaderProgram`]. Uniform writes are staged and
/// flushed to the GPU before the next draw.
pub struct ProgramBinding<'p> {
    program: &'p mut ShaderProgram,
    queue: &'p wgpu::Queue,
    dirty: bool,
}

impl ProgramBinding<'_> {
    pub fn set(&mut self, uniform: Uniform, value: Mat4) {
        self.program.uniforms.set(uniform, value);
        self.dirty = true;
    }

    fn flush(&mut self) {
        if self.dirty {
            self.queue.write_buffer(
                &self.program.uniform_buffer,
                0,
                bytemuck::bytes_of(&self.program.uniforms),
            );
            self.dirty = false;
        }
    }

    /// Upload pending uniforms and draw `vertex_count` non-indexed vertices.
    ///
    /// Every draw recorded in one pass reads the uniform values current at
    /// submit time.
    pub fn draw(
        &mut self,
        pass: &mut wgpu::RenderPass<'_>,
        vertices: &wgpu::Buffer,
        vertex_count: u32,
    ) {
        self.flush();
        pass.set_pipeline(&self.program.pipeline);
        pass.set_bind_group(0, &self.program.bind_group, &[]);
        pass.set_vertex_buffer(0, vertices.slice(..));
        pass.draw(0..vertex_count, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_block_is_three_matrices() {
        assert_eq!(std::mem::size_of::<Uniforms>(), 3 * 64);
    }

    #[test]
    fn default_uniforms_are_identity() {
        let u = Uniforms::default();
        assert_eq!(u.model, Mat4::IDENTITY.to_cols_array_2d());
        assert_eq!(u.projection, u.view);
    }

    #[test]
    fn set_writes_only_the_named_matrix() {
        let mut u = Uniforms::default();
        let model = Mat4::from_translation(glam::Vec3::new(3.0, 0.0, 0.25));
        u.set(Uniform::Model, model);
        assert_eq!(u.model, model.to_cols_array_2d());
        assert_eq!(u.view, Mat4::IDENTITY.to_cols_array_2d());
        assert_eq!(u.projection, Mat4::IDENTITY.to_cols_array_2d());
    }
}
