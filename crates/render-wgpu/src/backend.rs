use crate::gpu::{DEPTH_FORMAT, Vertex};
use crate::program::{ShaderProgram, Uniforms};
use spincube_render::{LinkOutput, ShaderBackend, ShaderStage, StageOutput};
use wgpu::util::DeviceExt;

/// Builds shader programs on a live wgpu device.
///
/// Each stage becomes a `ShaderModule` and linking creates the render
/// pipeline. Both steps run inside a validation error scope so failures come
/// back as logs instead of uncaptured device errors.
pub struct WgpuShaderBackend<'d> {
    device: &'d wgpu::Device,
    surface_format: wgpu::TextureFormat,
}

impl<'d> WgpuShaderBackend<'d> {
    pub fn new(device: &'d wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        Self {
            device,
            surface_format,
        }
    }

    fn scoped<T>(&self, f: impl FnOnce(&wgpu::Device) -> T) -> (T, Option<String>) {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let value = f(self.device);
        let error = pollster::block_on(self.device.pop_error_scope());
        (value, error.map(|e| e.to_string()))
    }
}

impl ShaderBackend for WgpuShaderBackend<'_> {
    type Stage = wgpu::ShaderModule;
    type Program = ShaderProgram;

    fn compile_stage(
        &mut self,
        stage: ShaderStage,
        label: &str,
        source: &str,
    ) -> StageOutput<wgpu::ShaderModule> {
        let (module, log) = self.scoped(|device| {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(label),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            })
        });
        tracing::debug!(%stage, %label, ok = log.is_none(), "created shader module");
        StageOutput { stage: module, log }
    }

    fn link_program(
        &mut self,
        label: &str,
        vertex: &wgpu::ShaderModule,
        fragment: &wgpu::ShaderModule,
    ) -> LinkOutput<ShaderProgram> {
        let surface_format = self.surface_format;
        let (program, log) = self.scoped(|device| {
            let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("uniform_buffer"),
                contents: bytemuck::bytes_of(&Uniforms::default()),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });

            let bind_group_layout =
                device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("uniform_bind_group_layout"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    }],
                });

            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("uniform_bind_group"),
                layout: &bind_group_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });

            let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("pipeline_layout"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });

            let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: vertex,
                    entry_point: None,
                    compilation_options: Default::default(),
                    buffers: &[Vertex::layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: fragment,
                    entry_point: None,
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: Some(wgpu::Face::Back),
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: Default::default(),
                    bias: Default::default(),
                }),
                multisample: Default::default(),
                multiview: None,
                cache: None,
            });

            ShaderProgram::new(label, pipeline, uniform_buffer, bind_group)
        });
        LinkOutput { program, log }
    }
}
