use wgpu::util::DeviceExt;

use crate::compose::BokehInstance;

use super::capture_errors;
use super::submit::{DrawSubmitter, InstanceBackend, SubmitError, SubmitOutcome};
use super::{RenderCtx, RenderTarget};

/// Renderer compositing bokeh instances onto a scene-color target.
///
/// The pipeline and bind group layout are cached per target format: they are
/// built on the first draw for a format and reused every frame after that,
/// not rebuilt per frame. Instance storage and its bind group are created
/// fresh for every draw, so nothing the GPU may still be reading from a
/// previous frame is ever written to.
///
/// Device errors raised while building or drawing are captured in error
/// scopes and reported as [`SubmitOutcome::Failed`]; a failed build leaves
/// no cached pipeline behind.
#[derive(Default)]
pub struct BokehRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
}

impl BokehRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Format the cached pipeline was built for, if any.
    pub fn pipeline_format(&self) -> Option<wgpu::TextureFormat> {
        self.pipeline_format
    }

    /// Draws `instances` onto `target` through `submitter`.
    ///
    /// Zero instances: no pipeline work and no render pass.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        submitter: &mut DrawSubmitter,
        instances: &[BokehInstance],
    ) -> SubmitOutcome {
        if instances.is_empty() {
            return submitter.submit(&mut NullBackend, instances);
        }

        if let Err(e) = self.ensure_pipeline(ctx) {
            return submitter.record_failure(&e);
        }

        let (Some(pipeline), Some(bgl)) = (self.pipeline.as_ref(), self.bind_group_layout.as_ref())
        else {
            return submitter.record_failure(&SubmitError::Backend("bokeh pipeline missing".into()));
        };

        let mut backend = WgpuInstanceBackend {
            device: ctx.device,
            max_bytes: ctx.max_instance_bytes,
            target,
            pipeline,
            bind_group_layout: bgl,
        };
        submitter.submit(&mut backend, instances)
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) -> Result<(), SubmitError> {
        if self.pipeline_format == Some(ctx.target_format) && self.pipeline.is_some() {
            return Ok(());
        }

        self.pipeline_format = None;
        self.pipeline = None;
        self.bind_group_layout = None;

        check_blendable(ctx)?;

        let (pipeline, bind_group_layout) =
            capture_errors(ctx.device, || build_pipeline(ctx)).map_err(|e| {
                SubmitError::Backend(format!(
                    "bokeh pipeline for {:?} failed: {e}",
                    ctx.target_format
                ))
            })?;

        log::debug!("bokeh pipeline built for {:?}", ctx.target_format);

        self.pipeline_format = Some(ctx.target_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);
        Ok(())
    }
}

/// Additive blending needs a renderable, blendable target (float or unorm).
fn check_blendable(ctx: &RenderCtx<'_>) -> Result<(), SubmitError> {
    let features = ctx
        .target_format
        .guaranteed_format_features(ctx.device.features());

    let renderable = features
        .allowed_usages
        .contains(wgpu::TextureUsages::RENDER_ATTACHMENT);
    let blendable = features
        .flags
        .contains(wgpu::TextureFormatFeatureFlags::BLENDABLE);

    if renderable && blendable {
        Ok(())
    } else {
        Err(SubmitError::Backend(format!(
            "target format {:?} is not a blendable render attachment",
            ctx.target_format
        )))
    }
}

fn build_pipeline(ctx: &RenderCtx<'_>) -> (wgpu::RenderPipeline, wgpu::BindGroupLayout) {
    let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("bokeh shader"),
        source: wgpu::ShaderSource::Wgsl(BOKEH_WGSL.into()),
    });

    let bind_group_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("bokeh instance bgl"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only: true },
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(BokehInstance::SIZE as u64),
            },
            count: None,
        }],
    });

    let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("bokeh pipeline layout"),
        bind_group_layouts: &[&bind_group_layout],
        immediate_size: 0,
    });

    let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("bokeh pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[],
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: ctx.target_format,
                blend: Some(additive_blend()),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleStrip,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    });

    (pipeline, bind_group_layout)
}

const BOKEH_WGSL: &str = include_str!("shaders/bokeh.wgsl");

/// Light adds on top of the scene; alpha accumulates like `OVER`.
fn additive_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent::OVER,
    }
}

/// Instance storage for one draw.
pub struct FrameInstances {
    _buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// [`InstanceBackend`] over a wgpu device and a scene-color target.
///
/// Each draw records its own render pass that loads and stores the target.
pub struct WgpuInstanceBackend<'a, 't> {
    device: &'a wgpu::Device,
    max_bytes: u64,
    target: &'a mut RenderTarget<'t>,
    pipeline: &'a wgpu::RenderPipeline,
    bind_group_layout: &'a wgpu::BindGroupLayout,
}

impl InstanceBackend for WgpuInstanceBackend<'_, '_> {
    type Buffer = FrameInstances;

    fn create_instance_buffer(
        &mut self,
        label: &str,
        bytes: &[u8],
    ) -> Result<FrameInstances, SubmitError> {
        let len = bytes.len() as u64;
        if len > self.max_bytes {
            return Err(SubmitError::TooLarge {
                bytes: len,
                limit: self.max_bytes,
            });
        }

        let device = self.device;
        let layout = self.bind_group_layout;
        capture_errors(device, || {
            let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytes,
                usage: wgpu::BufferUsages::STORAGE,
            });

            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("bokeh instance bind group"),
                layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            });

            FrameInstances {
                _buffer: buffer,
                bind_group,
            }
        })
        .map_err(|e| SubmitError::Backend(e.to_string()))
    }

    fn draw_instanced(
        &mut self,
        buffer: &FrameInstances,
        vertices_per_instance: u32,
        instance_count: u32,
    ) -> Result<(), SubmitError> {
        let pipeline = self.pipeline;
        let target = &mut *self.target;
        capture_errors(self.device, || {
            let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("bokeh pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(pipeline);
            rpass.set_bind_group(0, &buffer.bind_group, &[]);
            rpass.draw(0..vertices_per_instance, 0..instance_count);
        })
        .map_err(|e| SubmitError::Backend(e.to_string()))
    }
}

/// Backend for the empty case; the submitter never calls it.
struct NullBackend;

impl InstanceBackend for NullBackend {
    type Buffer = ();

    fn create_instance_buffer(&mut self, _label: &str, _bytes: &[u8]) -> Result<(), SubmitError> {
        Err(SubmitError::Backend("no device bound".into()))
    }

    fn draw_instanced(&mut self, _buffer: &(), _v: u32, _n: u32) -> Result<(), SubmitError> {
        Err(SubmitError::Backend("no device bound".into()))
    }
}
