use anyhow::{Context, Result};

use crate::coords::Viewport;
use crate::render::capture_errors;

use super::{GpuInit, SceneColor, SceneFrame};

/// Owns wgpu core objects for off-screen rendering.
///
/// No surface is created; frames render into a [`SceneColor`] target owned by
/// the caller.
pub struct Gpu {
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl Gpu {
    /// Acquires an adapter and device with no presentation surface.
    pub async fn new_headless(init: GpuInit) -> Result<Self> {
        let GpuInit {
            power_preference,
            allow_fallback_adapter,
            required_features,
            required_limits,
        } = init;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) if allow_fallback_adapter => {
                log::warn!("no hardware adapter ({e}); trying fallback");
                instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference,
                        compatible_surface: None,
                        force_fallback_adapter: true,
                    })
                    .await
                    .context("failed to find any GPU adapter")?
            }
            Err(e) => return Err(e).context("failed to find a suitable GPU adapter"),
        };

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("bokeh-engine device"),
                required_features,
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        log::info!("gpu: {:?}", adapter.get_info());

        Ok(Self {
            adapter,
            device,
            queue,
        })
    }

    /// Blocking variant of [`Gpu::new_headless`].
    pub fn new_headless_blocking(init: GpuInit) -> Result<Self> {
        pollster::block_on(Self::new_headless(init))
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Starts recording a frame against `scene`.
    pub fn begin_frame(&self, scene: &SceneColor) -> SceneFrame {
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("bokeh frame encoder"),
            });

        SceneFrame {
            device: self.device.clone(),
            format: scene.format(),
            viewport: scene.viewport(),
            encoder,
            color_view: scene.view().clone(),
        }
    }

    /// Submits the recorded commands for `frame`.
    ///
    /// Validation errors deferred to encoder finish are returned here instead
    /// of panicking in the device's default error handler.
    pub fn submit(&self, frame: SceneFrame) -> Result<()> {
        capture_errors(&self.device, || {
            self.queue.submit(std::iter::once(frame.encoder.finish()));
        })
        .map_err(|e| anyhow::anyhow!("frame submit failed: {e}"))
    }

    /// Blocks until all submitted work has finished.
    pub fn wait_idle(&self) -> Result<()> {
        self.device
            .poll(wgpu::PollType::wait_indefinitely())
            .context("device poll failed")?;
        Ok(())
    }

    /// Convenience for a viewport-sized HDR target.
    pub fn create_scene_color(&self, viewport: Viewport) -> Result<SceneColor> {
        SceneColor::new(&self.device, viewport)
    }
}
