use crate::coords::Viewport;
use crate::render::{RenderCtx, RenderTarget};

/// One frame being recorded against the scene-color target.
///
/// Owns a cloned device handle so it can be passed by value through host hooks
/// and handed back. Finish it with [`Gpu::submit`](super::Gpu::submit).
pub struct SceneFrame {
    pub device: wgpu::Device,
    pub format: wgpu::TextureFormat,
    pub viewport: Viewport,
    pub encoder: wgpu::CommandEncoder,
    pub color_view: wgpu::TextureView,
}

impl SceneFrame {
    /// Splits the frame into a renderer context and a draw target.
    pub fn split(&mut self) -> (RenderCtx<'_>, RenderTarget<'_>) {
        (
            RenderCtx::new(&self.device, self.format),
            RenderTarget {
                encoder: &mut self.encoder,
                color_view: &self.color_view,
            },
        )
    }

    /// Records a pass clearing the target to `color`.
    pub fn clear(&mut self, color: wgpu::Color) {
        let _pass = self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("scene clear"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
    }
}
