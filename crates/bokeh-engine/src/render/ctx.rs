/// Device state one bokeh draw needs.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    /// Format of the scene-color target bokeh is composited onto.
    pub target_format: wgpu::TextureFormat,
    /// Largest instance array a single storage binding can hold.
    pub max_instance_bytes: u64,
}

impl<'a> RenderCtx<'a> {
    pub fn new(device: &'a wgpu::Device, target_format: wgpu::TextureFormat) -> Self {
        Self {
            device,
            target_format,
            max_instance_bytes: u64::from(device.limits().max_storage_buffer_binding_size),
        }
    }
}

/// Scene-color attachment being recorded into. Bokeh passes load and store it.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}
