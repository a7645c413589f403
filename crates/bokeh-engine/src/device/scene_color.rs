use anyhow::Result;

use crate::coords::Viewport;

/// HDR format of the scene-color target; bokeh is added before tone mapping.
pub const SCENE_COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Off-screen HDR color target standing in for the host's scene color.
pub struct SceneColor {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    viewport: Viewport,
}

impl SceneColor {
    pub fn new(device: &wgpu::Device, viewport: Viewport) -> Result<Self> {
        anyhow::ensure!(viewport.is_valid(), "scene color has zero size: {viewport:?}");

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("scene color"),
            size: wgpu::Extent3d {
                width: viewport.width as u32,
                height: viewport.height as u32,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: SCENE_COLOR_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Ok(Self {
            texture,
            view,
            viewport,
        })
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.texture.format()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// Backing texture; `COPY_SRC`, so it can be read back.
    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }
}
