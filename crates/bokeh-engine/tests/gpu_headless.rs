//! Draws through a real wgpu device. Skipped when the machine has no adapter.

use std::sync::Arc;

use bokeh_engine::compose::BokehInstance;
use bokeh_engine::coords::{Vec3, Viewport};
use bokeh_engine::device::{Gpu, GpuInit, SCENE_COLOR_FORMAT, SceneColor};
use bokeh_engine::flare::FlareLibrary;
use bokeh_engine::render::{BokehRenderer, DrawSubmitter, RenderCtx, RenderTarget, SubmitOutcome};
use bokeh_engine::time::FrameSeq;
use bokeh_engine::visibility::{CameraView, OpenSky, TrackedLight};
use bokeh_engine::{BokehConfig, BokehSystem};

/// 64 px of Rgba16Float is 512 bytes, already a multiple of the copy
/// alignment, so rows need no padding.
const SIDE: u32 = 64;
const BYTES_PER_PIXEL: u32 = 8;

fn gpu() -> Option<Gpu> {
    match Gpu::new_headless_blocking(GpuInit::default()) {
        Ok(gpu) => Some(gpu),
        Err(e) => {
            eprintln!("skipping: no GPU adapter ({e:#})");
            None
        }
    }
}

fn scene(gpu: &Gpu) -> SceneColor {
    gpu.create_scene_color(Viewport::new(SIDE as f32, SIDE as f32)).unwrap()
}

/// Copies the whole target into host memory.
fn read_back(gpu: &Gpu, scene: &SceneColor) -> Vec<u8> {
    let bytes_per_row = SIDE * BYTES_PER_PIXEL;
    let buffer = gpu.device().create_buffer(&wgpu::BufferDescriptor {
        label: Some("scene readback"),
        size: u64::from(bytes_per_row * SIDE),
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = gpu
        .device()
        .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("readback") });
    encoder.copy_texture_to_buffer(
        scene.texture().as_image_copy(),
        wgpu::TexelCopyBufferInfo {
            buffer: &buffer,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(SIDE),
            },
        },
        scene.texture().size(),
    );
    gpu.queue().submit(std::iter::once(encoder.finish()));

    let slice = buffer.slice(..);
    slice.map_async(wgpu::MapMode::Read, |r| r.unwrap());
    gpu.wait_idle().unwrap();
    let data = slice.get_mapped_range().to_vec();
    data
}

/// Raw f16 bits of the RGB channels at pixel (x, y).
fn rgb_bits(data: &[u8], x: u32, y: u32) -> [u16; 3] {
    let at = ((y * SIDE + x) * BYTES_PER_PIXEL) as usize;
    let ch = |i: usize| u16::from_le_bytes([data[at + 2 * i], data[at + 2 * i + 1]]);
    [ch(0), ch(1), ch(2)]
}

fn centered(half: f32) -> BokehInstance {
    BokehInstance {
        center: [0.5, 0.5],
        half_size: [half, half],
        color: [1.0, 1.0, 1.0, 1.0],
        ..BokehInstance::default()
    }
}

#[test]
fn light_leaves_bokeh_on_scene_color() {
    let Some(gpu) = gpu() else { return };
    let scene = scene(&gpu);

    let mut system = BokehSystem::new(BokehConfig::default(), Arc::new(FlareLibrary::default()));
    let key = system.register_camera(0).unwrap();
    let camera = CameraView::look_at(key, Vec3::ZERO, Vec3::NEG_Z, std::f32::consts::FRAC_PI_3, 1.0);
    let light = TrackedLight::new(0, Vec3::new(-3.0, 1.0, -10.0));
    let screen = camera.project(light.position).unwrap();

    system
        .producer()
        .on_view_setup(FrameSeq(0), &camera, &[light], &OpenSky);

    let mut frame = gpu.begin_frame(&scene);
    frame.clear(wgpu::Color::TRANSPARENT);
    let report = system.render_scene(key, FrameSeq(0), &mut frame);
    gpu.submit(frame).unwrap();

    assert!(matches!(report.outcome, SubmitOutcome::Drawn { .. }));
    assert_eq!(system.submit_stats().failures, 0);

    let data = read_back(&gpu, &scene);
    let (x, y) = ((screen.x * SIDE as f32) as u32, (screen.y * SIDE as f32) as u32);
    assert!(rgb_bits(&data, x, y).iter().any(|&c| c != 0), "black at light ({x}, {y})");
}

#[test]
fn zero_instances_leave_target_untouched() {
    let Some(gpu) = gpu() else { return };
    let scene = scene(&gpu);

    let mut renderer = BokehRenderer::new();
    let mut submitter = DrawSubmitter::new();

    let mut frame = gpu.begin_frame(&scene);
    frame.clear(wgpu::Color::TRANSPARENT);
    let (ctx, mut target) = frame.split();
    let outcome = renderer.render(&ctx, &mut target, &mut submitter, &[]);
    gpu.submit(frame).unwrap();

    assert_eq!(outcome, SubmitOutcome::Skipped);
    assert_eq!(renderer.pipeline_format(), None);
    assert!(read_back(&gpu, &scene).iter().all(|&b| b == 0));
}

#[test]
fn centered_instance_lights_the_center() {
    let Some(gpu) = gpu() else { return };
    let scene = scene(&gpu);

    let mut renderer = BokehRenderer::new();
    let mut submitter = DrawSubmitter::new();

    let mut frame = gpu.begin_frame(&scene);
    frame.clear(wgpu::Color::TRANSPARENT);
    let (ctx, mut target) = frame.split();
    let outcome = renderer.render(&ctx, &mut target, &mut submitter, &[centered(0.25)]);
    gpu.submit(frame).unwrap();

    assert_eq!(outcome, SubmitOutcome::Drawn { instances: 1 });
    let data = read_back(&gpu, &scene);
    assert!(rgb_bits(&data, SIDE / 2, SIDE / 2).iter().all(|&c| c != 0));
    // Corners sit outside the quad.
    assert_eq!(rgb_bits(&data, 0, 0), [0, 0, 0]);
}

#[test]
fn oversized_upload_fails_without_panicking() {
    let Some(gpu) = gpu() else { return };
    let scene = scene(&gpu);

    let mut renderer = BokehRenderer::new();
    let mut submitter = DrawSubmitter::new();

    let mut frame = gpu.begin_frame(&scene);
    let (ctx, mut target) = frame.split();
    let ctx = RenderCtx {
        max_instance_bytes: 16,
        ..ctx
    };
    let outcome = renderer.render(&ctx, &mut target, &mut submitter, &[centered(0.1)]);
    gpu.submit(frame).unwrap();

    assert_eq!(outcome, SubmitOutcome::Failed);
    assert_eq!(submitter.stats().failures, 1);
    assert_eq!(submitter.stats().draw_calls, 0);
}

#[test]
fn integer_target_fails_and_keeps_no_pipeline() {
    let Some(gpu) = gpu() else { return };
    let device = gpu.device();

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("integer target"),
        size: wgpu::Extent3d {
            width: SIDE,
            height: SIDE,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Uint,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let mut encoder =
        device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("integer") });

    let mut renderer = BokehRenderer::new();
    let mut submitter = DrawSubmitter::new();

    let ctx = RenderCtx::new(device, wgpu::TextureFormat::Rgba8Uint);
    let mut target = RenderTarget {
        encoder: &mut encoder,
        color_view: &view,
    };
    let outcome = renderer.render(&ctx, &mut target, &mut submitter, &[centered(0.1)]);

    assert_eq!(outcome, SubmitOutcome::Failed);
    assert_eq!(submitter.stats().failures, 1);
    assert_eq!(renderer.pipeline_format(), None);

    // The same renderer still works on a blendable target afterwards.
    let scene = scene(&gpu);
    let mut frame = gpu.begin_frame(&scene);
    let (ctx, mut target) = frame.split();
    let outcome = renderer.render(&ctx, &mut target, &mut submitter, &[centered(0.1)]);
    gpu.submit(frame).unwrap();

    assert_eq!(outcome, SubmitOutcome::Drawn { instances: 1 });
    assert_eq!(renderer.pipeline_format(), Some(SCENE_COLOR_FORMAT));
}
