mod config;
mod stages;
mod world;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use anyhow::{Context, Result, anyhow};
use parking_lot::Mutex;

use bokeh_engine::device::{Gpu, GpuInit, SceneColor, SceneFrame};
use bokeh_engine::flare::{FlareLibrary, FlareSet};
use bokeh_engine::handoff::CameraKey;
use bokeh_engine::hooks::{BeforeBloomHook, ViewSetupHook};
use bokeh_engine::logging::{LoggingConfig, init_logging};
use bokeh_engine::time::{FrameClock, FrameCursor};
use bokeh_engine::{BokehConfig, BokehSystem, VisibilityProducer};

use config::StudioConfig;
use stages::{produce_frame, render_frame};
use world::DemoWorld;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());
    let config = StudioConfig::from_args(std::env::args().skip(1))?;
    run(&config)
}

/// Plays the host: a simulation thread driving view-setup hooks and a render
/// loop driving before-bloom hooks, sharing nothing but the bokeh system.
fn run(config: &StudioConfig) -> Result<()> {
    let gpu = Gpu::new_headless_blocking(GpuInit::default())?;
    let scene = gpu.create_scene_color(config.viewport)?;

    let library = Arc::new(load_library(config)?);
    let system = BokehSystem::new(
        BokehConfig {
            max_cameras: config.cameras,
            ..BokehConfig::default()
        },
        library,
    );

    let keys = (0..config.cameras)
        .map(|i| system.register_camera(i as u64))
        .collect::<Result<Vec<CameraKey>, _>>()
        .context("registering cameras")?;

    let producer = system.producer();
    let system = Arc::new(Mutex::new(system));

    let mut before_bloom: BeforeBloomHook<SceneFrame> = BeforeBloomHook::new();
    let hooked = Arc::clone(&system);
    before_bloom.register(move |key, frame, mut target: SceneFrame| {
        let report = hooked.lock().render_scene(key, frame, &mut target);
        log::trace!("camera {key} frame {frame}: {:?}", report.outcome);
        target
    })?;

    let running = AtomicBool::new(true);
    let cursor = FrameCursor::new();
    let produced = thread::scope(|s| -> Result<u64> {
        let sim = s.spawn(|| simulate(config, &keys, producer, &cursor, &running));

        let rendered = render(&gpu, &scene, config, &keys, &cursor, &mut before_bloom);
        running.store(false, Ordering::Relaxed);

        let produced = sim
            .join()
            .map_err(|_| anyhow!("simulation thread panicked"))??;
        rendered?;
        Ok(produced)
    })?;

    let system = system.lock();
    for &key in &keys {
        system.teardown_camera(key);
    }

    let stats = system.submit_stats();
    log::info!(
        "done: {} render frames, {} producer frames, {} draws, {} instances, {} skipped, {} failed",
        config.frames,
        produced,
        stats.draw_calls,
        stats.instances,
        stats.skipped,
        stats.failures
    );
    Ok(())
}

fn load_library(config: &StudioConfig) -> Result<FlareLibrary> {
    let library = FlareLibrary::default();
    if let Some(path) = &config.flare_set {
        let set = FlareSet::load(path)
            .with_context(|| format!("loading flare set {}", path.display()))?;
        let name = set.name().to_string();
        library.insert(set);
        library.select(&name)?;
    }
    Ok(library)
}

/// Simulation stage. Owns the frame clock and runs until the render stage is
/// done.
fn simulate(
    config: &StudioConfig,
    keys: &[CameraKey],
    producer: VisibilityProducer,
    cursor: &FrameCursor,
    running: &AtomicBool,
) -> Result<u64> {
    let aspect = config.viewport.width / config.viewport.height;

    let mut world = DemoWorld::new(config.lights);
    let mut setup = ViewSetupHook::new();
    setup.register(move |view, frame| {
        world.advance_to(frame);
        let report = producer.on_view_setup(frame, view, world.lights(), world.occluders());
        log::trace!(
            "camera {} frame {frame}: {} lights, {} behind",
            view.key,
            report.observed,
            report.behind_camera
        );
    })?;

    let mut clock = FrameClock::new();
    let mut produced = 0;
    while running.load(Ordering::Relaxed) {
        let time = clock.tick();
        produce_frame(&mut setup, keys, time.frame, aspect, cursor);
        produced += 1;
        thread::sleep(config.producer_frame_time);
    }
    Ok(produced)
}

/// Render stage: per camera, clear, before-bloom, bloom, submit. Frames are
/// numbered by the producer through `cursor`.
fn render(
    gpu: &Gpu,
    scene: &SceneColor,
    config: &StudioConfig,
    keys: &[CameraKey],
    cursor: &FrameCursor,
    before_bloom: &mut BeforeBloomHook<SceneFrame>,
) -> Result<()> {
    for _ in 0..config.frames {
        let frame = render_frame(cursor);
        for &key in keys {
            let mut target = gpu.begin_frame(scene);
            target.clear(wgpu::Color::BLACK);

            let mut target = before_bloom.run(key, frame, target);
            // Bloom and tone mapping belong to the host; mark where they go.
            target.encoder.insert_debug_marker("bloom");

            gpu.submit(target)?;
        }
    }

    gpu.wait_idle()
}
