//! Per-frame steps of the two host stages.

use bokeh_engine::handoff::CameraKey;
use bokeh_engine::hooks::ViewSetupHook;
use bokeh_engine::time::{FrameCursor, FrameSeq};

use crate::world::orbit_camera;

/// Simulation step: view setup for every camera at `frame`, then marks the
/// frame as produced.
pub fn produce_frame(
    setup: &mut ViewSetupHook,
    keys: &[CameraKey],
    frame: FrameSeq,
    aspect: f32,
    cursor: &FrameCursor,
) {
    for (index, &key) in keys.iter().enumerate() {
        setup.run(&orbit_camera(key, index, frame, aspect), frame);
    }
    cursor.publish(frame);
}

/// Frame number the render stage draws under: the producer's latest.
pub fn render_frame(cursor: &FrameCursor) -> FrameSeq {
    cursor.latest().unwrap_or(FrameSeq::ZERO)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::mpsc;
    use std::thread;

    use bokeh_engine::coords::Viewport;
    use bokeh_engine::flare::FlareLibrary;
    use bokeh_engine::render::{InstanceBackend, SubmitError};
    use bokeh_engine::{BokehConfig, BokehSystem};

    use super::*;
    use crate::world::DemoWorld;

    /// Accepts every draw without a device.
    struct Discard;

    impl InstanceBackend for Discard {
        type Buffer = ();

        fn create_instance_buffer(&mut self, _label: &str, _bytes: &[u8]) -> Result<(), SubmitError> {
            Ok(())
        }

        fn draw_instanced(&mut self, _buffer: &(), _v: u32, _n: u32) -> Result<(), SubmitError> {
            Ok(())
        }
    }

    const VIEWPORT: Viewport = Viewport::new(640.0, 360.0);

    #[test]
    fn render_frame_is_zero_before_first_publish() {
        assert_eq!(render_frame(&FrameCursor::new()), FrameSeq::ZERO);
    }

    #[test]
    fn lockstep_stages_stay_within_one_frame() {
        const FRAMES: u64 = 40;

        let mut system = BokehSystem::new(BokehConfig::default(), Arc::new(FlareLibrary::default()));
        let keys: Vec<CameraKey> = (0..2).map(|i| system.register_camera(i).unwrap()).collect();

        let producer = system.producer();
        let mut world = DemoWorld::new(4);
        let mut setup = ViewSetupHook::new();
        setup
            .register(move |view, frame| {
                world.advance_to(frame);
                producer.on_view_setup(frame, view, world.lights(), world.occluders());
            })
            .unwrap();

        let cursor = FrameCursor::new();
        // Rendezvous: the producer finishes frame N, then render frame N runs
        // while the producer works on N + 1.
        let (done, next) = mpsc::sync_channel::<()>(0);
        let aspect = VIEWPORT.width / VIEWPORT.height;

        thread::scope(|s| {
            s.spawn(|| {
                for n in 0..FRAMES {
                    produce_frame(&mut setup, &keys, FrameSeq(n), aspect, &cursor);
                    if done.send(()).is_err() {
                        break;
                    }
                }
            });

            // Owned here so a failed assertion drops it and unblocks the producer.
            let next = next;
            for n in 0..FRAMES {
                next.recv().unwrap();
                let frame = render_frame(&cursor);
                assert!(frame >= FrameSeq(n));

                for &key in &keys {
                    let report = system.render_with(key, frame, VIEWPORT, &mut Discard);
                    let staleness = report.staleness().expect("camera has visibility");
                    assert!(staleness <= 1, "frame {frame}: {staleness} behind");
                }
            }
        });
    }

    #[test]
    fn slow_producer_does_not_inflate_staleness() {
        let mut system = BokehSystem::new(BokehConfig::default(), Arc::new(FlareLibrary::default()));
        let key = system.register_camera(0).unwrap();
        let producer = system.producer();
        let world = DemoWorld::new(2);

        let cursor = FrameCursor::new();
        let mut setup = ViewSetupHook::new();
        setup
            .register(move |view, frame| {
                producer.on_view_setup(frame, view, world.lights(), world.occluders());
            })
            .unwrap();
        produce_frame(&mut setup, &[key], FrameSeq(3), 1.0, &cursor);

        // Several render frames between producer frames all draw frame 3.
        for _ in 0..5 {
            let report = system.render_with(key, render_frame(&cursor), VIEWPORT, &mut Discard);
            assert_eq!(report.frame, FrameSeq(3));
            assert_eq!(report.staleness(), Some(0));
        }
    }
}
