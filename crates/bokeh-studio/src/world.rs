//! Demo scene driven by the simulation stage.

use std::f32::consts::TAU;

use bokeh_engine::coords::Vec3;
use bokeh_engine::handoff::CameraKey;
use bokeh_engine::time::FrameSeq;
use bokeh_engine::visibility::{CameraView, Sphere, SphereOccluders, TrackedLight};

const FOV_Y: f32 = std::f32::consts::FRAC_PI_3;

/// Lights on a slow ring with a few spheres drifting through the sight lines.
pub struct DemoWorld {
    lights: Vec<TrackedLight>,
    occluders: SphereOccluders,
    frame: Option<FrameSeq>,
}

impl DemoWorld {
    pub fn new(light_count: usize) -> Self {
        let lights = (0..light_count)
            .map(|i| TrackedLight::new(i as u32, Vec3::ZERO).with_intensity(1.0 + (i % 3) as f32))
            .collect();
        let occluders = SphereOccluders::new(vec![
            Sphere::solid(Vec3::new(0.0, 0.0, -8.0), 1.5),
            Sphere {
                center: Vec3::new(4.0, 1.0, -12.0),
                radius: 2.0,
                opacity: 0.6,
            },
        ]);

        let mut world = Self {
            lights,
            occluders,
            frame: None,
        };
        world.advance_to(FrameSeq::ZERO);
        world
    }

    /// Moves lights and occluders to their state at `frame`. No-op when the
    /// world is already there, so several cameras can share one frame.
    pub fn advance_to(&mut self, frame: FrameSeq) {
        if self.frame == Some(frame) {
            return;
        }
        self.frame = Some(frame);

        let t = frame.get() as f32 / 60.0;
        let n = self.lights.len().max(1) as f32;
        for (i, light) in self.lights.iter_mut().enumerate() {
            let phase = i as f32 / n * TAU + t * 0.3;
            light.position = Vec3::new(phase.cos() * 12.0, 2.0 + phase.sin() * 3.0, -20.0);
        }

        if let Some(drifter) = self.occluders.spheres_mut().first_mut() {
            drifter.center.x = (t * 0.8).sin() * 6.0;
        }
    }

    pub fn lights(&self) -> &[TrackedLight] {
        &self.lights
    }

    pub fn occluders(&self) -> &SphereOccluders {
        &self.occluders
    }
}

/// Camera `index` orbiting the origin, staggered so cameras see different
/// light arrangements.
pub fn orbit_camera(key: CameraKey, index: usize, frame: FrameSeq, aspect: f32) -> CameraView {
    let t = frame.get() as f32 / 60.0;
    let angle = index as f32 * 0.4 + (t * 0.5).sin() * 0.2;
    let eye = Vec3::new(angle.sin() * 3.0, 0.5, angle.cos() * 3.0);
    CameraView::look_at(key, eye, Vec3::new(0.0, 1.0, -20.0), FOV_Y, aspect)
}
