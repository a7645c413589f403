use crate::handoff::HandoffBuffer;
use crate::time::FrameSeq;

use super::camera::CameraView;
use super::light::{ScreenLight, TrackedLight};
use super::occluders::OcclusionQuery;

/// Outcome of one visibility pass for one camera.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct VisibilityReport {
    /// The result reached the handoff buffer (false if the camera is gone).
    pub published: bool,
    /// Lights that produced a `ScreenLight`.
    pub observed: usize,
    /// Lights skipped because they sit behind the camera.
    pub behind_camera: usize,
}

/// Producer-side visibility query.
///
/// Runs on the stage that owns world geometry, once per camera per frame.
/// Every occlusion ray is cast from the light toward the camera eye; thin or one-sided
/// geometry is tested in that direction only.
#[derive(Debug, Copy, Clone, Default)]
pub struct VisibilityStage {
    _private: (),
}

impl VisibilityStage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tests every light for `camera` and publishes the result under
    /// `camera.key`, stamped with `frame`.
    ///
    /// An empty light list still publishes an empty result, so the render stage
    /// can tell "ran, nothing visible" apart from "never ran".
    pub fn run<W>(
        &self,
        frame: FrameSeq,
        camera: &CameraView,
        lights: &[TrackedLight],
        world: &W,
        buffer: &HandoffBuffer,
    ) -> VisibilityReport
    where
        W: OcclusionQuery + ?Sized,
    {
        let mut observed = Vec::with_capacity(lights.len());
        let mut behind_camera = 0usize;

        for light in lights {
            let Some(screen_pos) = camera.project(light.position) else {
                behind_camera += 1;
                continue;
            };

            let occlusion = world.transmittance(light.position, camera.position);
            observed.push(
                ScreenLight::new(light.id, screen_pos, occlusion).with_intensity(light.intensity),
            );
        }

        let report = VisibilityReport {
            published: false,
            observed: observed.len(),
            behind_camera,
        };

        let published = buffer.publish(camera.key, frame, observed);
        if !published {
            log::debug!("visibility for camera {} dropped at frame {frame}: camera gone", camera.key);
        }

        VisibilityReport { published, ..report }
    }
}
