use crate::coords::{Mat4, Vec2, Vec3};
use crate::handoff::CameraKey;

/// Clip-space `w` below this counts as behind the camera.
const MIN_CLIP_W: f32 = 1e-5;

/// One camera as the producer sees it this frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraView {
    pub key: CameraKey,
    /// World-space eye position.
    pub position: Vec3,
    /// World to clip transform.
    pub view_proj: Mat4,
}

impl CameraView {
    pub fn new(key: CameraKey, position: Vec3, view_proj: Mat4) -> Self {
        Self {
            key,
            position,
            view_proj,
        }
    }

    /// Right-handed perspective camera at `eye` looking at `target`, +Y up.
    pub fn look_at(key: CameraKey, eye: Vec3, target: Vec3, fov_y: f32, aspect: f32) -> Self {
        let view = Mat4::look_at_rh(eye, target, Vec3::Y);
        let proj = Mat4::perspective_rh(fov_y, aspect, 0.1, 1000.0);
        Self::new(key, eye, proj * view)
    }

    /// Projects a world point to normalized screen space.
    ///
    /// Returns `None` for points behind the camera. Points in front but outside
    /// the frustum project outside [0, 1] and are still returned.
    pub fn project(&self, world: Vec3) -> Option<Vec2> {
        let clip = self.view_proj * world.extend(1.0);
        if clip.w <= MIN_CLIP_W {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(ndc.x * 0.5 + 0.5, -ndc.y * 0.5 + 0.5))
    }
}
