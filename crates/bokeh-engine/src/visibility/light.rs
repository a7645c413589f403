use crate::coords::{Vec2, Vec3};

/// Stable identity of a scene light across frames.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct LightId(pub u32);

/// A light the visibility stage tests every frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TrackedLight {
    pub id: LightId,
    /// World-space position.
    pub position: Vec3,
    /// Brightness multiplier carried through to the bokeh color.
    pub intensity: f32,
}

impl TrackedLight {
    #[inline]
    pub const fn new(id: u32, position: Vec3) -> Self {
        Self {
            id: LightId(id),
            position,
            intensity: 1.0,
        }
    }

    /// Sets the brightness multiplier. Negative and non-finite values become 0.
    #[inline]
    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = clamp_intensity(intensity);
        self
    }
}

/// One light as seen by one camera in one frame.
///
/// Plain value: copied into the handoff buffer, never mutated afterwards.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScreenLight {
    pub id: LightId,
    /// Normalized screen position (origin top-left, [0, 1] on screen).
    pub screen_pos: Vec2,
    /// 1.0 = fully visible, 0.0 = fully blocked.
    pub occlusion: f32,
    pub intensity: f32,
}

impl ScreenLight {
    /// Builds an observation, clamping `occlusion` into [0, 1].
    #[inline]
    pub fn new(id: LightId, screen_pos: Vec2, occlusion: f32) -> Self {
        Self {
            id,
            screen_pos,
            occlusion: clamp_unit(occlusion),
            intensity: 1.0,
        }
    }

    /// Sets the brightness multiplier. Negative and non-finite values become 0.
    #[inline]
    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = clamp_intensity(intensity);
        self
    }

    /// True when nothing of the light gets through.
    #[inline]
    pub fn is_fully_occluded(&self) -> bool {
        self.occlusion <= 0.0
    }
}

/// Clamps into [0, 1]; NaN counts as blocked.
#[inline]
pub(crate) fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Finite and non-negative; anything else is dark.
#[inline]
pub(crate) fn clamp_intensity(v: f32) -> f32 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occlusion_is_clamped() {
        let id = LightId(0);
        assert_eq!(ScreenLight::new(id, Vec2::ZERO, 1.5).occlusion, 1.0);
        assert_eq!(ScreenLight::new(id, Vec2::ZERO, -0.5).occlusion, 0.0);
        assert_eq!(ScreenLight::new(id, Vec2::ZERO, f32::NAN).occlusion, 0.0);
    }

    #[test]
    fn fully_occluded_only_at_zero() {
        let id = LightId(0);
        assert!(ScreenLight::new(id, Vec2::ZERO, 0.0).is_fully_occluded());
        assert!(!ScreenLight::new(id, Vec2::ZERO, 0.01).is_fully_occluded());
    }

    #[test]
    fn intensity_is_finite_and_non_negative() {
        let light = |v| ScreenLight::new(LightId(0), Vec2::ZERO, 1.0).with_intensity(v);
        assert_eq!(light(2.5).intensity, 2.5);
        assert_eq!(light(-1.0).intensity, 0.0);
        assert_eq!(light(f32::NAN).intensity, 0.0);
        assert_eq!(light(f32::INFINITY).intensity, 0.0);

        let tracked = |v| TrackedLight::new(0, Vec3::ZERO).with_intensity(v);
        assert_eq!(tracked(-3.0).intensity, 0.0);
        assert_eq!(tracked(f32::NAN).intensity, 0.0);
        assert_eq!(tracked(4.0).intensity, 4.0);
    }
}
