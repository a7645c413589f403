use crate::coords::Vec3;

use super::light::clamp_unit;

/// World-geometry line test owned by the simulation stage.
///
/// Implementations answer how much light passes along the segment `from → to`:
/// 1.0 unobstructed, 0.0 fully blocked. Only ever called from the producer.
pub trait OcclusionQuery {
    fn transmittance(&self, from: Vec3, to: Vec3) -> f32;
}

/// Geometry with nothing in it.
#[derive(Debug, Copy, Clone, Default)]
pub struct OpenSky;

impl OcclusionQuery for OpenSky {
    fn transmittance(&self, _from: Vec3, _to: Vec3) -> f32 {
        1.0
    }
}

/// A sphere occluder. `opacity` 1.0 blocks completely.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    pub opacity: f32,
}

impl Sphere {
    pub const fn solid(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius,
            opacity: 1.0,
        }
    }

    /// Whether the segment passes through the sphere.
    fn hits_segment(&self, from: Vec3, to: Vec3) -> bool {
        let seg = to - from;
        let len_sq = seg.length_squared();
        let t = if len_sq > 0.0 {
            ((self.center - from).dot(seg) / len_sq).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let closest = from + seg * t;
        closest.distance_squared(self.center) < self.radius * self.radius
    }
}

/// Scene geometry made of spheres; transmittance multiplies across every hit.
#[derive(Debug, Clone, Default)]
pub struct SphereOccluders {
    spheres: Vec<Sphere>,
}

impl SphereOccluders {
    pub fn new(spheres: Vec<Sphere>) -> Self {
        Self { spheres }
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    /// Simulation-side mutation between frames (moving occluders).
    pub fn spheres_mut(&mut self) -> &mut Vec<Sphere> {
        &mut self.spheres
    }
}

impl OcclusionQuery for SphereOccluders {
    fn transmittance(&self, from: Vec3, to: Vec3) -> f32 {
        let t = self
            .spheres
            .iter()
            .filter(|s| s.hits_segment(from, to))
            .fold(1.0, |acc, s| acc * (1.0 - clamp_unit(s.opacity)));
        clamp_unit(t)
    }
}
