//! Coordinate and color types shared by the visibility stage and renderers.
//!
//! Canonical screen space for bokeh data:
//! - normalized [0, 1] on both axes (values outside are off-screen)
//! - origin top-left, +X right, +Y down
//!
//! World-space math uses `glam`.

mod color;
mod viewport;

pub use color::ColorRgba;
pub use viewport::Viewport;

pub use glam::{Mat4, Vec2, Vec3, Vec4};

/// Screen center in normalized coordinates.
pub const SCREEN_CENTER: Vec2 = Vec2::new(0.5, 0.5);
