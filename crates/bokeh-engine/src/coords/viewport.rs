/// Viewport size in pixels of the scene-color target.
///
/// Bokeh positions live in normalized screen space; the viewport only supplies
/// the aspect ratio used to keep sprites round.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Height over width. Falls back to 1.0 for a degenerate viewport.
    #[inline]
    pub fn inv_aspect(self) -> f32 {
        if self.is_valid() { self.height / self.width } else { 1.0 }
    }
}
