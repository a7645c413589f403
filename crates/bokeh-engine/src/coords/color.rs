/// Linear RGBA color.
///
/// Values are in linear space; flares are composited into an HDR target so
/// channels above 1.0 are meaningful.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ColorRgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ColorRgba {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn white() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0)
    }

    #[inline]
    pub const fn from_array(c: [f32; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }

    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Scales the color channels, leaving alpha untouched.
    #[inline]
    pub fn scale_rgb(self, k: f32) -> Self {
        Self::new(self.r * k, self.g * k, self.b * k, self.a)
    }

    /// Multiplies alpha by `k`.
    #[inline]
    pub fn fade(self, k: f32) -> Self {
        Self::new(self.r, self.g, self.b, self.a * k)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_rgb_keeps_alpha() {
        let c = ColorRgba::new(0.5, 1.0, 2.0, 0.25).scale_rgb(2.0);
        assert_eq!(c, ColorRgba::new(1.0, 2.0, 4.0, 0.25));
    }

    #[test]
    fn fade_only_touches_alpha() {
        let c = ColorRgba::white().fade(0.5);
        assert_eq!(c.to_array(), [1.0, 1.0, 1.0, 0.5]);
    }
}
