use crate::coords::ColorRgba;

bitflags::bitflags! {
    /// Per-descriptor render-mode flags.
    #[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
    pub struct BokehFlags: u32 {
        /// Keep the sprite for fully occluded lights and let alpha reach zero,
        /// instead of dropping the instance.
        const FADE_THROUGH_OCCLUSION = 1 << 0;
        /// Size is square in normalized screen units (no aspect correction).
        const SCREEN_ALIGNED = 1 << 1;
        /// Squash vertically into a horizontal streak.
        const ANAMORPHIC = 1 << 2;
    }
}

/// Vertical squash applied to `ANAMORPHIC` sprites.
pub const ANAMORPHIC_SQUASH: f32 = 0.05;

/// Static configuration of one bokeh element relative to a light.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BokehDescriptor {
    /// Position along the light-to-screen-center axis.
    ///
    /// 0.0 sits on the light, 1.0 on screen center, values past 1.0 mirror
    /// through the center.
    pub offset: f32,
    /// Sprite half-extent as a fraction of viewport height.
    pub scale: f32,
    pub tint: ColorRgba,
    pub flags: BokehFlags,
}

impl BokehDescriptor {
    #[inline]
    pub const fn new(offset: f32, scale: f32) -> Self {
        Self {
            offset,
            scale,
            tint: ColorRgba::white(),
            flags: BokehFlags::empty(),
        }
    }

    #[inline]
    pub const fn with_tint(mut self, tint: ColorRgba) -> Self {
        self.tint = tint;
        self
    }

    #[inline]
    pub const fn with_flags(mut self, flags: BokehFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Whether an instance should still be emitted for a fully occluded light.
    #[inline]
    pub fn keeps_occluded(&self) -> bool {
        self.flags.contains(BokehFlags::FADE_THROUGH_OCCLUSION)
    }

    /// Returns the reason this descriptor is unusable, if any.
    pub(crate) fn invalid_reason(&self) -> Option<&'static str> {
        if !self.offset.is_finite() {
            return Some("offset is not finite");
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Some("scale must be finite and positive");
        }
        if !self.tint.is_finite() {
            return Some("tint is not finite");
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_descriptor_is_plain_white() {
        let d = BokehDescriptor::new(0.2, 0.5);
        assert_eq!(d.tint, ColorRgba::white());
        assert!(d.flags.is_empty());
        assert!(!d.keeps_occluded());
    }

    #[test]
    fn fade_flag_keeps_occluded() {
        let d = BokehDescriptor::new(0.0, 1.0).with_flags(BokehFlags::FADE_THROUGH_OCCLUSION);
        assert!(d.keeps_occluded());
    }

    #[test]
    fn rejects_non_positive_scale() {
        assert!(BokehDescriptor::new(0.0, 0.0).invalid_reason().is_some());
        assert!(BokehDescriptor::new(0.0, -1.0).invalid_reason().is_some());
        assert!(BokehDescriptor::new(f32::NAN, 1.0).invalid_reason().is_some());
        assert!(BokehDescriptor::new(0.0, 1.0).invalid_reason().is_none());
    }
}
