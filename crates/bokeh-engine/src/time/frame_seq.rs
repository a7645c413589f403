use core::fmt;

/// Monotonic frame sequence number.
///
/// Stamped by the producer stage on every visibility publish. The render stage
/// compares it against the frame it renders (taken from the producer's
/// numbering) for diagnostics only; a lower value is never a reason to drop
/// data.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FrameSeq(pub u64);

impl FrameSeq {
    pub const ZERO: FrameSeq = FrameSeq(0);

    #[inline]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Sequence number of the following frame. Wraps on overflow.
    #[inline]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Number of frames `self` lags behind `current`.
    ///
    /// Zero when `self` is the same frame or newer (the producer may run ahead).
    #[inline]
    pub const fn frames_behind(self, current: FrameSeq) -> u64 {
        current.0.saturating_sub(self.0)
    }
}

impl fmt::Display for FrameSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
