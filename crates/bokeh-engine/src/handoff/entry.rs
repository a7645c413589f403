use crate::time::FrameSeq;
use crate::visibility::ScreenLight;

/// One completed visibility query for one camera.
///
/// Shared as `Arc<HandoffEntry>` once published; a reader always sees a whole
/// entry from a single publish.
#[derive(Debug, Clone, PartialEq)]
pub struct HandoffEntry {
    pub frame: FrameSeq,
    pub lights: Vec<ScreenLight>,
}

impl HandoffEntry {
    /// Frames between the producing frame and `current`.
    #[inline]
    pub fn age(&self, current: FrameSeq) -> u64 {
        self.frame.frames_behind(current)
    }
}
