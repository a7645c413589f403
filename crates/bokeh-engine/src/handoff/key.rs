use core::fmt;

/// Identity of one logical camera/view.
///
/// Issued by [`HandoffBuffer::register`](super::HandoffBuffer::register), so two
/// live cameras can never share a key. `generation` changes every time a slot
/// is recycled: a key kept past its camera's teardown no longer matches anything.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct CameraKey {
    slot: u32,
    generation: u32,
}

impl CameraKey {
    #[inline]
    pub(crate) const fn new(slot: u32, generation: u32) -> Self {
        Self { slot, generation }
    }

    /// Index of the slot backing this camera.
    #[inline]
    pub const fn slot(self) -> u32 {
        self.slot
    }

    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for CameraKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cam{}v{}", self.slot, self.generation)
    }
}
