use std::sync::atomic::{AtomicU64, Ordering};

use super::FrameSeq;

/// Latest frame the producer stage has finished, shared with the render stage.
///
/// The producer's [`FrameClock`](super::FrameClock) is the only frame counter.
/// After publishing visibility for every camera of a frame it calls
/// [`publish`](Self::publish); the render stage reads [`latest`](Self::latest)
/// and renders under that number, so staleness compares like with like.
#[derive(Debug, Default)]
pub struct FrameCursor {
    // Frame + 1; zero means nothing published yet.
    raw: AtomicU64,
}

impl FrameCursor {
    pub const fn new() -> Self {
        Self {
            raw: AtomicU64::new(0),
        }
    }

    /// Marks `frame` as fully produced. Never moves backwards.
    pub fn publish(&self, frame: FrameSeq) {
        self.raw
            .fetch_max(frame.get().saturating_add(1), Ordering::AcqRel);
    }

    /// Last fully produced frame, or `None` before the first publish.
    pub fn latest(&self) -> Option<FrameSeq> {
        match self.raw.load(Ordering::Acquire) {
            0 => None,
            raw => Some(FrameSeq(raw - 1)),
        }
    }
}
