//! Time subsystem.
//!
//! Frame numbering shared by both pipeline stages:
//! - the producer stage owns the only `FrameClock`
//! - `FrameSeq` tags every visibility publish
//! - `FrameCursor` hands the producer's latest frame to the render stage

mod frame_clock;
mod frame_cursor;
mod frame_seq;

pub use frame_clock::{FrameClock, FrameTime};
pub use frame_cursor::FrameCursor;
pub use frame_seq::FrameSeq;
