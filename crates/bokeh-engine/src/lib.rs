//! Bokeh engine crate.
//!
//! Lens-flare sprites for a host renderer: visibility is computed on the
//! simulation stage, handed across to the render stage, and drawn as one
//! instanced pass before bloom.

pub mod device;
pub mod hooks;
pub mod system;
pub mod time;

pub mod compose;
pub mod coords;
pub mod flare;
pub mod handoff;
pub mod logging;
pub mod render;
pub mod visibility;

pub use system::{BokehConfig, BokehSystem, FrameReport, VisibilityProducer};
