//! Bokeh instance compositor.
//!
//! Consumer side: turns one camera's handoff entry plus the active flare set
//! into the flat instance array the draw submitter uploads.

mod compositor;
mod record;

pub use compositor::{ComposeStats, Compositor, CompositorConfig, axis_position, edge_fade};
pub use record::{BokehInstance, INSTANCE_BYTES};
