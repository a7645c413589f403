//! Instanced bokeh drawing.
//!
//! One camera's instance array becomes one storage buffer and one instanced
//! draw of 4-vertex quads. The quad corners are generated in the vertex shader
//! from `vertex_index`; there is no per-vertex data.
//!
//! Ordering contract: the host runs this before its bloom pass, on the HDR
//! scene-color target, so flares feed bloom and tone mapping.

mod bokeh;
mod ctx;
mod scope;
mod submit;

pub use bokeh::{BokehRenderer, FrameInstances, WgpuInstanceBackend};
pub use ctx::{RenderCtx, RenderTarget};
pub(crate) use scope::capture_errors;
pub use submit::{
    DrawSubmitter, InstanceBackend, SubmitError, SubmitOutcome, SubmitStats,
    VERTICES_PER_INSTANCE,
};

#[cfg(test)]
pub(crate) use submit::testing;
