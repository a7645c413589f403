//! Headless GPU device and scene-color target.
//!
//! - creates the wgpu Instance/Adapter/Device/Queue without a surface
//! - owns an HDR off-screen target in place of a swapchain
//! - hands out per-frame encoders bound to that target

mod frame;
mod gpu;
mod init;
mod scene_color;

pub use frame::SceneFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
pub use scene_color::{SCENE_COLOR_FORMAT, SceneColor};
