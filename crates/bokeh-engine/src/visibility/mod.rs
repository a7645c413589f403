//! Visibility query stage.
//!
//! Producer side of the pipeline: for each camera, project every tracked light
//! to the screen and test world geometry between light and eye, then publish
//! the observations into the [`HandoffBuffer`](crate::handoff::HandoffBuffer).

mod camera;
mod light;
mod occluders;
mod stage;

pub use camera::CameraView;
pub use light::{LightId, ScreenLight, TrackedLight};
pub use occluders::{OcclusionQuery, OpenSky, Sphere, SphereOccluders};
pub use stage::{VisibilityReport, VisibilityStage};
