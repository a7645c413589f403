//! Top-level bokeh system wiring producer and consumer together.
//!
//! The simulation stage holds a [`VisibilityProducer`] and calls it from its
//! view-setup hook. The render stage owns the [`BokehSystem`] and calls one of
//! the `render_*` methods from its before-bloom hook. The two sides share only
//! the handoff buffer.

use std::sync::Arc;

use crate::compose::{BokehInstance, ComposeStats, Compositor, CompositorConfig};
use crate::coords::Viewport;
use crate::device::SceneFrame;
use crate::flare::FlareLibrary;
use crate::handoff::{CameraKey, HandoffBuffer, HandoffError};
use crate::render::{BokehRenderer, DrawSubmitter, InstanceBackend, SubmitOutcome, SubmitStats};
use crate::time::FrameSeq;
use crate::visibility::{CameraView, OcclusionQuery, TrackedLight, VisibilityReport, VisibilityStage};

/// System sizing and compositor tuning.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BokehConfig {
    /// Maximum number of simultaneously registered cameras.
    pub max_cameras: usize,
    pub compositor: CompositorConfig,
}

impl Default for BokehConfig {
    fn default() -> Self {
        Self {
            max_cameras: 16,
            compositor: CompositorConfig::default(),
        }
    }
}

/// What one camera's before-bloom pass did.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FrameReport {
    pub key: CameraKey,
    pub frame: FrameSeq,
    /// Frame the rendered visibility was computed for; `None` if the camera has
    /// no published data.
    pub source_frame: Option<FrameSeq>,
    pub compose: ComposeStats,
    pub outcome: SubmitOutcome,
}

impl FrameReport {
    /// Frames between the visibility data and the frame being rendered.
    pub fn staleness(&self) -> Option<u64> {
        self.source_frame.map(|src| src.frames_behind(self.frame))
    }
}

/// Producer handle for the simulation stage. Cheap to clone; `Send + Sync`.
#[derive(Clone)]
pub struct VisibilityProducer {
    handoff: Arc<HandoffBuffer>,
    stage: VisibilityStage,
}

impl VisibilityProducer {
    /// View-setup entry: tests `lights` for `camera` and publishes the result.
    pub fn on_view_setup<W>(
        &self,
        frame: FrameSeq,
        camera: &CameraView,
        lights: &[TrackedLight],
        world: &W,
    ) -> VisibilityReport
    where
        W: OcclusionQuery + ?Sized,
    {
        self.stage.run(frame, camera, lights, world, &self.handoff)
    }
}

/// Render-side owner of the compositor, submitter and GPU renderer.
pub struct BokehSystem {
    handoff: Arc<HandoffBuffer>,
    library: Arc<FlareLibrary>,
    compositor: Compositor,
    submitter: DrawSubmitter,
    renderer: BokehRenderer,
    /// Instance array reused across cameras and frames.
    scratch: Vec<BokehInstance>,
}

impl BokehSystem {
    pub fn new(config: BokehConfig, library: Arc<FlareLibrary>) -> Self {
        log::info!(
            "bokeh system: {} camera slots, flare set '{}'",
            config.max_cameras,
            library.active().name()
        );
        Self {
            handoff: Arc::new(HandoffBuffer::with_capacity(config.max_cameras)),
            library,
            compositor: Compositor::new(config.compositor),
            submitter: DrawSubmitter::new(),
            renderer: BokehRenderer::new(),
            scratch: Vec::new(),
        }
    }

    pub fn producer(&self) -> VisibilityProducer {
        VisibilityProducer {
            handoff: Arc::clone(&self.handoff),
            stage: VisibilityStage::new(),
        }
    }

    pub fn library(&self) -> &Arc<FlareLibrary> {
        &self.library
    }

    pub fn handoff(&self) -> &HandoffBuffer {
        &self.handoff
    }

    pub fn submit_stats(&self) -> SubmitStats {
        self.submitter.stats()
    }

    /// Host camera-creation notification.
    pub fn register_camera(&self, view_id: u64) -> Result<CameraKey, HandoffError> {
        self.handoff.register(view_id)
    }

    /// Host camera-teardown notification. Drops the camera's data; in-flight
    /// publishes for `key` are discarded.
    pub fn teardown_camera(&self, key: CameraKey) -> bool {
        self.handoff.teardown(key)
    }

    /// Before-bloom entry over any [`InstanceBackend`].
    pub fn render_with<B>(
        &mut self,
        key: CameraKey,
        frame: FrameSeq,
        viewport: Viewport,
        backend: &mut B,
    ) -> FrameReport
    where
        B: InstanceBackend + ?Sized,
    {
        let (source_frame, compose) = self.prepare(key, frame, viewport);
        let outcome = self.submitter.submit(backend, &self.scratch);
        FrameReport {
            key,
            frame,
            source_frame,
            compose,
            outcome,
        }
    }

    /// Before-bloom entry drawing onto the frame's scene-color target.
    pub fn render_scene(&mut self, key: CameraKey, frame: FrameSeq, scene: &mut SceneFrame) -> FrameReport {
        let (source_frame, compose) = self.prepare(key, frame, scene.viewport);
        let (ctx, mut target) = scene.split();
        let outcome = self
            .renderer
            .render(&ctx, &mut target, &mut self.submitter, &self.scratch);
        FrameReport {
            key,
            frame,
            source_frame,
            compose,
            outcome,
        }
    }

    /// Fetches the newest data for `key` and composes it into `scratch`.
    fn prepare(&mut self, key: CameraKey, frame: FrameSeq, viewport: Viewport) -> (Option<FrameSeq>, ComposeStats) {
        let entry = self.handoff.fetch(key);

        match entry.as_deref() {
            None => log::trace!("camera {key}: no visibility yet at frame {frame}"),
            Some(e) if e.age(frame) > 0 => {
                log::debug!(
                    "camera {key}: frame {frame} uses visibility from {} ({} behind)",
                    e.frame,
                    e.age(frame)
                );
            }
            Some(_) => {}
        }

        let set = self.library.active();
        let stats = self
            .compositor
            .compose(entry.as_deref(), &set, viewport, &mut self.scratch);

        (entry.map(|e| e.frame), stats)
    }
}
