use std::fmt;

use crate::compose::BokehInstance;

/// Vertices per bokeh quad; the vertex shader derives corners from the index.
pub const VERTICES_PER_INSTANCE: u32 = 4;

/// Failure reported by the graphics backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// Instance data exceeds the device's storage-buffer binding limit.
    TooLarge { bytes: u64, limit: u64 },
    /// Instance count does not fit the draw call's index type.
    TooManyInstances(usize),
    /// Any other backend failure.
    Backend(String),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLarge { bytes, limit } => {
                write!(f, "instance buffer of {bytes} bytes exceeds binding limit {limit}")
            }
            Self::TooManyInstances(n) => write!(f, "{n} instances do not fit one draw call"),
            Self::Backend(msg) => write!(f, "graphics backend error: {msg}"),
        }
    }
}

impl std::error::Error for SubmitError {}

/// The two GPU primitives bokeh rendering needs.
///
/// Implemented over wgpu by [`WgpuInstanceBackend`](super::WgpuInstanceBackend);
/// tests substitute a recording fake.
pub trait InstanceBackend {
    /// Per-frame GPU buffer holding the instance array.
    type Buffer;

    /// Creates a read-only structured buffer from `bytes`.
    fn create_instance_buffer(&mut self, label: &str, bytes: &[u8])
    -> Result<Self::Buffer, SubmitError>;

    /// Issues one instanced, non-indexed draw reading `buffer`.
    fn draw_instanced(
        &mut self,
        buffer: &Self::Buffer,
        vertices_per_instance: u32,
        instance_count: u32,
    ) -> Result<(), SubmitError>;
}

/// What happened to one camera's instance array.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SubmitOutcome {
    /// Nothing to draw; the backend was not touched.
    Skipped,
    Drawn { instances: u32 },
    /// The backend failed; this frame renders no bokeh for the camera.
    Failed,
}

/// Running totals across frames.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct SubmitStats {
    pub draw_calls: u64,
    pub instances: u64,
    pub skipped: u64,
    pub failures: u64,
}

/// Uploads an instance array and issues the single draw covering it.
#[derive(Debug, Default)]
pub struct DrawSubmitter {
    stats: SubmitStats,
}

impl DrawSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> SubmitStats {
        self.stats
    }

    /// Submits `instances` as one instanced draw.
    ///
    /// An empty array issues nothing: some backends reject zero-instance draws.
    /// Backend errors are logged and swallowed so a failed upload costs the
    /// camera its flares for one frame, nothing more.
    pub fn submit<B>(&mut self, backend: &mut B, instances: &[BokehInstance]) -> SubmitOutcome
    where
        B: InstanceBackend + ?Sized,
    {
        if instances.is_empty() {
            self.stats.skipped += 1;
            return SubmitOutcome::Skipped;
        }

        match self.try_submit(backend, instances) {
            Ok(count) => {
                self.stats.draw_calls += 1;
                self.stats.instances += u64::from(count);
                SubmitOutcome::Drawn { instances: count }
            }
            Err(e) => self.record_failure(&e),
        }
    }

    /// Counts a failure raised before the backend could be used, such as a
    /// pipeline that does not build for the target.
    pub fn record_failure(&mut self, err: &SubmitError) -> SubmitOutcome {
        log::warn!("bokeh draw skipped this frame: {err}");
        self.stats.failures += 1;
        SubmitOutcome::Failed
    }

    fn try_submit<B>(&mut self, backend: &mut B, instances: &[BokehInstance]) -> Result<u32, SubmitError>
    where
        B: InstanceBackend + ?Sized,
    {
        let count = u32::try_from(instances.len())
            .map_err(|_| SubmitError::TooManyInstances(instances.len()))?;
        let buffer =
            backend.create_instance_buffer("bokeh instances", bytemuck::cast_slice(instances))?;
        backend.draw_instanced(&buffer, VERTICES_PER_INSTANCE, count)?;
        Ok(count)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{Call, RecordingBackend};
    use super::*;

    fn instances(n: usize) -> Vec<BokehInstance> {
        (0..n)
            .map(|i| BokehInstance { light_id: i as u32, ..BokehInstance::default() })
            .collect()
    }

    #[test]
    fn empty_array_issues_no_calls() {
        let mut backend = RecordingBackend::default();
        let mut submitter = DrawSubmitter::new();

        assert_eq!(submitter.submit(&mut backend, &[]), SubmitOutcome::Skipped);
        assert!(backend.calls.is_empty());
        assert_eq!(submitter.stats().skipped, 1);
        assert_eq!(submitter.stats().draw_calls, 0);
    }

    #[test]
    fn one_upload_and_one_draw_per_submit() {
        let mut backend = RecordingBackend::default();
        let mut submitter = DrawSubmitter::new();

        let outcome = submitter.submit(&mut backend, &instances(6));
        assert_eq!(outcome, SubmitOutcome::Drawn { instances: 6 });
        assert_eq!(
            backend.calls,
            vec![
                Call::Create { label: "bokeh instances".into(), len: 6 * BokehInstance::SIZE },
                Call::Draw { vertices: 4, instances: 6 },
            ]
        );
    }

    #[test]
    fn uploaded_bytes_decode_back() {
        let mut backend = RecordingBackend::default();
        let recs = instances(3);
        DrawSubmitter::new().submit(&mut backend, &recs);
        assert_eq!(BokehInstance::decode_all(&backend.uploads[0]).unwrap(), recs);
    }

    #[test]
    fn upload_failure_skips_draw() {
        let mut backend = RecordingBackend { fail_create: true, ..Default::default() };
        let mut submitter = DrawSubmitter::new();

        assert_eq!(submitter.submit(&mut backend, &instances(2)), SubmitOutcome::Failed);
        assert!(backend.calls.is_empty());
        assert_eq!(submitter.stats().failures, 1);
    }

    #[test]
    fn draw_failure_is_reported_not_propagated() {
        let mut backend = RecordingBackend { fail_draw: true, ..Default::default() };
        let mut submitter = DrawSubmitter::new();

        assert_eq!(submitter.submit(&mut backend, &instances(2)), SubmitOutcome::Failed);
        // Next frame still works once the backend recovers.
        backend.fail_draw = false;
        assert_eq!(
            submitter.submit(&mut backend, &instances(1)),
            SubmitOutcome::Drawn { instances: 1 }
        );
        assert_eq!(submitter.stats().draw_calls, 1);
        assert_eq!(submitter.stats().failures, 1);
    }

    #[test]
    fn failure_before_backend_counts_once() {
        let mut submitter = DrawSubmitter::new();
        let err = SubmitError::Backend("unsupported target".into());

        assert_eq!(submitter.record_failure(&err), SubmitOutcome::Failed);
        assert_eq!(
            submitter.stats(),
            SubmitStats { failures: 1, ..SubmitStats::default() }
        );
    }
}
