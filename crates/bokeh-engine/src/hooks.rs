//! Host integration hooks.
//!
//! The host's frame driver calls into two fixed insertion points:
//! - [`ViewSetupHook`]: once per camera per frame on the simulation stage,
//!   before that frame is rendered
//! - [`BeforeBloomHook`]: once per camera per frame on the render stage,
//!   immediately before the bloom compositing pass
//!
//! Each point holds at most one callback. The two live on different stages, so
//! they are separate objects that can be owned by different threads.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::handoff::CameraKey;
use crate::time::FrameSeq;
use crate::visibility::CameraView;

/// Registration handle. Unique across every hook point in the process.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct HookHandle(u64);

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

impl HookHandle {
    fn issue() -> Self {
        Self(NEXT_HANDLE.fetch_add(1, Ordering::Relaxed))
    }
}

/// Where a callback runs.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum HookPoint {
    ViewSetup,
    BeforeBloom,
}

/// Hook registration failure.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum HookError {
    /// The insertion point already has a callback.
    Occupied(HookPoint),
}

impl fmt::Display for HookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Occupied(point) => write!(f, "{point:?} hook already registered"),
        }
    }
}

impl std::error::Error for HookError {}

/// Render callback: gets the scene-color target and hands it back.
pub type BeforeBloomFn<T> = dyn FnMut(CameraKey, FrameSeq, T) -> T + Send;

/// Producer callback: runs the visibility query for one camera.
pub type ViewSetupFn = dyn FnMut(&CameraView, FrameSeq) + Send;

/// Single-callback slot shared by both hook points.
struct HookSlot<F: ?Sized> {
    point: HookPoint,
    entry: Option<(HookHandle, Box<F>)>,
}

impl<F: ?Sized> HookSlot<F> {
    const fn new(point: HookPoint) -> Self {
        Self { point, entry: None }
    }

    fn register(&mut self, callback: Box<F>) -> Result<HookHandle, HookError> {
        if self.entry.is_some() {
            return Err(HookError::Occupied(self.point));
        }
        let handle = HookHandle::issue();
        self.entry = Some((handle, callback));
        log::debug!("{:?} hook registered", self.point);
        Ok(handle)
    }

    fn unregister(&mut self, handle: HookHandle) -> bool {
        if self.entry.as_ref().is_some_and(|(h, _)| *h == handle) {
            self.entry = None;
            return true;
        }
        false
    }

    fn callback(&mut self) -> Option<&mut F> {
        self.entry.as_mut().map(|(_, cb)| cb.as_mut())
    }
}

/// Per-view setup insertion point (simulation stage).
pub struct ViewSetupHook {
    slot: HookSlot<ViewSetupFn>,
}

impl Default for ViewSetupHook {
    fn default() -> Self {
        Self {
            slot: HookSlot::new(HookPoint::ViewSetup),
        }
    }
}

impl ViewSetupHook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, callback: F) -> Result<HookHandle, HookError>
    where
        F: FnMut(&CameraView, FrameSeq) + Send + 'static,
    {
        self.slot.register(Box::new(callback))
    }

    /// Removes the callback registered under `handle`. Returns `false` if it
    /// is not the current registration.
    pub fn unregister(&mut self, handle: HookHandle) -> bool {
        self.slot.unregister(handle)
    }

    pub fn is_registered(&self) -> bool {
        self.slot.entry.is_some()
    }

    /// Host driver entry: `view` is about to be rendered for `frame`.
    pub fn run(&mut self, view: &CameraView, frame: FrameSeq) {
        if let Some(cb) = self.slot.callback() {
            cb(view, frame);
        }
    }
}

/// Before-bloom insertion point (render stage).
///
/// `T` is whatever the host passes as its scene-color target.
pub struct BeforeBloomHook<T> {
    slot: HookSlot<BeforeBloomFn<T>>,
}

impl<T> Default for BeforeBloomHook<T> {
    fn default() -> Self {
        Self {
            slot: HookSlot::new(HookPoint::BeforeBloom),
        }
    }
}

impl<T> BeforeBloomHook<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, callback: F) -> Result<HookHandle, HookError>
    where
        F: FnMut(CameraKey, FrameSeq, T) -> T + Send + 'static,
    {
        self.slot.register(Box::new(callback))
    }

    pub fn unregister(&mut self, handle: HookHandle) -> bool {
        self.slot.unregister(handle)
    }

    pub fn is_registered(&self) -> bool {
        self.slot.entry.is_some()
    }

    /// Host driver entry. Returns `target` untouched when nothing is registered.
    pub fn run(&mut self, key: CameraKey, frame: FrameSeq, target: T) -> T {
        match self.slot.callback() {
            Some(cb) => cb(key, frame, target),
            None => target,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::coords::{Mat4, Vec3};
    use crate::handoff::HandoffBuffer;

    fn key() -> CameraKey {
        HandoffBuffer::with_capacity(1).register(0).unwrap()
    }

    #[test]
    fn empty_point_passes_target_through() {
        let mut hook: BeforeBloomHook<Vec<&'static str>> = BeforeBloomHook::new();
        let out = hook.run(key(), FrameSeq(0), vec!["scene"]);
        assert_eq!(out, vec!["scene"]);
    }

    #[test]
    fn callback_sees_and_returns_target() {
        let mut hook: BeforeBloomHook<Vec<&'static str>> = BeforeBloomHook::new();
        hook.register(|_, _, mut target: Vec<&'static str>| {
            target.push("bokeh");
            target
        })
        .unwrap();

        let out = hook.run(key(), FrameSeq(3), vec!["scene"]);
        assert_eq!(out, vec!["scene", "bokeh"]);
    }

    #[test]
    fn second_registration_is_refused() {
        let mut hook: BeforeBloomHook<()> = BeforeBloomHook::new();
        hook.register(|_, _, t| t).unwrap();
        assert_eq!(
            hook.register(|_, _, t| t),
            Err(HookError::Occupied(HookPoint::BeforeBloom))
        );
    }

    #[test]
    fn unregister_frees_the_point() {
        let mut hook: BeforeBloomHook<()> = BeforeBloomHook::new();
        let h = hook.register(|_, _, t| t).unwrap();
        assert!(hook.unregister(h));
        assert!(!hook.unregister(h));
        assert!(!hook.is_registered());
        hook.register(|_, _, t| t).unwrap();
    }

    #[test]
    fn handles_from_other_points_do_not_unregister() {
        let mut setup = ViewSetupHook::new();
        let mut bloom: BeforeBloomHook<()> = BeforeBloomHook::new();
        let hs = setup.register(|_, _| {}).unwrap();
        let hb = bloom.register(|_, _, t| t).unwrap();

        assert_ne!(hs, hb);
        assert!(!bloom.unregister(hs));
        assert!(bloom.is_registered());
    }

    #[test]
    fn view_setup_runs_per_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);

        let mut hook = ViewSetupHook::new();
        let h = hook
            .register(move |_, _| {
                seen.fetch_add(1, Ordering::Relaxed);
            })
            .unwrap();

        let view = CameraView::new(key(), Vec3::ZERO, Mat4::IDENTITY);
        hook.run(&view, FrameSeq(0));
        hook.run(&view, FrameSeq(1));
        assert_eq!(calls.load(Ordering::Relaxed), 2);

        hook.unregister(h);
        hook.run(&view, FrameSeq(2));
        assert_eq!(calls.load(Ordering::Relaxed), 2);
    }
}
