use std::sync::Arc;

use parking_lot::Mutex;

use crate::time::FrameSeq;
use crate::visibility::ScreenLight;

use super::{CameraKey, HandoffEntry, HandoffError};

/// Latest-wins store of visibility results, one slot per camera.
///
/// Producer and consumer never wait on each other beyond a per-slot lock held
/// for a pointer swap or an `Arc` clone. Slots are independent: traffic on one
/// camera never contends with another.
///
/// Policy:
/// - `publish` overwrites whatever the slot held
/// - `fetch` returns the newest entry, however old, or `None` if there is none
/// - entries live until the camera is torn down; there is no time-based expiry
pub struct HandoffBuffer {
    slots: Box<[Mutex<Slot>]>,
    /// Free slot indices. Only touched by `register` / `teardown`.
    free: Mutex<Vec<u32>>,
}

#[derive(Default)]
struct Slot {
    generation: u32,
    /// Host view bound to this slot; `None` when the slot is free.
    view_id: Option<u64>,
    latest: Option<Arc<HandoffEntry>>,
}

impl Slot {
    #[inline]
    fn is_live_for(&self, key: CameraKey) -> bool {
        self.view_id.is_some() && self.generation == key.generation()
    }
}

impl HandoffBuffer {
    /// Creates a buffer able to hold `capacity` live cameras.
    pub fn with_capacity(capacity: usize) -> Self {
        let slots: Vec<Mutex<Slot>> = (0..capacity).map(|_| Mutex::new(Slot::default())).collect();
        // Reversed so that `pop` hands out slot 0 first.
        let free: Vec<u32> = (0..capacity as u32).rev().collect();
        Self {
            slots: slots.into_boxed_slice(),
            free: Mutex::new(free),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Binds a host view handle to a fresh camera key.
    ///
    /// `view_id` must be unique per live view on the host side; registering the
    /// same handle twice without a teardown is refused.
    pub fn register(&self, view_id: u64) -> Result<CameraKey, HandoffError> {
        let mut free = self.free.lock();

        if self.slots.iter().any(|s| s.lock().view_id == Some(view_id)) {
            return Err(HandoffError::AlreadyRegistered { view_id });
        }

        let index = free.pop().ok_or(HandoffError::Full {
            capacity: self.slots.len(),
        })?;

        let mut slot = self.slots[index as usize].lock();
        slot.view_id = Some(view_id);
        slot.latest = None;
        let key = CameraKey::new(index, slot.generation);

        log::debug!("camera {key} registered for view {view_id}");
        Ok(key)
    }

    /// Stores `lights` as the newest result for `key`.
    ///
    /// Returns `false` (and stores nothing) if the camera was torn down; a
    /// producer racing a teardown is expected and harmless.
    pub fn publish(&self, key: CameraKey, frame: FrameSeq, lights: Vec<ScreenLight>) -> bool {
        let Some(slot) = self.slots.get(key.slot() as usize) else {
            return false;
        };

        let entry = Arc::new(HandoffEntry { frame, lights });

        let previous = {
            let mut slot = slot.lock();
            if !slot.is_live_for(key) {
                log::trace!("publish for stale camera {key} at frame {frame} ignored");
                return false;
            }
            slot.latest.replace(entry)
        };
        // The old entry is released outside the lock.
        drop(previous);

        log::trace!("camera {key} published frame {frame}");
        true
    }

    /// Newest entry for `key`, or `None` if nothing was published yet or the
    /// camera is gone. Never waits for a publish.
    pub fn fetch(&self, key: CameraKey) -> Option<Arc<HandoffEntry>> {
        let slot = self.slots.get(key.slot() as usize)?.lock();
        if !slot.is_live_for(key) {
            return None;
        }
        slot.latest.clone()
    }

    /// Evicts the camera's entry and retires `key`.
    ///
    /// Called on the host's camera-teardown notification. Afterwards `fetch(key)`
    /// returns `None` and late publishes for `key` are dropped. Returns `false`
    /// if `key` was already retired.
    pub fn teardown(&self, key: CameraKey) -> bool {
        let Some(slot) = self.slots.get(key.slot() as usize) else {
            return false;
        };

        let evicted = {
            let mut slot = slot.lock();
            if !slot.is_live_for(key) {
                return false;
            }
            slot.view_id = None;
            slot.generation = slot.generation.wrapping_add(1);
            slot.latest.take()
        };
        drop(evicted);

        self.free.lock().push(key.slot());
        log::debug!("camera {key} torn down");
        true
    }

    /// Number of cameras currently registered.
    pub fn live_cameras(&self) -> usize {
        self.slots.len() - self.free.lock().len()
    }
}
