use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::set::FlareSet;

/// Error from selecting a flare set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryError {
    UnknownSet(String),
}

impl fmt::Display for LibraryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSet(name) => write!(f, "no flare set named {name:?}"),
        }
    }
}

impl std::error::Error for LibraryError {}

/// Registry of flare sets with a single "currently selected" entry.
///
/// The host owns selection; the render stage only calls [`FlareLibrary::active`],
/// which hands out the selected set as an `Arc` so a mid-frame selection change
/// never tears a set that is being composited.
pub struct FlareLibrary {
    sets: RwLock<HashMap<String, Arc<FlareSet>>>,
    active: RwLock<Arc<FlareSet>>,
}

impl FlareLibrary {
    /// Creates a library holding `initial`, which becomes the active set.
    pub fn new(initial: FlareSet) -> Self {
        let initial = Arc::new(initial);
        let mut sets = HashMap::new();
        sets.insert(initial.name().to_string(), Arc::clone(&initial));
        Self {
            sets: RwLock::new(sets),
            active: RwLock::new(initial),
        }
    }

    /// Adds or replaces a set. Replacing the active set re-points the selection.
    ///
    /// Lock order is always `sets` then `active`, so a concurrent `select`
    /// never re-activates a set this call has just replaced.
    pub fn insert(&self, set: FlareSet) {
        let set = Arc::new(set);
        let name = set.name().to_string();

        let mut sets = self.sets.write();
        {
            let mut active = self.active.write();
            if active.name() == name {
                *active = Arc::clone(&set);
            }
        }
        sets.insert(name, set);
    }

    /// Makes the named set the active one.
    pub fn select(&self, name: &str) -> Result<(), LibraryError> {
        let sets = self.sets.read();
        let set = sets
            .get(name)
            .cloned()
            .ok_or_else(|| LibraryError::UnknownSet(name.to_string()))?;

        log::info!("flare set {:?} selected ({} bokeh)", name, set.len());
        *self.active.write() = set;
        Ok(())
    }

    /// Currently selected set.
    pub fn active(&self) -> Arc<FlareSet> {
        Arc::clone(&self.active.read())
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sets.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for FlareLibrary {
    fn default() -> Self {
        Self::new(FlareSet::default_set())
    }
}
