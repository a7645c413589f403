//! Cross-stage handoff of visibility results.
//!
//! The simulation stage publishes one result per camera per frame; the render
//! stage fetches whatever is newest for the camera it is drawing. The two stages
//! run out of lockstep, so a fetch may return the previous frame's data. That is
//! accepted: waiting for a matching frame would couple the stages again.

mod buffer;
mod entry;
mod error;
mod key;

pub use buffer::HandoffBuffer;
pub use entry::HandoffEntry;
pub use error::HandoffError;
pub use key::CameraKey;
