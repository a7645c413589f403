//! Bokeh descriptor sets.
//!
//! Pure configuration data: what each flare element looks like relative to a
//! light. Loaded once, shared read-only with the render stage.

mod descriptor;
mod library;
mod set;

pub use descriptor::{BokehDescriptor, BokehFlags, ANAMORPHIC_SQUASH};
pub use library::{FlareLibrary, LibraryError};
pub use set::{FlareSet, FlareSetError};
