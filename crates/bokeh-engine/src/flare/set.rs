use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::coords::ColorRgba;

use super::descriptor::{BokehDescriptor, BokehFlags};

/// Error produced while loading or validating a flare set.
#[derive(Debug)]
pub enum FlareSetError {
    /// The file could not be read.
    Io(std::io::Error),
    /// The document is not a valid flare-set record list.
    Json(serde_json::Error),
    /// A record parsed but describes an unusable sprite.
    InvalidDescriptor { index: usize, reason: &'static str },
}

impl fmt::Display for FlareSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "flare set read failed: {e}"),
            Self::Json(e) => write!(f, "flare set parse error: {e}"),
            Self::InvalidDescriptor { index, reason } => {
                write!(f, "flare set bokeh #{index} is invalid: {reason}")
            }
        }
    }
}

impl std::error::Error for FlareSetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::InvalidDescriptor { .. } => None,
        }
    }
}

/// Ordered, named collection of bokeh descriptors.
///
/// Immutable once built. Shared with the render stage behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct FlareSet {
    name: String,
    descriptors: Vec<BokehDescriptor>,
}

impl FlareSet {
    /// Builds a set, validating every descriptor.
    pub fn new(
        name: impl Into<String>,
        descriptors: Vec<BokehDescriptor>,
    ) -> Result<Self, FlareSetError> {
        if let Some((index, reason)) = descriptors
            .iter()
            .enumerate()
            .find_map(|(i, d)| d.invalid_reason().map(|r| (i, r)))
        {
            return Err(FlareSetError::InvalidDescriptor { index, reason });
        }
        Ok(Self {
            name: name.into(),
            descriptors,
        })
    }

    /// Parses a flare set document.
    ///
    /// ```json
    /// {
    ///   "name": "warm",
    ///   "bokeh": [
    ///     { "offset": 0.0, "scale": 0.15, "tint": [1.0, 0.9, 0.7, 0.8] },
    ///     { "offset": 0.4, "scale": 0.08, "flags": ["fade_through_occlusion"] }
    ///   ]
    /// }
    /// ```
    ///
    /// `tint` defaults to opaque white, `flags` to none.
    pub fn from_json_str(src: &str) -> Result<Self, FlareSetError> {
        let doc: FlareSetDoc = serde_json::from_str(src).map_err(FlareSetError::Json)?;
        let descriptors = doc.bokeh.into_iter().map(BokehRecord::into_descriptor).collect();
        Self::new(doc.name, descriptors)
    }

    /// Reads and parses a flare set file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FlareSetError> {
        let src = std::fs::read_to_string(path.as_ref()).map_err(FlareSetError::Io)?;
        Self::from_json_str(&src)
    }

    /// Built-in set: a starburst on the light, a streak, and ghosts along the axis.
    pub fn default_set() -> Self {
        let fade = BokehFlags::FADE_THROUGH_OCCLUSION;
        Self {
            name: "default".to_string(),
            descriptors: vec![
                BokehDescriptor::new(0.0, 0.15)
                    .with_tint(ColorRgba::new(1.0, 0.9, 0.7, 0.8))
                    .with_flags(fade),
                BokehDescriptor::new(0.0, 0.5)
                    .with_tint(ColorRgba::new(1.0, 0.95, 0.8, 0.3))
                    .with_flags(fade | BokehFlags::ANAMORPHIC),
                BokehDescriptor::new(0.4, 0.08).with_tint(ColorRgba::new(0.5, 0.8, 1.0, 0.4)),
                BokehDescriptor::new(0.7, 0.12).with_tint(ColorRgba::new(0.8, 0.5, 1.0, 0.3)),
                BokehDescriptor::new(1.2, 0.06).with_tint(ColorRgba::new(0.3, 1.0, 0.5, 0.25)),
                BokehDescriptor::new(1.5, 0.10).with_tint(ColorRgba::new(1.0, 0.6, 0.3, 0.35)),
            ],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn descriptors(&self) -> &[BokehDescriptor] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

// ── on-disk records ───────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct FlareSetDoc {
    name: String,
    bokeh: Vec<BokehRecord>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct BokehRecord {
    offset: f32,
    scale: f32,
    #[serde(default = "opaque_white")]
    tint: [f32; 4],
    #[serde(default)]
    flags: Vec<FlagName>,
}

#[derive(Deserialize, Copy, Clone)]
#[serde(rename_all = "snake_case")]
enum FlagName {
    FadeThroughOcclusion,
    ScreenAligned,
    Anamorphic,
}

fn opaque_white() -> [f32; 4] {
    ColorRgba::white().to_array()
}

impl BokehRecord {
    fn into_descriptor(self) -> BokehDescriptor {
        let flags = self.flags.iter().fold(BokehFlags::empty(), |acc, f| {
            acc | match f {
                FlagName::FadeThroughOcclusion => BokehFlags::FADE_THROUGH_OCCLUSION,
                FlagName::ScreenAligned => BokehFlags::SCREEN_ALIGNED,
                FlagName::Anamorphic => BokehFlags::ANAMORPHIC,
            }
        });
        BokehDescriptor::new(self.offset, self.scale)
            .with_tint(ColorRgba::from_array(self.tint))
            .with_flags(flags)
    }
}
