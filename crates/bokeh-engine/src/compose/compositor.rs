use crate::coords::{SCREEN_CENTER, Vec2, Viewport};
use crate::flare::{ANAMORPHIC_SQUASH, BokehDescriptor, BokehFlags, FlareSet};
use crate::handoff::HandoffEntry;
use crate::visibility::ScreenLight;

use super::record::BokehInstance;

/// Compositor tuning.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CompositorConfig {
    /// Global brightness multiplier applied to every bokeh.
    pub intensity: f32,
    /// Width of the band along the screen border over which a light fades out,
    /// in normalized units, in `[0, 0.5]`. Zero disables edge fading.
    pub edge_fade_margin: f32,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            intensity: 1.0,
            edge_fade_margin: 0.0,
        }
    }
}

/// Counts from one `compose` call.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct ComposeStats {
    pub lights: usize,
    pub instances: usize,
    /// (light, descriptor) pairs skipped because the light was fully blocked.
    pub dropped: usize,
}

/// Expands one camera's visible lights into GPU instance records.
///
/// Output order is light index, then descriptor index.
#[derive(Debug, Default)]
pub struct Compositor {
    config: CompositorConfig,
}

impl Compositor {
    pub fn new(config: CompositorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> CompositorConfig {
        self.config
    }

    /// Fills `out` with one record per (light, descriptor) pair.
    ///
    /// `entry == None` (nothing published for this camera yet) yields zero
    /// instances. A light whose visibility reaches zero only produces records
    /// for descriptors flagged `FADE_THROUGH_OCCLUSION`; those fade to alpha 0.
    ///
    /// `out` is cleared first; its capacity is reused across frames.
    pub fn compose(
        &self,
        entry: Option<&HandoffEntry>,
        set: &FlareSet,
        viewport: Viewport,
        out: &mut Vec<BokehInstance>,
    ) -> ComposeStats {
        out.clear();

        let Some(entry) = entry else {
            return ComposeStats::default();
        };

        let mut stats = ComposeStats {
            lights: entry.lights.len(),
            ..ComposeStats::default()
        };
        out.reserve(entry.lights.len() * set.len());

        for light in &entry.lights {
            let visibility = light.occlusion * edge_fade(light.screen_pos, self.config.edge_fade_margin);

            for (index, desc) in set.descriptors().iter().enumerate() {
                if visibility <= 0.0 && !desc.keeps_occluded() {
                    stats.dropped += 1;
                    continue;
                }
                out.push(self.instance(light, visibility, index as u32, desc, viewport));
            }
        }

        stats.instances = out.len();
        stats
    }

    fn instance(
        &self,
        light: &ScreenLight,
        visibility: f32,
        index: u32,
        desc: &BokehDescriptor,
        viewport: Viewport,
    ) -> BokehInstance {
        let center = axis_position(light.screen_pos, desc.offset);

        let mut half_size = Vec2::splat(desc.scale);
        if !desc.flags.contains(BokehFlags::SCREEN_ALIGNED) {
            half_size.x *= viewport.inv_aspect();
        }
        if desc.flags.contains(BokehFlags::ANAMORPHIC) {
            half_size.y *= ANAMORPHIC_SQUASH;
        }

        let color = desc
            .tint
            .scale_rgb(light.intensity * self.config.intensity)
            .fade(visibility);

        BokehInstance {
            center: center.to_array(),
            half_size: half_size.to_array(),
            color: color.to_array(),
            light_id: light.id.0,
            descriptor_index: index,
            _pad: [0; 2],
        }
    }
}

/// Position `offset` of the way from the light toward screen center.
#[inline]
pub fn axis_position(light: Vec2, offset: f32) -> Vec2 {
    light + (SCREEN_CENTER - light) * offset
}

/// 1.0 well inside the screen, falling to 0.0 at the border and beyond.
pub fn edge_fade(screen_pos: Vec2, margin: f32) -> f32 {
    if margin <= 0.0 {
        return 1.0;
    }
    let d = (screen_pos - SCREEN_CENTER).abs().max_element();
    ((0.5 - d) / margin.min(0.5)).clamp(0.0, 1.0)
}
