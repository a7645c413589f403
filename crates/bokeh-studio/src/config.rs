use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use bokeh_engine::coords::Viewport;

/// Studio run parameters.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    /// Render-stage frames to run.
    pub frames: u64,
    pub cameras: usize,
    pub lights: usize,
    /// Optional JSON flare set; the built-in set is used otherwise.
    pub flare_set: Option<PathBuf>,
    pub viewport: Viewport,
    /// Simulated cost of one producer frame. A slower producer makes the
    /// render stage draw stale visibility.
    pub producer_frame_time: Duration,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            frames: 120,
            cameras: 2,
            lights: 8,
            flare_set: None,
            viewport: Viewport::new(1280.0, 720.0),
            producer_frame_time: Duration::from_millis(4),
        }
    }
}

const USAGE: &str =
    "usage: bokeh-studio [--frames N] [--cameras N] [--lights N] [--flare-set FILE.json]";

impl StudioConfig {
    pub fn from_args(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut config = Self::default();
        let mut args = args.into_iter();

        while let Some(flag) = args.next() {
            let mut value = || args.next().with_context(|| format!("{flag} needs a value\n{USAGE}"));
            match flag.as_str() {
                "--frames" => config.frames = value()?.parse().context("--frames")?,
                "--cameras" => config.cameras = value()?.parse().context("--cameras")?,
                "--lights" => config.lights = value()?.parse().context("--lights")?,
                "--flare-set" => config.flare_set = Some(PathBuf::from(value()?)),
                "-h" | "--help" => bail!("{USAGE}"),
                other => bail!("unknown argument {other:?}\n{USAGE}"),
            }
        }

        if config.cameras == 0 {
            bail!("--cameras must be at least 1");
        }
        Ok(config)
    }
}
