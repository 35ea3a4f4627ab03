//! Batch configuration, loaded from a JSON file.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::constellation::ConstellationConfig;
use crate::projection::Canvas;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Canvas every constellation is fitted into. Default: 1920×1080, border 20.
    pub canvas: Canvas,
    /// Emit the unscaled z component in the JSON output. Default: false
    pub include_z: bool,
    /// Directory for `<latin>.json` / `<latin>.png`. Default: "output"
    pub output_dir: PathBuf,
    /// Also write a PNG preview (needs the `image` feature). Default: true
    pub render: bool,
    /// Constellations, processed in this order.
    pub constellations: Vec<ConstellationConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            include_z: false,
            output_dir: PathBuf::from("output"),
            render: true,
            constellations: Vec::new(),
        }
    }
}

impl PipelineConfig {
    pub fn from_json_str(data: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(data).context("invalid pipeline configuration")?;
        anyhow::ensure!(
            config.canvas.width > 2.0 * config.canvas.border
                && config.canvas.height > 2.0 * config.canvas.border,
            "canvas {}x{} leaves no room inside a border of {}",
            config.canvas.width,
            config.canvas.height,
            config.canvas.border
        );
        Ok(config)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("reading configuration {}", path.display()))?;
        let config = Self::from_json_str(&data)
            .with_context(|| format!("loading configuration {}", path.display()))?;
        info!(
            "Loaded configuration from {} ({} constellations)",
            path.display(),
            config.constellations.len()
        );
        Ok(config)
    }
}
