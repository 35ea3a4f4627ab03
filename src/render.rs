//! Raster preview of a processed constellation.
//!
//! Requires the `image` feature. Lines are drawn first, one per directed
//! edge, then one filled disc per star on top. Brighter stars (smaller
//! magnitude) get larger discs.

use std::path::PathBuf;

use anyhow::Context;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};
use tracing::info;

use crate::constellation::ProcessedConstellation;
use crate::pipeline::{output_path, ConstellationSink};
use crate::projection::Canvas;

#[derive(Debug, Clone)]
pub struct RenderStyle {
    /// Image width in pixels. Default: 1920
    pub width: u32,
    /// Image height in pixels. Default: 1080
    pub height: u32,
    pub background: Rgb<u8>,
    pub line_color: Rgb<u8>,
    pub main_star_color: Rgb<u8>,
    pub star_color: Rgb<u8>,
    /// Disc radius is `max_radius - magnitude`, clamped to
    /// `[min_radius, max_radius]`. Defaults: 8 and 1.
    pub max_radius: f64,
    pub min_radius: f64,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            background: Rgb([0, 0, 0]),
            line_color: Rgb([90, 110, 160]),
            main_star_color: Rgb([255, 255, 255]),
            star_color: Rgb([150, 150, 150]),
            max_radius: 8.0,
            min_radius: 1.0,
        }
    }
}

impl RenderStyle {
    /// Default style sized to a projection canvas.
    pub fn for_canvas(canvas: &Canvas) -> Self {
        Self {
            width: canvas.width.round().max(1.0) as u32,
            height: canvas.height.round().max(1.0) as u32,
            ..Default::default()
        }
    }

    /// Disc radius for a magnitude. The bounds are ordered first, so a style
    /// with `min_radius > max_radius` still yields a radius between the two.
    pub fn radius_for(&self, visual_magnitude: f64) -> f64 {
        let lo = self.min_radius.min(self.max_radius);
        let hi = self.min_radius.max(self.max_radius);
        (self.max_radius - visual_magnitude).clamp(lo, hi)
    }
}

/// Draw a constellation into a new image.
pub fn render(constellation: &ProcessedConstellation, style: &RenderStyle) -> RgbImage {
    let mut img = RgbImage::from_pixel(style.width, style.height, style.background);

    for (from, to) in constellation.edges() {
        draw_line_segment_mut(
            &mut img,
            (from.x() as f32, from.y() as f32),
            (to.x() as f32, to.y() as f32),
            style.line_color,
        );
    }

    for star in constellation.stars() {
        let color = if star.is_main_star() {
            style.main_star_color
        } else {
            style.star_color
        };
        let center = (star.x().round() as i32, star.y().round() as i32);
        let radius = style.radius_for(star.visual_magnitude()).round() as i32;
        draw_filled_circle_mut(&mut img, center, radius, color);
    }
    img
}

/// Writes `<latin>.png`.
#[derive(Debug, Clone)]
pub struct PngSink {
    dir: PathBuf,
    style: RenderStyle,
}

impl PngSink {
    pub fn new<P: Into<PathBuf>>(dir: P, style: RenderStyle) -> Self {
        Self {
            dir: dir.into(),
            style,
        }
    }
}

impl ConstellationSink for PngSink {
    fn name(&self) -> &str {
        "png"
    }

    fn write(&mut self, constellation: &ProcessedConstellation) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating output directory {}", self.dir.display()))?;
        let path = output_path(&self.dir, constellation.names(), "png");
        render(constellation, &self.style)
            .save(&path)
            .with_context(|| format!("saving {}", path.display()))?;
        info!("Rendered {}", path.display());
        Ok(())
    }
}
