//! Sky-to-canvas projection.
//!
//! Catalogue coordinates are first turned into unit vectors on the celestial
//! sphere (`x = cos δ cos α`, `y = cos δ sin α`, `z = sin δ`). The `(x, y)`
//! components of a whole constellation are then fitted into a fixed canvas in
//! two passes: bounds first, then one uniform shift-and-scale applied to every
//! star, so relative distances are preserved.

use serde::{Deserialize, Serialize};

use crate::diagnostics::{Axis, Diagnostic, Diagnostics};
use crate::sexagesimal::{degrees_to_radians, hour_angle_to_radians, SexagesimalError};
use crate::star::{PlacedStar, RawStar};
use crate::Vector3;

/// Unit vector for a right ascension / declination pair in radians.
pub fn radec_to_uvec(ra_rad: f64, dec_rad: f64) -> Vector3 {
    let (rasin, racos) = ra_rad.sin_cos();
    let (decsin, deccos) = dec_rad.sin_cos();
    Vector3::new(deccos * racos, deccos * rasin, decsin)
}

/// Project sexagesimal right ascension (hours) and declination (degrees)
/// onto the unit celestial sphere.
pub fn project(right_ascension: &str, declination: &str) -> Result<Vector3, SexagesimalError> {
    let ra = hour_angle_to_radians(right_ascension)?;
    let dec = degrees_to_radians(declination)?;
    Ok(radec_to_uvec(ra, dec))
}

/// Target raster size and the empty margin kept around the constellation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Canvas {
    /// Canvas width in pixels. Default: 1920
    pub width: f64,
    /// Canvas height in pixels. Default: 1080
    pub height: f64,
    /// Margin on every side in pixels. Default: 20
    pub border: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
            border: 20.0,
        }
    }
}

impl Canvas {
    pub fn new(width: f64, height: f64, border: f64) -> Self {
        Self {
            width,
            height,
            border,
        }
    }

    fn inner_width(&self) -> f64 {
        (self.width - 2.0 * self.border).max(0.0)
    }

    fn inner_height(&self) -> f64 {
        (self.height - 2.0 * self.border).max(0.0)
    }
}

/// Axis-aligned bounds of projected `(x, y)` positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Bounds {
    fn from_point(x: f64, y: f64) -> Self {
        Self {
            x_min: x,
            x_max: x,
            y_min: y,
            y_max: y,
        }
    }

    /// Grow the bounds to include a point.
    pub fn include(&mut self, x: f64, y: f64) {
        self.x_min = self.x_min.min(x);
        self.x_max = self.x_max.max(x);
        self.y_min = self.y_min.min(y);
        self.y_max = self.y_max.max(y);
    }

    /// Bounds over an iterator of points; `None` when it is empty.
    pub fn from_points<I: IntoIterator<Item = (f64, f64)>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let (x, y) = iter.next()?;
        let mut bounds = Self::from_point(x, y);
        for (x, y) in iter {
            bounds.include(x, y);
        }
        Some(bounds)
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

/// Shift and uniform scale mapping projected coordinates onto the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fit {
    pub x_shift: f64,
    pub y_shift: f64,
    pub scale: f64,
    pub border: f64,
}

impl Fit {
    /// Choose the largest uniform scale that keeps `bounds` inside the canvas.
    ///
    /// An axis with zero extent has no scale candidate. If both are flat the
    /// scale is 1, which collapses every star onto the border offset.
    pub fn new(bounds: &Bounds, canvas: &Canvas, diagnostics: &mut Diagnostics) -> Self {
        let x_shift = -bounds.x_min;
        let y_shift = -bounds.y_min;

        let mut candidate = |extent: f64, room: f64, axis: Axis| {
            if extent > 0.0 {
                Some(room / extent)
            } else {
                diagnostics.push(Diagnostic::DegenerateAxis { axis });
                None
            }
        };
        let sx = candidate(bounds.width(), canvas.inner_width(), Axis::X);
        let sy = candidate(bounds.height(), canvas.inner_height(), Axis::Y);

        let scale = match (sx, sy) {
            (Some(sx), Some(sy)) => sx.min(sy),
            (Some(s), None) | (None, Some(s)) => s,
            (None, None) => 1.0,
        };

        Self {
            x_shift,
            y_shift,
            scale,
            border: canvas.border,
        }
    }

    /// Map one projected point onto the canvas.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x + self.x_shift) * self.scale + self.border,
            (y + self.y_shift) * self.scale + self.border,
        )
    }
}

/// Fit every star of one constellation into `canvas`.
///
/// Stars without a position are excluded from the bounds and placed at the
/// canvas origin `(border, border)` with `z = 0`. Returns the fit that was
/// applied, or `None` if no star had a position.
pub fn rescale(
    stars: Vec<RawStar>,
    canvas: &Canvas,
    diagnostics: &mut Diagnostics,
) -> (Vec<PlacedStar>, Option<Fit>) {
    let bounds = Bounds::from_points(stars.iter().filter_map(|s| s.position.map(|p| (p.x, p.y))));
    let fit = bounds.map(|b| Fit::new(&b, canvas, diagnostics));

    let placed = stars
        .into_iter()
        .map(|star| match (star.position, fit) {
            (Some(p), Some(fit)) => {
                let (x, y) = fit.apply(p.x, p.y);
                PlacedStar::new(star, x, y, p.z)
            }
            _ => PlacedStar::new(star, canvas.border, canvas.border, 0.0),
        })
        .collect();

    (placed, fit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::star::CatalogueRow;

    fn raw(id: i64, ra: &str, dec: &str) -> RawStar {
        let mut diags = Diagnostics::new("test");
        RawStar::from_row(
            0,
            &CatalogueRow::new(id.to_string(), id.to_string(), ra, dec, "2.0", ""),
            &mut diags,
        )
    }

    #[test]
    fn projection_is_deterministic_and_unit_length() {
        let a = project("19 50 47.0", "+08 52 06").unwrap();
        let b = project("19 50 47.0", "+08 52 06").unwrap();
        assert_eq!(a.x.to_bits(), b.x.to_bits());
        assert_eq!(a.y.to_bits(), b.y.to_bits());
        assert_eq!(a.z.to_bits(), b.z.to_bits());
        assert!((a.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn projection_cardinal_points() {
        let v = project("00 00 00", "+00 00 00").unwrap();
        assert!((v.x - 1.0).abs() < 1e-12 && v.y.abs() < 1e-12 && v.z.abs() < 1e-12);
        let v = project("06 00 00", "+00 00 00").unwrap();
        assert!(v.x.abs() < 1e-12 && (v.y - 1.0).abs() < 1e-12);
        let v = project("12 00 00", "+90 00 00").unwrap();
        assert!((v.z - 1.0).abs() < 1e-12);
    }

    #[test]
    fn projection_rejects_bad_strings() {
        assert!(project("xx", "+10 00 00").is_err());
        assert!(project("10 00 00", "").is_err());
    }

    #[test]
    fn bounds_over_points() {
        let b = Bounds::from_points([(1.0, -2.0), (-3.0, 4.0), (0.5, 0.5)]).unwrap();
        assert_eq!(b.x_min, -3.0);
        assert_eq!(b.x_max, 1.0);
        assert_eq!(b.y_min, -2.0);
        assert_eq!(b.y_max, 4.0);
        assert!(Bounds::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn tighter_axis_dominates() {
        let bounds = Bounds {
            x_min: 0.0,
            x_max: 1.0,
            y_min: 0.0,
            y_max: 1.0,
        };
        let canvas = Canvas::new(1920.0, 1080.0, 20.0);
        let mut diags = Diagnostics::new("test");
        let fit = Fit::new(&bounds, &canvas, &mut diags);
        assert!((fit.scale - 1040.0).abs() < 1e-9);
        assert_eq!(fit.apply(1.0, 1.0), (1060.0, 1060.0));
        assert!(diags.is_empty());
    }

    #[test]
    fn single_star_collapses_to_border() {
        let canvas = Canvas::default();
        let mut diags = Diagnostics::new("test");
        let (placed, fit) = rescale(vec![raw(1, "10 00 00", "+10 00 00")], &canvas, &mut diags);
        assert_eq!(fit.unwrap().scale, 1.0);
        assert!((placed[0].x() - canvas.border).abs() < 1e-12);
        assert!((placed[0].y() - canvas.border).abs() < 1e-12);
        assert_eq!(diags.len(), 2);
    }

    #[test]
    fn flat_axis_uses_other_axis_scale() {
        let bounds = Bounds {
            x_min: -0.5,
            x_max: 0.5,
            y_min: 0.2,
            y_max: 0.2,
        };
        let canvas = Canvas::new(200.0, 100.0, 10.0);
        let mut diags = Diagnostics::new("test");
        let fit = Fit::new(&bounds, &canvas, &mut diags);
        assert!((fit.scale - 180.0).abs() < 1e-9);
        assert!(matches!(
            diags.entries()[0],
            Diagnostic::DegenerateAxis { axis: Axis::Y }
        ));
    }

    #[test]
    fn unplaceable_star_goes_to_origin() {
        let canvas = Canvas::default();
        let mut diags = Diagnostics::new("test");
        let stars = vec![
            raw(1, "19 50 47.0", "+08 52 06"),
            raw(2, "bogus", "+08 52 06"),
            raw(3, "19 25 29.9", "+03 06 53"),
        ];
        let (placed, fit) = rescale(stars, &canvas, &mut diags);
        assert!(fit.is_some());
        assert_eq!(placed.len(), 3);
        assert_eq!((placed[1].x(), placed[1].y(), placed[1].z()), (20.0, 20.0, 0.0));
    }

    #[test]
    fn empty_constellation_has_no_fit() {
        let mut diags = Diagnostics::new("test");
        let (placed, fit) = rescale(Vec::new(), &Canvas::default(), &mut diags);
        assert!(placed.is_empty());
        assert!(fit.is_none());
    }
}
