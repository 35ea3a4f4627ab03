use serde::Deserialize;

use crate::diagnostics::{Diagnostic, Diagnostics, RowField};
use crate::projection::project;
use crate::Vector3;

/// Sentinel written into `star_id` / `catalogue_number` when the column is not an integer.
pub const SENTINEL_ID: i64 = -1;
/// Sentinel written into `visual_magnitude` when the column is not a number.
pub const SENTINEL_MAGNITUDE: f64 = -1.0;

/// One row of a catalogue table, exactly as the table source produced it.
///
/// Every field is kept as text; numeric columns are parsed (with sentinel
/// fallback) when the row becomes a [`RawStar`]. Column names follow the
/// VizieR export of the Bright Star Catalogue cross-index.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CatalogueRow {
    #[serde(rename = "Full", default)]
    pub star_id: String,
    #[serde(rename = "HD", default)]
    pub catalogue_number: String,
    #[serde(rename = "RAJ2000", default)]
    pub right_ascension: String,
    #[serde(rename = "DEJ2000", default)]
    pub declination: String,
    #[serde(rename = "Vmag", default)]
    pub visual_magnitude: String,
    #[serde(rename = "Bayer", default)]
    pub bayer_designation: String,
}

impl CatalogueRow {
    pub fn new(
        star_id: impl Into<String>,
        catalogue_number: impl Into<String>,
        right_ascension: impl Into<String>,
        declination: impl Into<String>,
        visual_magnitude: impl Into<String>,
        bayer_designation: impl Into<String>,
    ) -> Self {
        Self {
            star_id: star_id.into(),
            catalogue_number: catalogue_number.into(),
            right_ascension: right_ascension.into(),
            declination: declination.into(),
            visual_magnitude: visual_magnitude.into(),
            bayer_designation: bayer_designation.into(),
        }
    }
}

/// A star straight after projection, before the constellation-wide rescale.
///
/// `position` is the unit vector on the celestial sphere, or `None` when the
/// coordinate strings could not be parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct RawStar {
    pub star_id: i64,
    pub catalogue_number: i64,
    pub right_ascension: String,
    pub declination: String,
    pub position: Option<Vector3>,
    pub visual_magnitude: f64,
    pub bayer_designation: String,
}

impl RawStar {
    /// Build a star from one catalogue row, recording every field that had to fall back.
    ///
    /// If any of the three numeric columns is malformed, all three take their
    /// sentinel values so the star is recognisably invalid downstream.
    pub fn from_row(row_index: usize, row: &CatalogueRow, diagnostics: &mut Diagnostics) -> Self {
        let star_id = row.star_id.trim().parse::<i64>();
        let catalogue_number = row.catalogue_number.trim().parse::<i64>();
        let visual_magnitude = row.visual_magnitude.trim().parse::<f64>();

        let (star_id, catalogue_number, visual_magnitude) =
            match (star_id, catalogue_number, visual_magnitude) {
                (Ok(id), Ok(hd), Ok(vmag)) if vmag.is_finite() => (id, hd, vmag),
                (id, hd, vmag) => {
                    let mut invalid = |field, value: &str| {
                        diagnostics.push(Diagnostic::InvalidNumber {
                            row: row_index,
                            field,
                            value: value.to_string(),
                        })
                    };
                    if id.is_err() {
                        invalid(RowField::StarId, &row.star_id);
                    }
                    if hd.is_err() {
                        invalid(RowField::CatalogueNumber, &row.catalogue_number);
                    }
                    if !vmag.map(f64::is_finite).unwrap_or(false) {
                        invalid(RowField::VisualMagnitude, &row.visual_magnitude);
                    }
                    (SENTINEL_ID, SENTINEL_ID, SENTINEL_MAGNITUDE)
                }
            };

        let position = match project(&row.right_ascension, &row.declination) {
            Ok(v) => Some(v),
            Err(source) => {
                diagnostics.push(Diagnostic::InvalidCoordinates { star_id, source });
                None
            }
        };

        Self {
            star_id,
            catalogue_number,
            right_ascension: row.right_ascension.trim().to_string(),
            declination: row.declination.trim().to_string(),
            position,
            visual_magnitude,
            bayer_designation: row.bayer_designation.trim().to_string(),
        }
    }

}

/// A star with its final canvas coordinates.
///
/// Geometry is fixed at construction; only the outgoing connections are
/// filled in afterwards by the resolver. `target_indices` holds the position
/// of each connection's target in the constellation's star list, since star
/// ids are not unique once sentinels are involved.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedStar {
    star_id: i64,
    catalogue_number: i64,
    x: f64,
    y: f64,
    z: f64,
    visual_magnitude: f64,
    bayer_designation: String,
    pub(crate) connections: Vec<i64>,
    pub(crate) target_indices: Vec<usize>,
}

impl PlacedStar {
    pub(crate) fn new(raw: RawStar, x: f64, y: f64, z: f64) -> Self {
        Self {
            star_id: raw.star_id,
            catalogue_number: raw.catalogue_number,
            x,
            y,
            z,
            visual_magnitude: raw.visual_magnitude,
            bayer_designation: raw.bayer_designation,
            connections: Vec::new(),
            target_indices: Vec::new(),
        }
    }

    pub fn star_id(&self) -> i64 {
        self.star_id
    }

    pub fn catalogue_number(&self) -> i64 {
        self.catalogue_number
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Unscaled z component of the celestial unit vector.
    pub fn z(&self) -> f64 {
        self.z
    }

    pub fn visual_magnitude(&self) -> f64 {
        self.visual_magnitude
    }

    pub fn bayer_designation(&self) -> &str {
        &self.bayer_designation
    }

    /// Star ids this star has an outgoing edge to.
    pub fn connections(&self) -> &[i64] {
        &self.connections
    }

    /// A main star has at least one outgoing edge; incoming edges do not count.
    pub fn is_main_star(&self) -> bool {
        !self.connections.is_empty()
    }
}
