//! A single constellation: its configuration, the processing pass, and the
//! JSON record it is written as.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::connection::ConnectionSpec;
use crate::diagnostics::Diagnostics;
use crate::projection::{rescale, Canvas, Fit};
use crate::resolver::{dedup_rows, resolve};
use crate::star::{CatalogueRow, PlacedStar};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstellationNames {
    /// Canonical name; output files are named after it.
    pub latin: String,
    pub german: String,
    pub english: String,
}

impl ConstellationNames {
    pub fn new(latin: impl Into<String>, german: impl Into<String>, english: impl Into<String>) -> Self {
        Self {
            latin: latin.into(),
            german: german.into(),
            english: english.into(),
        }
    }
}

/// Static description of one constellation to extract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstellationConfig {
    pub names: ConstellationNames,
    /// Locator handed to the table source; its meaning is up to the source.
    pub source: String,
    #[serde(default)]
    pub connections: ConnectionSpec,
}

impl ConstellationConfig {
    pub fn new(names: ConstellationNames, source: impl Into<String>, connections: ConnectionSpec) -> Self {
        Self {
            names,
            source: source.into(),
            connections,
        }
    }

    /// Run projection, rescale and resolution over this constellation's rows.
    pub fn process(&self, rows: &[CatalogueRow], canvas: &Canvas) -> ProcessedConstellation {
        let mut diagnostics = Diagnostics::new(&self.names.latin);

        let raw = dedup_rows(rows, &mut diagnostics);
        let (mut stars, fit) = rescale(raw, canvas, &mut diagnostics);
        resolve(&mut stars, &self.connections, &mut diagnostics);

        info!(
            constellation = %self.names.latin,
            rows = rows.len(),
            stars = stars.len(),
            main_stars = stars.iter().filter(|s| s.is_main_star()).count(),
            warnings = diagnostics.len(),
            "processed constellation"
        );

        ProcessedConstellation {
            names: self.names.clone(),
            stars,
            fit,
            diagnostics,
        }
    }
}

/// Output of one processing pass. Not modified after construction.
#[derive(Debug, Clone)]
pub struct ProcessedConstellation {
    names: ConstellationNames,
    stars: Vec<PlacedStar>,
    fit: Option<Fit>,
    diagnostics: Diagnostics,
}

impl ProcessedConstellation {
    pub fn names(&self) -> &ConstellationNames {
        &self.names
    }

    pub fn stars(&self) -> &[PlacedStar] {
        &self.stars
    }

    /// Shift and scale used to place the stars; `None` if nothing was placeable.
    pub fn fit(&self) -> Option<&Fit> {
        self.fit.as_ref()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn star(&self, star_id: i64) -> Option<&PlacedStar> {
        self.stars.iter().find(|s| s.star_id() == star_id)
    }

    /// Directed edges as pairs of stars, in star order then connection order.
    ///
    /// Endpoints are the stars the resolver matched, so edges stay correct
    /// when several stars share the sentinel id.
    pub fn edges(&self) -> impl Iterator<Item = (&PlacedStar, &PlacedStar)> + '_ {
        self.stars.iter().flat_map(move |from| {
            from.target_indices
                .iter()
                .filter_map(move |&idx| self.stars.get(idx).map(|to| (from, to)))
        })
    }

    /// Serializable form. `include_z` adds the unscaled z component.
    pub fn record(&self, include_z: bool) -> ConstellationRecord {
        ConstellationRecord {
            name: self.names.clone(),
            stars: self
                .stars
                .iter()
                .map(|s| StarRecord {
                    id: s.star_id(),
                    x: s.x(),
                    y: s.y(),
                    z: include_z.then(|| s.z()),
                    visual_magnitude: s.visual_magnitude(),
                    bayer_designation: s.bayer_designation().to_string(),
                    main_star: s.is_main_star(),
                    connection: s.connections().to_vec(),
                })
                .collect(),
        }
    }
}

impl fmt::Display for ProcessedConstellation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} / {} / {}",
            self.names.latin, self.names.german, self.names.english
        )?;
        writeln!(f, "{:>8} {:>9} {:>9} {:>6} {:<8} connections", "id", "x", "y", "vmag", "bayer")?;
        for s in &self.stars {
            writeln!(
                f,
                "{:>8} {:>9.2} {:>9.2} {:>6.2} {:<8} {:?}",
                s.star_id(),
                s.x(),
                s.y(),
                s.visual_magnitude(),
                s.bayer_designation(),
                s.connections()
            )?;
        }
        Ok(())
    }
}

/// JSON document written per constellation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstellationRecord {
    pub name: ConstellationNames,
    pub stars: Vec<StarRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarRecord {
    pub id: i64,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    pub visual_magnitude: f64,
    pub bayer_designation: String,
    pub main_star: bool,
    pub connection: Vec<i64>,
}
