//! Per-constellation warning channel.
//!
//! Nothing that goes wrong inside a single constellation's data is fatal: bad
//! numeric fields become sentinels, unknown designations drop one edge, flat
//! bounding boxes fall back to a safe scale. Each such event is recorded as a
//! [`Diagnostic`] so callers and tests can inspect what happened, and is also
//! emitted through `tracing` at `warn` level.

use std::fmt;

use thiserror::Error;
use tracing::warn;

use crate::sexagesimal::SexagesimalError;

/// Numeric catalogue column that failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowField {
    StarId,
    CatalogueNumber,
    VisualMagnitude,
}

impl fmt::Display for RowField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RowField::StarId => "star id",
            RowField::CatalogueNumber => "catalogue number",
            RowField::VisualMagnitude => "visual magnitude",
        })
    }
}

/// Which end of a symbolic edge could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeEnd {
    Origin,
    Target,
}

impl fmt::Display for EdgeEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EdgeEnd::Origin => "origin",
            EdgeEnd::Target => "target",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Diagnostic {
    #[error("row {row}: invalid {field} {value:?}, using sentinel")]
    InvalidNumber {
        row: usize,
        field: RowField,
        value: String,
    },
    #[error("star {star_id}: unparseable coordinates ({source}), placed at canvas origin")]
    InvalidCoordinates {
        star_id: i64,
        #[source]
        source: SexagesimalError,
    },
    #[error("no star with bayer designation {designation:?} ({end} of edge)")]
    UnknownDesignation { designation: String, end: EdgeEnd },
    #[error("no star with catalogue number {catalogue_number}")]
    UnknownCatalogueNumber { catalogue_number: i64 },
    #[error("zero extent along {axis:?}, scale taken from the other axis")]
    DegenerateAxis { axis: Axis },
}

/// Ordered list of diagnostics raised while processing one constellation.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    constellation: String,
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new(constellation: impl Into<String>) -> Self {
        Self {
            constellation: constellation.into(),
            entries: Vec::new(),
        }
    }

    /// Record a diagnostic and log it.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        warn!(constellation = %self.constellation, "{}", diagnostic);
        self.entries.push(diagnostic);
    }

    pub fn constellation(&self) -> &str {
        &self.constellation
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_order() {
        let mut diags = Diagnostics::new("Aquila");
        diags.push(Diagnostic::UnknownCatalogueNumber {
            catalogue_number: 7,
        });
        diags.push(Diagnostic::UnknownDesignation {
            designation: "eps".into(),
            end: EdgeEnd::Target,
        });
        assert_eq!(diags.constellation(), "Aquila");
        assert_eq!(diags.len(), 2);
        assert!(matches!(
            diags.entries()[0],
            Diagnostic::UnknownCatalogueNumber { catalogue_number: 7 }
        ));
    }

    #[test]
    fn messages_name_the_missing_key() {
        let d = Diagnostic::UnknownDesignation {
            designation: "game".into(),
            end: EdgeEnd::Target,
        };
        assert!(d.to_string().contains("\"game\""));
        assert!(d.to_string().contains("target"));
    }
}
