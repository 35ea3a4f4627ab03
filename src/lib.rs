//! # constellations
//!
//! Turns star catalogue tables into "connect the stars" constellation figures.
//!
//! For every configured constellation the crate takes the rows of a catalogue
//! table (star number, HD number, J2000 right ascension and declination,
//! visual magnitude, Bayer designation), places each star on a fixed-size
//! canvas, wires up the stick figure, and writes one JSON document (and
//! optionally a PNG preview) named after the constellation's latin name.
//!
//! ## Example
//!
//! ```no_run
//! use constellations::{
//!     CatalogueRow, Canvas, ConnectionSpec, ConstellationConfig, ConstellationNames,
//!     SymbolicConnection,
//! };
//!
//! let config = ConstellationConfig::new(
//!     ConstellationNames::new("Fornax", "Chemischer Ofen", "Fornax"),
//!     "For.tsv",
//!     ConnectionSpec::Symbolic(vec![SymbolicConnection::new("alf", ["bet"])]),
//! );
//! let rows = vec![
//!     CatalogueRow::new("963", "20010", "03 12 04.5", "-28 59 21", "3.87", "alf"),
//!     CatalogueRow::new("841", "17652", "02 49 05.4", "-32 24 22", "4.46", "bet"),
//! ];
//!
//! let fornax = config.process(&rows, &Canvas::default());
//! for star in fornax.stars() {
//!     println!("{} at ({:.1}, {:.1}) -> {:?}", star.star_id(), star.x(), star.y(), star.connections());
//! }
//! let json = serde_json::to_string_pretty(&fornax.record(false)).unwrap();
//! ```
//!
//! ## Pipeline
//!
//! 1. **Dedup** — rows repeating the previous row's catalogue number are dropped
//! 2. **Projection** — right ascension / declination become a unit vector on the
//!    celestial sphere; its `(x, y)` is the planar position
//! 3. **Rescale** — bounds over all stars, then one uniform shift and scale fits
//!    the figure into the canvas inside its border
//! 4. **Resolution** — the figure is wired either by Bayer designation or by a
//!    polyline of catalogue numbers; stars with outgoing edges are main stars
//!
//! Data problems never abort a constellation: they are collected as
//! [`Diagnostic`]s. Fetch or write failures abort only the constellation they
//! belong to (see [`pipeline::run_batch`]).

pub mod catalogs;
pub mod config;
pub mod connection;
pub mod constellation;
pub mod diagnostics;
pub mod pipeline;
pub mod projection;
#[cfg(feature = "image")]
pub mod render;
pub mod resolver;
pub mod sexagesimal;
pub mod star;

pub use catalogs::{DirectoryTableSource, TableSource};
pub use config::PipelineConfig;
pub use connection::{ConnectionSpec, SymbolicConnection};
pub use constellation::{
    ConstellationConfig, ConstellationNames, ConstellationRecord, ProcessedConstellation,
    StarRecord,
};
pub use diagnostics::{Diagnostic, Diagnostics};
pub use pipeline::{run_batch, BatchReport, ConstellationSink, JsonFileSink, Outcome};
pub use projection::{project, Bounds, Canvas, Fit};
#[cfg(feature = "image")]
pub use render::{PngSink, RenderStyle};
pub use star::{CatalogueRow, PlacedStar, RawStar};

// Sky positions are kept in 64-bit; the canvas scale amplifies small differences.
pub type Vector3 = nalgebra::Vector3<f64>;
