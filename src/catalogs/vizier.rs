//! Reader for VizieR table exports.
//!
//! The constellation tables come from the VizieR query form for catalogue
//! IV/27 (HD/DM/GC/HR/HIP/Bayer/Flamsteed cross index), saved as CSV or as
//! tab-separated values. Only the columns `Full`, `HD`, `RAJ2000`, `DEJ2000`,
//! `Vmag` and `Bayer` are used; any others are ignored, and a missing column
//! reads as an empty field. Header and field whitespace is trimmed, since
//! VizieR pads both. TSV exports carry `#` comment lines and a units/dashes
//! line under the header; those are skipped.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use crate::star::CatalogueRow;

/// Anything that can turn a constellation's source locator into catalogue rows.
pub trait TableSource {
    fn fetch(&self, locator: &str) -> anyhow::Result<Vec<CatalogueRow>>;
}

/// Parse catalogue rows from delimited text.
pub fn read_catalogue_rows<R: Read>(reader: R, delimiter: u8) -> anyhow::Result<Vec<CatalogueRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    rdr.deserialize::<CatalogueRow>()
        .filter(|result| !matches!(result, Ok(row) if is_separator_row(row)))
        .collect::<Result<Vec<CatalogueRow>, csv::Error>>()
        .map_err(|e| e.into())
}

/// Units line (`"h:m:s"`, `mag`) or dashes line following a TSV header.
fn is_separator_row(row: &CatalogueRow) -> bool {
    let fields = [
        &row.star_id,
        &row.catalogue_number,
        &row.right_ascension,
        &row.declination,
        &row.visual_magnitude,
    ];
    let units = fields
        .iter()
        .any(|f| f.contains("h:m:s") || f.contains("d:m:s") || f.as_str() == "mag");
    let dashes = fields.iter().any(|f| !f.is_empty())
        && fields.iter().all(|f| f.chars().all(|c| c == '-'));
    units || dashes
}

/// Delimiter for a file, by extension: tab for `.tsv` / `.tab`, comma otherwise.
pub fn delimiter_for<P: AsRef<Path>>(path: P) -> u8 {
    match path.as_ref().extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") || ext.eq_ignore_ascii_case("tab") => b'\t',
        _ => b',',
    }
}

pub fn read_catalogue_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<CatalogueRow>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening catalogue table {}", path.display()))?;
    let rows = read_catalogue_rows(file, delimiter_for(path))
        .with_context(|| format!("parsing catalogue table {}", path.display()))?;
    debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Table source resolving locators as file names under a root directory.
#[derive(Debug, Clone)]
pub struct DirectoryTableSource {
    root: PathBuf,
}

impl DirectoryTableSource {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }
}

impl TableSource for DirectoryTableSource {
    fn fetch(&self, locator: &str) -> anyhow::Result<Vec<CatalogueRow>> {
        read_catalogue_file(self.root.join(locator))
    }
}
