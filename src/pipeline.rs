//! Batch driver: fetch, process and write every configured constellation.
//!
//! The unit of failure is one constellation. A table that cannot be fetched or
//! an output that cannot be written is logged and recorded in the
//! [`BatchReport`]; the remaining constellations are still processed.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{error, info};

use crate::catalogs::TableSource;
use crate::config::PipelineConfig;
use crate::constellation::{ConstellationConfig, ConstellationNames, ProcessedConstellation};
use crate::projection::Canvas;

/// Consumer of finished constellations (JSON files, raster previews, ...).
pub trait ConstellationSink {
    fn name(&self) -> &str;
    fn write(&mut self, constellation: &ProcessedConstellation) -> anyhow::Result<()>;
}

/// Output path `<dir>/<latin>.<extension>`.
pub fn output_path(dir: &Path, names: &ConstellationNames, extension: &str) -> PathBuf {
    dir.join(format!("{}.{}", names.latin, extension))
}

/// Writes `<latin>.json`, pretty-printed with two-space indentation.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    dir: PathBuf,
    include_z: bool,
}

impl JsonFileSink {
    pub fn new<P: Into<PathBuf>>(dir: P, include_z: bool) -> Self {
        Self {
            dir: dir.into(),
            include_z,
        }
    }
}

impl ConstellationSink for JsonFileSink {
    fn name(&self) -> &str {
        "json"
    }

    fn write(&mut self, constellation: &ProcessedConstellation) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating output directory {}", self.dir.display()))?;
        let path = output_path(&self.dir, constellation.names(), "json");
        let file =
            File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &constellation.record(self.include_z))
            .with_context(|| format!("writing {}", path.display()))?;
        writeln!(writer)?;
        writer.flush()?;
        info!("Wrote {}", path.display());
        Ok(())
    }
}

/// Sinks implied by a configuration: always JSON, plus PNG when rendering is
/// requested and the `image` feature is enabled.
pub fn default_sinks(config: &PipelineConfig) -> Vec<Box<dyn ConstellationSink>> {
    let mut sinks: Vec<Box<dyn ConstellationSink>> = vec![Box::new(JsonFileSink::new(
        &config.output_dir,
        config.include_z,
    ))];
    if config.render {
        #[cfg(feature = "image")]
        sinks.push(Box::new(crate::render::PngSink::new(
            &config.output_dir,
            crate::render::RenderStyle::for_canvas(&config.canvas),
        )));
        #[cfg(not(feature = "image"))]
        tracing::warn!("Rendering requested but the `image` feature is disabled; skipping previews");
    }
    sinks
}

/// What happened to one constellation.
#[derive(Debug)]
pub enum Outcome {
    Processed(Box<ProcessedConstellation>),
    Failed { latin: String, error: anyhow::Error },
}

impl Outcome {
    pub fn latin(&self) -> &str {
        match self {
            Outcome::Processed(c) => &c.names().latin,
            Outcome::Failed { latin, .. } => latin,
        }
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<Outcome>,
}

impl BatchReport {
    pub fn processed(&self) -> impl Iterator<Item = &ProcessedConstellation> {
        self.outcomes.iter().filter_map(|o| match o {
            Outcome::Processed(c) => Some(c.as_ref()),
            Outcome::Failed { .. } => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &anyhow::Error)> {
        self.outcomes.iter().filter_map(|o| match o {
            Outcome::Failed { latin, error } => Some((latin.as_str(), error)),
            Outcome::Processed(_) => None,
        })
    }

    pub fn num_failed(&self) -> usize {
        self.failures().count()
    }

    pub fn num_warnings(&self) -> usize {
        self.processed().map(|c| c.diagnostics().len()).sum()
    }
}

/// Fetch and process a single constellation.
pub fn process_constellation(
    constellation: &ConstellationConfig,
    source: &dyn TableSource,
    canvas: &Canvas,
) -> anyhow::Result<ProcessedConstellation> {
    let rows = source.fetch(&constellation.source).with_context(|| {
        format!(
            "fetching table for {} from {}",
            constellation.names.latin, constellation.source
        )
    })?;
    Ok(constellation.process(&rows, canvas))
}

/// Process every configured constellation in order and hand each result to all sinks.
///
/// A failing sink marks the constellation as failed but the other sinks still run.
pub fn run_batch(
    config: &PipelineConfig,
    source: &dyn TableSource,
    sinks: &mut [Box<dyn ConstellationSink>],
) -> BatchReport {
    let mut report = BatchReport::default();
    for constellation in &config.constellations {
        let latin = constellation.names.latin.clone();
        let processed = match process_constellation(constellation, source, &config.canvas) {
            Ok(p) => p,
            Err(error) => {
                error!(constellation = %latin, "{:#}", error);
                report.outcomes.push(Outcome::Failed { latin, error });
                continue;
            }
        };

        let mut sink_error = None;
        for sink in sinks.iter_mut() {
            if let Err(e) = sink.write(&processed) {
                let e = e.context(format!("{} output for {}", sink.name(), latin));
                error!(constellation = %latin, "{:#}", e);
                if sink_error.is_none() {
                    sink_error = Some(e);
                }
            }
        }

        report.outcomes.push(match sink_error {
            Some(error) => Outcome::Failed { latin, error },
            None => Outcome::Processed(Box::new(processed)),
        });
    }

    info!(
        "Batch finished: {} processed, {} failed, {} warnings",
        report.processed().count(),
        report.num_failed(),
        report.num_warnings()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::{ConnectionSpec, SymbolicConnection};
    use crate::star::CatalogueRow;

    struct MapSource;

    impl TableSource for MapSource {
        fn fetch(&self, locator: &str) -> anyhow::Result<Vec<CatalogueRow>> {
            match locator {
                "For" => Ok(vec![
                    CatalogueRow::new("963", "20010", "03 12 04.5", "-28 59 21", "3.87", "alf"),
                    CatalogueRow::new("841", "17652", "02 49 05.4", "-32 24 22", "4.46", "bet"),
                ]),
                _ => anyhow::bail!("no table {locator}"),
            }
        }
    }

    struct FailingSink;

    impl ConstellationSink for FailingSink {
        fn name(&self) -> &str {
            "failing"
        }

        fn write(&mut self, _: &ProcessedConstellation) -> anyhow::Result<()> {
            anyhow::bail!("disk full")
        }
    }

    fn config(entries: &[(&str, &str)]) -> PipelineConfig {
        PipelineConfig {
            constellations: entries
                .iter()
                .map(|(latin, source)| {
                    ConstellationConfig::new(
                        ConstellationNames::new(*latin, *latin, *latin),
                        *source,
                        ConnectionSpec::Symbolic(vec![SymbolicConnection::new("alf", ["bet"])]),
                    )
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn failed_fetch_does_not_stop_batch() {
        let config = config(&[("Lacerta", "Lac"), ("Fornax", "For")]);
        let report = run_batch(&config, &MapSource, &mut []);
        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.num_failed(), 1);
        let (latin, _) = report.failures().next().unwrap();
        assert_eq!(latin, "Lacerta");
        let fornax = report.processed().next().unwrap();
        assert_eq!(fornax.star(963).unwrap().connections(), &[841]);
    }

    #[test]
    fn failing_sink_marks_constellation_failed() {
        let config = config(&[("Fornax", "For")]);
        let mut sinks: Vec<Box<dyn ConstellationSink>> = vec![Box::new(FailingSink)];
        let report = run_batch(&config, &MapSource, &mut sinks);
        assert_eq!(report.num_failed(), 1);
        assert_eq!(report.outcomes[0].latin(), "Fornax");
        let (_, error) = report.failures().next().unwrap();
        assert!(format!("{error:#}").contains("disk full"));
    }

    #[test]
    fn output_path_uses_latin_name() {
        let names = ConstellationNames::new("Boötes", "Bärenhüter", "Boötes");
        assert_eq!(
            output_path(Path::new("out"), &names, "json"),
            PathBuf::from("out/Boötes.json")
        );
    }
}
