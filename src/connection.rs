//! How a constellation's stick figure is described.

use serde::{Deserialize, Serialize};

/// One origin star and the stars it draws lines to, named by Bayer designation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolicConnection {
    pub origin: String,
    #[serde(default)]
    pub targets: Vec<String>,
}

impl SymbolicConnection {
    pub fn new<S: Into<String>>(origin: impl Into<String>, targets: impl IntoIterator<Item = S>) -> Self {
        Self {
            origin: origin.into(),
            targets: targets.into_iter().map(Into::into).collect(),
        }
    }
}

/// The two ways the figure can be written down.
///
/// In configuration files this appears as `{"symbolic": [...]}` or
/// `{"chain": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionSpec {
    /// Per-star edge lists keyed by Bayer designation. A later entry for the
    /// same origin replaces an earlier one.
    Symbolic(Vec<SymbolicConnection>),
    /// Catalogue numbers in drawing order; every adjacent pair is one edge.
    /// Repeat the first number at the end to close the figure.
    Chain(Vec<i64>),
}

impl Default for ConnectionSpec {
    fn default() -> Self {
        ConnectionSpec::Symbolic(Vec::new())
    }
}
