//! Star list construction and edge resolution.
//!
//! Rows are collapsed into stars with an adjacent-only filter: a row is
//! skipped when its catalogue number equals the previous row's. Upstream
//! tables are sorted so duplicates arrive grouped; a number that reappears
//! later with another number in between produces a second star.
//!
//! Once every star of a constellation is placed, the figure is wired up from
//! its [`ConnectionSpec`]. Lookups are linear and the first match wins; a key
//! that matches nothing drops only the edge it belongs to.

use tracing::debug;

use crate::connection::{ConnectionSpec, SymbolicConnection};
use crate::diagnostics::{Diagnostic, Diagnostics, EdgeEnd};
use crate::star::{CatalogueRow, PlacedStar, RawStar};

/// Turn catalogue rows into stars, dropping rows that repeat the previous
/// row's catalogue number.
pub fn dedup_rows<'a, I>(rows: I, diagnostics: &mut Diagnostics) -> Vec<RawStar>
where
    I: IntoIterator<Item = &'a CatalogueRow>,
{
    let mut last_catalogue_number: Option<&str> = None;
    let mut stars = Vec::new();
    for (idx, row) in rows.into_iter().enumerate() {
        let catalogue_number = row.catalogue_number.trim();
        if last_catalogue_number == Some(catalogue_number) {
            debug!(row = idx, catalogue_number, "skipping repeated catalogue entry");
            continue;
        }
        stars.push(RawStar::from_row(idx, row, diagnostics));
        last_catalogue_number = Some(catalogue_number);
    }
    stars
}

/// Index of the first star with this Bayer designation. Empty keys never match.
fn find_by_designation(stars: &[PlacedStar], designation: &str) -> Option<usize> {
    if designation.is_empty() {
        return None;
    }
    stars
        .iter()
        .position(|s| s.bayer_designation() == designation)
}

fn find_by_catalogue_number(stars: &[PlacedStar], catalogue_number: i64) -> Option<usize> {
    stars
        .iter()
        .position(|s| s.catalogue_number() == catalogue_number)
}

/// Wire symbolic edges. Each declaration overwrites the origin's connections.
pub fn resolve_symbolic(
    stars: &mut [PlacedStar],
    connections: &[SymbolicConnection],
    diagnostics: &mut Diagnostics,
) {
    for connection in connections {
        let Some(origin) = find_by_designation(stars, &connection.origin) else {
            diagnostics.push(Diagnostic::UnknownDesignation {
                designation: connection.origin.clone(),
                end: EdgeEnd::Origin,
            });
            continue;
        };

        let mut targets = Vec::with_capacity(connection.targets.len());
        let mut target_indices = Vec::with_capacity(connection.targets.len());
        for target in &connection.targets {
            match find_by_designation(stars, target) {
                Some(idx) => {
                    targets.push(stars[idx].star_id());
                    target_indices.push(idx);
                }
                None => diagnostics.push(Diagnostic::UnknownDesignation {
                    designation: target.clone(),
                    end: EdgeEnd::Target,
                }),
            }
        }
        stars[origin].connections = targets;
        stars[origin].target_indices = target_indices;
    }
}

/// Wire a catalogue-number polyline. Edges accumulate, so a number that
/// appears several times branches.
pub fn resolve_chain(stars: &mut [PlacedStar], chain: &[i64], diagnostics: &mut Diagnostics) {
    for pair in chain.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let from_idx = find_by_catalogue_number(stars, from);
        let to_idx = find_by_catalogue_number(stars, to);
        if from_idx.is_none() {
            diagnostics.push(Diagnostic::UnknownCatalogueNumber {
                catalogue_number: from,
            });
        }
        if to_idx.is_none() {
            diagnostics.push(Diagnostic::UnknownCatalogueNumber {
                catalogue_number: to,
            });
        }
        if let (Some(from_idx), Some(to_idx)) = (from_idx, to_idx) {
            let target_id = stars[to_idx].star_id();
            stars[from_idx].connections.push(target_id);
            stars[from_idx].target_indices.push(to_idx);
        }
    }
}

/// Resolve a connection spec against a fully placed star list.
pub fn resolve(stars: &mut [PlacedStar], spec: &ConnectionSpec, diagnostics: &mut Diagnostics) {
    match spec {
        ConnectionSpec::Symbolic(connections) => resolve_symbolic(stars, connections, diagnostics),
        ConnectionSpec::Chain(chain) => resolve_chain(stars, chain, diagnostics),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{rescale, Canvas};

    fn row(id: i64, hd: i64, bayer: &str) -> CatalogueRow {
        let ra = format!("{:02} 00 00", id % 24);
        CatalogueRow::new(id.to_string(), hd.to_string(), ra, "+10 00 00", "3.0", bayer)
    }

    fn placed(rows: &[CatalogueRow]) -> (Vec<PlacedStar>, Diagnostics) {
        let mut diags = Diagnostics::new("test");
        let raw = dedup_rows(rows, &mut diags);
        let (stars, _) = rescale(raw, &Canvas::default(), &mut diags);
        (stars, Diagnostics::new("test"))
    }

    fn by_id(stars: &[PlacedStar], id: i64) -> &PlacedStar {
        stars.iter().find(|s| s.star_id() == id).unwrap()
    }

    #[test]
    fn adjacent_duplicates_collapse() {
        let rows = vec![row(1, 100, "A"), row(2, 100, "A"), row(3, 200, "B")];
        let mut diags = Diagnostics::new("test");
        let stars = dedup_rows(&rows, &mut diags);
        assert_eq!(stars.len(), 2);
        assert_eq!(stars[0].star_id, 1);
        assert_eq!(stars[1].star_id, 3);
    }

    #[test]
    fn separated_duplicates_survive() {
        let rows = vec![row(1, 100, "A"), row(2, 200, "B"), row(3, 100, "A")];
        let mut diags = Diagnostics::new("test");
        assert_eq!(dedup_rows(&rows, &mut diags).len(), 3);
    }

    #[test]
    fn first_row_always_kept() {
        let rows = vec![CatalogueRow::new("1", "", "01 00 00", "+10 00 00", "3.0", "A")];
        let mut diags = Diagnostics::new("test");
        assert_eq!(dedup_rows(&rows, &mut diags).len(), 1);
    }

    #[test]
    fn symbolic_redeclaration_overwrites() {
        let rows = vec![row(1, 10, "alf"), row(2, 20, "bet"), row(3, 30, "gam")];
        let (mut stars, mut diags) = placed(&rows);
        let spec = vec![
            SymbolicConnection::new("alf", ["bet"]),
            SymbolicConnection::new("alf", ["gam"]),
        ];
        resolve_symbolic(&mut stars, &spec, &mut diags);
        assert_eq!(by_id(&stars, 1).connections(), &[3]);
        assert!(diags.is_empty());
    }

    #[test]
    fn symbolic_missing_target_is_skipped() {
        let rows = vec![row(1, 10, "alf"), row(2, 20, "bet")];
        let (mut stars, mut diags) = placed(&rows);
        let spec = vec![SymbolicConnection::new("alf", ["game", "bet"])];
        resolve_symbolic(&mut stars, &spec, &mut diags);
        assert_eq!(by_id(&stars, 1).connections(), &[2]);
        assert_eq!(
            diags.entries(),
            &[Diagnostic::UnknownDesignation {
                designation: "game".into(),
                end: EdgeEnd::Target
            }]
        );
    }

    #[test]
    fn symbolic_missing_origin_is_skipped() {
        let rows = vec![row(1, 10, "alf"), row(2, 20, "bet")];
        let (mut stars, mut diags) = placed(&rows);
        let spec = vec![
            SymbolicConnection::new("zet", ["alf"]),
            SymbolicConnection::new("bet", ["alf"]),
        ];
        resolve_symbolic(&mut stars, &spec, &mut diags);
        assert!(by_id(&stars, 1).connections().is_empty());
        assert_eq!(by_id(&stars, 2).connections(), &[1]);
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn designation_match_is_exact() {
        let rows = vec![row(1, 10, "nu.01"), row(2, 20, "nu.02"), row(3, 30, "ksi")];
        let (mut stars, mut diags) = placed(&rows);
        let spec = vec![SymbolicConnection::new("ksi", ["nu.02", "NU.01"])];
        resolve_symbolic(&mut stars, &spec, &mut diags);
        assert_eq!(by_id(&stars, 3).connections(), &[2]);
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn chain_accumulates_edges() {
        let rows = vec![row(1, 10, ""), row(2, 20, ""), row(3, 30, "")];
        let (mut stars, mut diags) = placed(&rows);
        resolve_chain(&mut stars, &[10, 20, 10, 30], &mut diags);
        assert_eq!(by_id(&stars, 1).connections(), &[2, 3]);
        assert_eq!(by_id(&stars, 2).connections(), &[1]);
        assert!(by_id(&stars, 3).connections().is_empty());
        assert!(!by_id(&stars, 3).is_main_star());
    }

    #[test]
    fn chain_closes_when_first_is_repeated() {
        let rows = vec![row(1, 10, ""), row(2, 20, ""), row(3, 30, "")];
        let (mut stars, mut diags) = placed(&rows);
        resolve_chain(&mut stars, &[10, 20, 30, 10], &mut diags);
        assert_eq!(by_id(&stars, 3).connections(), &[1]);
        assert!(stars.iter().all(PlacedStar::is_main_star));
    }

    #[test]
    fn chain_skips_only_broken_pairs() {
        let rows = vec![row(1, 10, ""), row(2, 20, ""), row(3, 30, "")];
        let (mut stars, mut diags) = placed(&rows);
        resolve_chain(&mut stars, &[10, 99, 20, 30], &mut diags);
        assert!(by_id(&stars, 1).connections().is_empty());
        assert_eq!(by_id(&stars, 2).connections(), &[3]);
        assert_eq!(diags.len(), 2);
    }

    #[test]
    fn targets_are_tracked_by_position_not_id() {
        let rows = vec![
            row(1, 10, "alf"),
            CatalogueRow::new("x", "20", "02 00 00", "+10 00 00", "3.0", "bet"),
            CatalogueRow::new("y", "30", "03 00 00", "+10 00 00", "3.0", "gam"),
        ];
        let (mut stars, mut diags) = placed(&rows);
        resolve_symbolic(&mut stars, &[SymbolicConnection::new("alf", ["gam", "bet"])], &mut diags);
        assert_eq!(stars[0].connections(), &[-1, -1]);
        assert_eq!(stars[0].target_indices, vec![2, 1]);
    }

    #[test]
    fn resolve_dispatches_on_variant() {
        let rows = vec![row(1, 10, "alf"), row(2, 20, "bet")];
        let (mut stars, mut diags) = placed(&rows);
        resolve(&mut stars, &ConnectionSpec::Chain(vec![20, 10]), &mut diags);
        assert_eq!(by_id(&stars, 2).connections(), &[1]);
        resolve(
            &mut stars,
            &ConnectionSpec::Symbolic(vec![SymbolicConnection::new("bet", Vec::<String>::new())]),
            &mut diags,
        );
        assert!(by_id(&stars, 2).connections().is_empty());
    }
}
