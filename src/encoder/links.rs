//! Link enumeration: the fixed trace links a board declares, plus the
//! jumper links a run may introduce, minus jumpers the trace graph already
//! renders redundant.

use std::collections::{BTreeMap, BTreeSet};

use crate::geometry::{Board, Hole, LinkKind};

/// One potential conductive edge, before a presence variable has been
/// allocated for it.
#[derive(Clone, Debug)]
pub struct LinkSpec {
    pub kind: LinkKind,
    /// Canonicalised `(lesser, greater)` endpoints.
    pub ends: (Hole, Hole),
    /// Cells this link's physical wire covers. Empty for a trace (a trace
    /// doesn't consume board space; it's already part of the board).
    pub occupies: Vec<Hole>,
}

/// Every trace link on `board`, plus every non-redundant jumper link of
/// length `1..=max_jumper_length` in both axes.
pub fn enumerate_links(board: &Board, max_jumper_length: i64) -> Vec<LinkSpec> {
    let mut specs: Vec<LinkSpec> = board
        .traces()
        .map(|(a, b)| LinkSpec {
            kind: LinkKind::Trace,
            ends: (a, b),
            occupies: Vec::new(),
        })
        .collect();

    if max_jumper_length <= 0 {
        return specs;
    }

    let trace_neighbours = trace_adjacency(board);
    let holes: BTreeSet<Hole> = board.holes().collect();

    for &(hx, hy) in &holes {
        for len in 1..=max_jumper_length {
            for (dx, dy) in [(len, 0), (0, len)] {
                let other = (hx + dx, hy + dy);
                if !holes.contains(&other) {
                    continue;
                }
                let path = holes_between((hx, hy), other);
                if is_branch_free(&path, &trace_neighbours) {
                    continue;
                }
                specs.push(LinkSpec {
                    kind: LinkKind::Jumper,
                    ends: ((hx, hy), other),
                    occupies: path,
                });
            }
        }
    }

    specs
}

fn trace_adjacency(board: &Board) -> BTreeMap<Hole, BTreeSet<Hole>> {
    let mut adjacency: BTreeMap<Hole, BTreeSet<Hole>> = BTreeMap::new();
    for (a, b) in board.traces() {
        adjacency.entry(a).or_default().insert(b);
        adjacency.entry(b).or_default().insert(a);
    }
    adjacency
}

/// Every hole from `h1` to `h2` inclusive, in order along their shared
/// axis. Both endpoints must share exactly one coordinate.
fn holes_between(h1: Hole, h2: Hole) -> Vec<Hole> {
    let (x1, y1) = h1;
    let (x2, y2) = h2;
    let mut path = Vec::new();
    if y1 == y2 {
        let (lo, hi) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        for x in lo..=hi {
            path.push((x, y1));
        }
    } else {
        debug_assert_eq!(x1, x2);
        let (lo, hi) = if y1 <= y2 { (y1, y2) } else { (y2, y1) };
        for y in lo..=hi {
            path.push((x1, y));
        }
    }
    path
}

/// True iff the trace graph already provides an unbranched path along
/// `path`: every consecutive pair is a trace edge, and every hole strictly
/// between the endpoints has no trace neighbour besides its two path
/// neighbours.
fn is_branch_free(path: &[Hole], trace_neighbours: &BTreeMap<Hole, BTreeSet<Hole>>) -> bool {
    if path.len() < 2 {
        return false;
    }
    for window in path.windows(2) {
        let (a, b) = (window[0], window[1]);
        let connected = trace_neighbours.get(&a).is_some_and(|ns| ns.contains(&b));
        if !connected {
            return false;
        }
    }
    for i in 1..path.len() - 1 {
        let expected: BTreeSet<Hole> = [path[i - 1], path[i + 1]].into_iter().collect();
        let actual = trace_neighbours.get(&path[i]).cloned().unwrap_or_default();
        if actual != expected {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_only_links_cover_every_trace() {
        let board = Board::stripboard(3, 1).unwrap();
        let specs = enumerate_links(&board, 0);
        assert_eq!(specs.len(), 2);
        assert!(specs.iter().all(|s| matches!(s.kind, LinkKind::Trace)));
    }

    #[test]
    fn jumper_spanning_a_fully_traced_row_is_redundant() {
        let board = Board::stripboard(3, 1).unwrap();
        let specs = enumerate_links(&board, 2);
        // (0,0)-(2,0) runs straight over the single unbroken trace strip.
        assert!(!specs
            .iter()
            .any(|s| s.ends == ((0, 0), (2, 0)) && matches!(s.kind, LinkKind::Jumper)));
        // (0,0)-(1,0) duplicates a direct trace edge exactly, also redundant.
        assert!(!specs
            .iter()
            .any(|s| s.ends == ((0, 0), (1, 0)) && matches!(s.kind, LinkKind::Jumper)));
    }

    #[test]
    fn jumper_across_disconnected_rows_is_not_redundant() {
        let board = Board::stripboard(1, 2).unwrap();
        let specs = enumerate_links(&board, 1);
        assert!(specs
            .iter()
            .any(|s| s.ends == ((0, 0), (0, 1)) && matches!(s.kind, LinkKind::Jumper)));
    }
}
