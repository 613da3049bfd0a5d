//! Checks properties of whole enumerations: no physical overlap, same-net
//! connectivity, cross-net disconnection, and no duplicate placements.

use std::collections::{BTreeMap, HashSet};

use gridsat::config::EncodeOptions;
use gridsat::demo;
use gridsat::geometry::{Board, Hole, Net};
use gridsat::placement::Placement;

use gridsat_tests::solve_all;

/// A tiny union-find over holes, used to check connectivity in the
/// conductive graph a [Placement] induces.
struct UnionFind {
    parent: BTreeMap<Hole, Hole>,
}

impl UnionFind {
    fn new(holes: impl IntoIterator<Item = Hole>) -> UnionFind {
        UnionFind {
            parent: holes.into_iter().map(|h| (h, h)).collect(),
        }
    }

    fn find(&mut self, h: Hole) -> Hole {
        let p = self.parent[&h];
        if p == h {
            h
        } else {
            let root = self.find(p);
            self.parent.insert(h, root);
            root
        }
    }

    fn union(&mut self, a: Hole, b: Hole) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent.insert(ra, rb);
        }
    }
}

/// The conductive graph a [Placement] induces: every trace with neither
/// endpoint drilled, plus every installed jumper.
fn conductive_groups(board: &Board, placement: &Placement) -> UnionFind {
    let mut uf = UnionFind::new(board.holes());
    for (a, b) in board.traces() {
        if !placement.drilled.contains(&a) && !placement.drilled.contains(&b) {
            uf.union(a, b);
        }
    }
    for &(a, b) in &placement.jumpers {
        uf.union(a, b);
    }
    uf
}

/// Property 7: every yielded placement keeps components non-overlapping,
/// connects every terminal within a net, and keeps distinct nets apart.
fn assert_placement_is_valid(board: &Board, nets: &[Net], placement: &Placement) {
    let positions: Vec<_> = placement.components.values().collect();
    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            assert!(
                positions[i].occupies.is_disjoint(&positions[j].occupies),
                "two components occupy overlapping cells"
            );
        }
    }

    let mut uf = conductive_groups(board, placement);

    for net in nets {
        let holes: Vec<Hole> = net
            .terminals()
            .iter()
            .map(|t| {
                placement.components[&t.component]
                    .terminal_hole(t.terminal)
                    .expect("every terminal lands on a hole in a valid placement")
            })
            .collect();
        let root = uf.find(holes[0]);
        for &h in &holes[1..] {
            assert_eq!(
                uf.find(h),
                root,
                "two terminals in the same net are not electrically connected"
            );
        }
    }

    for i in 0..nets.len() {
        for j in (i + 1)..nets.len() {
            let h1 = placement.components[&nets[i].head().component]
                .terminal_hole(nets[i].head().terminal)
                .unwrap();
            let h2 = placement.components[&nets[j].head().component]
                .terminal_hole(nets[j].head().terminal)
                .unwrap();
            assert_ne!(
                uf.find(h1),
                uf.find(h2),
                "two terminals from distinct nets ended up electrically connected"
            );
        }
    }
}

/// Property 8: the enumerator never yields the same
/// (positions, drilled, jumpers) tuple twice.
fn assert_no_duplicate_placements(placements: &[Placement]) {
    let mut seen: HashSet<String> = HashSet::new();
    for placement in placements {
        let key = format!("{placement:?}");
        assert!(seen.insert(key), "the same placement was yielded more than once");
    }
}

#[test]
fn three_resistor_loop_placements_are_all_individually_valid_and_distinct() {
    let (board, components, nets) = demo::three_resistor_loop();
    let placements = solve_all(&board, &components, &nets, EncodeOptions::default()).unwrap();
    assert!(!placements.is_empty());
    for placement in &placements {
        assert_placement_is_valid(&board, &nets, placement);
    }
    assert_no_duplicate_placements(&placements);
}

#[test]
fn four_resistor_loop_placements_are_all_individually_valid_and_distinct() {
    let (board, components, nets) = demo::four_resistor_loop();
    let placements = solve_all(&board, &components, &nets, EncodeOptions::default()).unwrap();
    assert!(!placements.is_empty());
    for placement in &placements {
        assert_placement_is_valid(&board, &nets, placement);
    }
    assert_no_duplicate_placements(&placements);
}

/// Property 9: `max_drilled = 0` must produce exactly the same set of
/// placements as `allow_drilled = false`.
#[test]
fn max_drilled_zero_matches_allow_drilled_false() {
    let (board, components, nets) = demo::three_resistor_loop();

    let via_disallow = solve_all(
        &board,
        &components,
        &nets,
        EncodeOptions {
            allow_drilled: false,
            ..EncodeOptions::default()
        },
    )
    .unwrap();

    let via_max_zero = solve_all(
        &board,
        &components,
        &nets,
        EncodeOptions {
            allow_drilled: true,
            max_drilled: Some(0),
            ..EncodeOptions::default()
        },
    )
    .unwrap();

    let key = |p: &Placement| format!("{p:?}");
    let lhs: HashSet<String> = via_disallow.iter().map(key).collect();
    let rhs: HashSet<String> = via_max_zero.iter().map(key).collect();
    assert_eq!(lhs, rhs);
}

/// Property 10: `max_jumpers = 0` makes the jumper link set empty, so no
/// yielded placement ever installs one.
#[test]
fn max_jumpers_zero_yields_no_jumpers() {
    let (board, components, nets) = demo::three_resistor_loop();
    let options = EncodeOptions {
        max_jumper_length: 2,
        max_jumpers: Some(0),
        ..EncodeOptions::default()
    };
    let placements = solve_all(&board, &components, &nets, options).unwrap();
    assert!(!placements.is_empty());
    for placement in &placements {
        assert!(placement.jumpers.is_empty());
    }
}
