//! The placement encoder.
//!
//! Builds the full constraint system for a [Problem] --- component
//! exclusion, drilling, jumpers, and the unary-distance reachability
//! encoding that gives net connectivity/disconnectivity --- and exposes
//! enough bookkeeping ([Encoded]) for [crate::placement] to decode models
//! and block on choice variables only.
//!
//! A run moves through a fixed sequence and nothing survives past it:
//! `INIT -> VARS_ALLOCATED -> WFF_BUILT -> CNF_BUILT`, at which point
//! [crate::placement] takes over for `SOLVING <-> YIELDING -> DONE`. A
//! fresh [Problem] always gets a fresh [crate::var::VarTable]; there is no
//! global registry of variables across runs.

pub mod links;

mod decode;

pub use decode::decode_model;

use std::collections::HashMap;

use log::{debug, trace};

use crate::cardinality::{at_most_k, at_most_one, exactly_one};
use crate::config::EncodeOptions;
use crate::errors;
use crate::geometry::{Board, Component, Hole, LinkKind, Net, Position, TerminalId};
use crate::misc::log::targets;
use crate::var::{Expr, Var, VarTable};
use crate::wff::{exists, for_all, to_cnf, Wff};

use links::enumerate_links;

/// A placement problem: a board, the components to place on it, the nets
/// they must satisfy, and the run's options. Corresponds directly to the
/// `(board, components, nets, options)` input the encoder's contract
/// describes.
pub struct Problem<'a> {
    pub board: &'a Board,
    pub components: &'a [Box<dyn Component>],
    pub nets: &'a [Net],
    pub options: EncodeOptions,
}

/// The built constraint system, plus the bookkeeping [crate::placement]
/// needs to decode a model and to block on choice variables.
///
/// Owns everything it needs: nothing here borrows from the [Problem] that
/// produced it, so it outlives the encoding call that built it.
pub struct Encoded {
    pub vars: VarTable,
    pub expr: Expr,
    /// `comp_pos[c]` is every `(position, comp_pos[c,p] var)` pair for
    /// component `c`, in the order its geometry returned them.
    pub comp_pos: Vec<Vec<(Position, Var)>>,
    pub drilled: HashMap<Hole, Var>,
    /// Jumper links only, as `(h1, h2, jumper_pres var)`.
    pub jumpers: Vec<(Hole, Hole, Var)>,
    /// `comp_pos`, `drilled`, and `jumper_pres` variables --- the ones a
    /// blocking clause is built over. Auxiliary/definitional variables
    /// (`occ`, `trace_pres`, `term_conn`, `term_dist`, and every Tseitin
    /// variable `to_cnf` introduced) are excluded.
    pub choice_vars: Vec<Var>,
}

/// Builds the constraint system for `problem`.
///
/// Returns [errors::Error::Net] if some terminal is missing from every net
/// or appears in more than one. All other validation ([EncodeOptions]'s
/// own `validate`) is expected to have already run before a [Problem] is
/// constructed.
pub fn encode(problem: &Problem) -> Result<Encoded, errors::Error> {
    debug!(
        target: targets::ENCODER,
        "encoding {} components, {} nets, {} board holes",
        problem.components.len(),
        problem.nets.len(),
        problem.board.hole_count(),
    );

    let terminal_net = terminal_to_net(problem.components, problem.nets)?;

    let mut vars = VarTable::new();

    let comp_pos: Vec<Vec<(Position, Var)>> = problem
        .components
        .iter()
        .map(|c| {
            c.positions(problem.board)
                .into_iter()
                .map(|p| (p, vars.fresh(None)))
                .collect()
        })
        .collect();

    let spaces: Vec<Hole> = problem.board.spaces().collect();
    let mut occ: HashMap<(usize, Hole), Var> = HashMap::new();
    for c_idx in 0..problem.components.len() {
        for &s in &spaces {
            occ.insert((c_idx, s), vars.fresh(None));
        }
    }

    let holes: Vec<Hole> = problem.board.holes().collect();
    let mut drilled: HashMap<Hole, Var> = HashMap::new();
    for &h in &holes {
        drilled.insert(h, vars.fresh(None));
    }

    let link_specs = enumerate_links(problem.board, problem.options.max_jumper_length);
    trace!(target: targets::ENCODER, "{} candidate links after redundancy suppression", link_specs.len());

    let mut trace_pres: HashMap<(Hole, Hole), Var> = HashMap::new();
    let mut trace_order: Vec<(Hole, Hole)> = Vec::new();
    let mut jumpers: Vec<(Hole, Hole, Var)> = Vec::new();
    let mut jumper_cells: HashMap<(Hole, Hole), Vec<Hole>> = HashMap::new();
    let mut adjacency: HashMap<Hole, Vec<(Hole, Var)>> = HashMap::new();

    for spec in &link_specs {
        let v = vars.fresh(None);
        match spec.kind {
            LinkKind::Trace => {
                trace_pres.insert(spec.ends, v);
                trace_order.push(spec.ends);
            }
            LinkKind::Jumper => {
                jumpers.push((spec.ends.0, spec.ends.1, v));
                jumper_cells.insert(spec.ends, spec.occupies.clone());
            }
        }
        let (a, b) = spec.ends;
        adjacency.entry(a).or_default().push((b, v));
        adjacency.entry(b).or_default().push((a, v));
    }

    let mut term_conn: HashMap<(usize, Hole), Var> = HashMap::new();
    for net_idx in 0..problem.nets.len() {
        for &h in &holes {
            term_conn.insert((net_idx, h), vars.fresh(None));
        }
    }

    let max_dist = holes.len().saturating_sub(1);
    let mut term_dist: HashMap<(Hole, usize), Var> = HashMap::new();
    for &h in &holes {
        for i in 0..=max_dist {
            term_dist.insert((h, i), vars.fresh(None));
        }
    }

    trace!(target: targets::ENCODER, "{} vars allocated before WFF construction", vars.count());

    let mut expr = Expr::empty();

    // Family 1: one position per component.
    for positions in &comp_pos {
        let items: Vec<Var> = positions.iter().map(|(_, v)| *v).collect();
        expr = expr.union(exactly_one(&items, &mut vars));
    }

    // Family 2: space occupancy definition.
    for (c_idx, positions) in comp_pos.iter().enumerate() {
        for &s in &spaces {
            let occ_var = occ[&(c_idx, s)];
            let covering: Vec<Wff> = positions
                .iter()
                .filter(|(p, _)| p.occupies.contains(&s))
                .map(|(_, v)| Wff::var(*v))
                .collect();
            expr = expr.union(to_cnf(&Wff::var(occ_var).iff(exists(covering)), &mut vars));
        }
    }

    // Family 3: at most one occupant per space.
    for &s in &spaces {
        let mut items: Vec<Var> = (0..problem.components.len())
            .map(|c_idx| occ[&(c_idx, s)])
            .collect();
        for &(h1, h2, jv) in &jumpers {
            if jumper_cells
                .get(&(h1, h2))
                .is_some_and(|cells| cells.contains(&s))
            {
                items.push(jv);
            }
        }
        expr = expr.union(at_most_one(&items, &mut vars));
    }

    // Family 4: trace presence iff no drilled endpoint.
    for ends in &trace_order {
        let (h1, h2) = *ends;
        let tv = trace_pres[ends];
        let rhs = (!Wff::var(drilled[&h1])).and(!Wff::var(drilled[&h2]));
        expr = expr.union(to_cnf(&Wff::var(tv).iff(rhs), &mut vars));
    }
    if !problem.options.allow_drilled {
        for &h in &holes {
            expr = expr.union(to_cnf(&!Wff::var(drilled[&h]), &mut vars));
        }
    }

    // Family 5: cardinality limits.
    if let Some(max_drilled) = problem.options.max_drilled {
        let items: Vec<Var> = holes.iter().map(|h| drilled[h]).collect();
        expr = expr.union(at_most_k(&items, max_drilled as usize, &mut vars));
    }
    if let Some(max_jumpers) = problem.options.max_jumpers {
        let items: Vec<Var> = jumpers.iter().map(|&(_, _, v)| v).collect();
        expr = expr.union(at_most_k(&items, max_jumpers as usize, &mut vars));
    }

    // Family 6: net-head connectivity (recursive definition).
    for (net_idx, net) in problem.nets.iter().enumerate() {
        let head = net.head();
        for &h in &holes {
            let lhs = term_conn[&(net_idx, h)];
            let mut disjuncts: Vec<Wff> = Vec::new();
            if let Some(neighbours) = adjacency.get(&h) {
                for &(n, pres) in neighbours {
                    let conn_through_neighbour =
                        Wff::var(term_conn[&(net_idx, n)]).and(Wff::var(pres));
                    disjuncts.push(conn_through_neighbour.add_var());
                }
            }
            for (p, v) in &comp_pos[head.component] {
                if p.terminal_hole(head.terminal) == Some(h) {
                    disjuncts.push(Wff::var(*v));
                }
            }
            expr = expr.union(to_cnf(&Wff::var(lhs).iff(exists(disjuncts)), &mut vars));
        }
    }

    // Family 7: distance-zero definition.
    for &h in &holes {
        let mut disjuncts: Vec<Wff> = Vec::new();
        for net in problem.nets {
            let head = net.head();
            for (p, v) in &comp_pos[head.component] {
                if p.terminal_hole(head.terminal) == Some(h) {
                    disjuncts.push(Wff::var(*v));
                }
            }
        }
        let lhs = !Wff::var(term_dist[&(h, 0)]);
        expr = expr.union(to_cnf(&lhs.iff(exists(disjuncts)), &mut vars));
    }

    // Family 8: distance induction.
    for i in 1..=max_dist {
        for &h in &holes {
            let lhs = term_dist[&(h, i)];
            let mut conjuncts = vec![Wff::var(term_dist[&(h, i - 1)])];
            if let Some(neighbours) = adjacency.get(&h) {
                for &(n, pres) in neighbours {
                    let still_unreached_through_n =
                        Wff::var(term_dist[&(n, i - 1)]).or(!Wff::var(pres));
                    conjuncts.push(still_unreached_through_n.add_var());
                }
            }
            expr = expr.union(to_cnf(&Wff::var(lhs).iff(for_all(conjuncts)), &mut vars));
        }
    }

    // Family 9: net continuity.
    for (terminal, &net_idx) in &terminal_net {
        for (p, v) in &comp_pos[terminal.component] {
            if let Some(h) = p.terminal_hole(terminal.terminal) {
                let target = term_conn[&(net_idx, h)];
                expr = expr.union(to_cnf(&Wff::var(*v).implies(Wff::var(target)), &mut vars));
            }
        }
    }

    // Family 10: net discontinuity / unreachability exclusivity.
    for &h in &holes {
        let mut items: Vec<Var> = (0..problem.nets.len())
            .map(|n| term_conn[&(n, h)])
            .collect();
        items.push(term_dist[&(h, max_dist)]);
        expr = expr.union(at_most_one(&items, &mut vars));
    }

    let choice_vars: Vec<Var> = comp_pos
        .iter()
        .flatten()
        .map(|(_, v)| *v)
        .chain(drilled.values().copied())
        .chain(jumpers.iter().map(|&(_, _, v)| v))
        .collect();

    debug!(
        target: targets::ENCODER,
        "built {} clauses over {} vars ({} choice vars)",
        expr.len(),
        vars.count(),
        choice_vars.len(),
    );

    Ok(Encoded {
        vars,
        expr,
        comp_pos,
        drilled,
        jumpers,
        choice_vars,
    })
}

/// Maps every terminal to its net's index, or fails with [errors::Net] if
/// some terminal is unassigned or double-assigned.
fn terminal_to_net(
    components: &[Box<dyn Component>],
    nets: &[Net],
) -> Result<HashMap<TerminalId, usize>, errors::Error> {
    let mut assigned: HashMap<TerminalId, usize> = HashMap::new();
    for (net_idx, net) in nets.iter().enumerate() {
        for &terminal in net.terminals() {
            if assigned.insert(terminal, net_idx).is_some() {
                let (component, label) = describe(components, terminal);
                return Err(errors::Net::Duplicated {
                    component,
                    terminal: label,
                }
                .into());
            }
        }
    }

    for (c_idx, component) in components.iter().enumerate() {
        for t_idx in 0..component.terminals().len() {
            let terminal = TerminalId {
                component: c_idx,
                terminal: t_idx,
            };
            if !assigned.contains_key(&terminal) {
                let (component, label) = describe(components, terminal);
                return Err(errors::Net::Unassigned {
                    component,
                    terminal: label,
                }
                .into());
            }
        }
    }

    Ok(assigned)
}

fn describe(components: &[Box<dyn Component>], terminal: TerminalId) -> (String, String) {
    let component = &components[terminal.component];
    (
        component.label().to_string(),
        component.terminals()[terminal.terminal].label.clone(),
    )
}
