//! The enumeration loop: [Placement], and [solve_placements], the entry
//! point that ties encoding, solving, and decoding together.
//!
//! This is the crate's own `iter_solve`, not [crate::solver::iter_solve]:
//! since several models can differ only in their Tseitin variables, the
//! blocking clause must be built over *choice* variables (`comp_pos`,
//! `drilled`, `jumper_pres`) only, or the same placement would be yielded
//! once per distinct assignment of the auxiliary variables underneath it.

use std::collections::{BTreeMap, BTreeSet};

use log::{info, trace};

use crate::config::EncodeOptions;
use crate::encoder::{self, Encoded, Problem};
use crate::errors;
use crate::geometry::{Board, Component, Hole, Net, Position};
use crate::misc::log::targets;
use crate::solver::{self, Adapter, Dimacs, Literal, Outcome, VarMapping};

/// One way to place every component such that the net list and the chosen
/// drilling/jumper options are all satisfied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    /// The position each component (by index into the problem's
    /// `components` slice) was placed at.
    pub components: BTreeMap<usize, Position>,
    pub drilled: BTreeSet<Hole>,
    pub jumpers: BTreeSet<(Hole, Hole)>,
}

/// Builds the constraint system for `(board, components, nets, options)`
/// and returns a lazy iterator over every satisfying [Placement].
///
/// Validates `options` before anything else --- a [errors::Config] is
/// returned with no [crate::var::Var] ever allocated --- then encodes the
/// problem (which may fail with [errors::Net]), then hands off to the
/// configured solver adapter.
pub fn solve_placements<'a>(
    board: &'a Board,
    components: &'a [Box<dyn Component>],
    nets: &'a [Net],
    options: EncodeOptions,
) -> Result<Enumerator, errors::Error> {
    let options = options.validate()?;
    let problem = Problem {
        board,
        components,
        nets,
        options: options.clone(),
    };

    trace!(target: targets::ENUMERATE, "starting enumeration run");
    let encoded = encoder::encode(&problem)?;
    let adapter = solver::registry::resolve(&options.solver);
    Ok(Enumerator::new(encoded, adapter))
}

/// Lazily yields every [Placement] satisfying a run's constraint system.
///
/// Each call to [Iterator::next] performs one solver search: on a hit, the
/// model is decoded into a [Placement] and a clause blocking that exact
/// assignment of choice variables is appended before returning it; on
/// `Unsat` the iteration ends cleanly (not surfaced as an error); any other
/// outcome ends iteration and surfaces the error.
pub struct Enumerator {
    encoded: Encoded,
    adapter: Box<dyn Adapter>,
    mapping: VarMapping,
    dimacs: Dimacs,
    done: bool,
}

impl Enumerator {
    fn new(encoded: Encoded, adapter: Box<dyn Adapter>) -> Enumerator {
        let mapping = VarMapping::build(&encoded.vars);
        let dimacs = solver::to_dimacs(&encoded.expr, &mapping);
        Enumerator {
            encoded,
            adapter,
            mapping,
            dimacs,
            done: false,
        }
    }
}

impl Iterator for Enumerator {
    type Item = Result<Placement, errors::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.adapter.solve(&self.dimacs) {
            Ok(Outcome::Sat(model)) => {
                let assignment = solver::decode(&model, &self.mapping);

                let placement = match encoder::decode_model(&self.encoded, &assignment) {
                    Ok(placement) => placement,
                    Err(e) => {
                        self.done = true;
                        return Some(Err(e.into()));
                    }
                };

                let blocking: Vec<Literal> = self
                    .encoded
                    .choice_vars
                    .iter()
                    .map(|&v| {
                        let id = self.mapping.id(v);
                        let value = assignment.get(&v).copied().unwrap_or(false);
                        if value {
                            -id
                        } else {
                            id
                        }
                    })
                    .collect();
                self.dimacs.clauses.push(blocking);

                trace!(target: targets::ENUMERATE, "yielded a placement, blocking clause appended");
                Some(Ok(placement))
            }
            Ok(Outcome::Unsat) => {
                info!(target: targets::ENUMERATE, "enumeration exhausted");
                self.done = true;
                None
            }
            Ok(Outcome::Unknown) => {
                self.done = true;
                Some(Err(errors::Solver::Unknown.into()))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e.into()))
            }
        }
    }
}
