//! The bundled in-process adapter, backed by the CaDiCaL CDCL solver.

use cadical::Solver as Cadical;
use log::trace;

use crate::errors;
use crate::misc::log::targets;

use super::{Adapter, Dimacs, Literal, Model, Outcome};

/// Wraps a fresh `cadical::Solver` per run.
///
/// The crate never reaches into CaDiCaL's own API beyond `add_clause`,
/// `solve`, and `value`; the SAT solver's internals are an external
/// collaborator, not something this crate concerns itself with.
pub struct Embedded {
    inner: Cadical,
    /// How many of the caller's clauses have already been handed to
    /// `inner`. The enumeration loop in [crate::placement] re-passes the
    /// whole accumulated [Dimacs] on every call, growing it by one blocking
    /// clause at a time; since CaDiCaL is incremental, only the new tail
    /// needs adding back.
    clauses_added: usize,
}

impl Default for Embedded {
    fn default() -> Self {
        Embedded {
            inner: Cadical::new(),
            clauses_added: 0,
        }
    }
}

impl Adapter for Embedded {
    fn solve(&mut self, dimacs: &Dimacs) -> Result<Outcome, errors::Solver> {
        let new_clauses = &dimacs.clauses[self.clauses_added..];
        trace!(target: targets::SOLVER, "handing {} new clauses ({} total) over {} vars to cadical", new_clauses.len(), dimacs.clauses.len(), dimacs.num_vars);
        for clause in new_clauses {
            self.inner.add_clause(clause.iter().copied());
        }
        self.clauses_added = dimacs.clauses.len();

        match self.inner.solve() {
            Some(true) => {
                let model = (1..=dimacs.num_vars as Literal)
                    .map(|id| match self.inner.value(id) {
                        Some(false) => -id,
                        _ => id,
                    })
                    .collect();
                Ok(Outcome::Sat(Model(model)))
            }
            Some(false) => Ok(Outcome::Unsat),
            None => Ok(Outcome::Unknown),
        }
    }
}
