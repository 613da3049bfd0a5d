//! A uniform interface over a bundled CDCL library and an external
//! DIMACS-speaking process.
//!
//! The rest of the crate never talks to a solver's own API: it builds an
//! [Expr](crate::var::Expr), maps it to [Dimacs] through a [VarMapping],
//! hands that to whatever implements [Adapter], and maps the resulting
//! [Model] back through the same mapping. This is the only seam a SAT
//! solver's internals are expected to cross; everything on the other side
//! of [Adapter] is a replaceable backend.

pub mod embedded;
pub mod external;

use std::collections::HashMap;

use crate::errors;
use crate::var::{Expr, Var, VarTable};

/// A DIMACS-style signed literal: positive selects a variable's positive
/// polarity, negative its negation. Never zero.
pub type Literal = i32;

/// A satisfying assignment, one signed literal per variable that appeared
/// in the formula handed to the solver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Model(pub Vec<Literal>);

/// The result of a single `solve` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Sat(Model),
    Unsat,
    Unknown,
}

/// A CNF formula in DIMACS' own shape: a variable count and a list of
/// nonzero signed-integer clauses.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Dimacs {
    pub num_vars: usize,
    pub clauses: Vec<Vec<Literal>>,
}

/// A backend SAT solver, embedded or external.
pub trait Adapter {
    fn solve(&mut self, dimacs: &Dimacs) -> Result<Outcome, errors::Solver>;
}

/// A one-to-one correspondence between [Var]s and the 1-based, consecutive,
/// never-gapped integer ids DIMACS expects.
#[derive(Clone, Debug)]
pub struct VarMapping {
    var_to_id: HashMap<Var, Literal>,
    id_to_var: Vec<Var>,
}

impl VarMapping {
    /// Assigns ids in allocation order over every variable `vars` has ever
    /// handed out.
    pub fn build(vars: &VarTable) -> VarMapping {
        let id_to_var: Vec<Var> = vars.vars().collect();
        let var_to_id = id_to_var
            .iter()
            .enumerate()
            .map(|(i, &v)| (v, (i + 1) as Literal))
            .collect();
        VarMapping {
            var_to_id,
            id_to_var,
        }
    }

    pub fn id(&self, v: Var) -> Literal {
        self.var_to_id[&v]
    }

    pub fn var(&self, id: Literal) -> Var {
        self.id_to_var[(id.unsigned_abs() as usize) - 1]
    }

    pub fn len(&self) -> usize {
        self.id_to_var.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_var.is_empty()
    }
}

/// Renders `expr` to [Dimacs] via `mapping`. Every term's atom must be a
/// [crate::var::Var] --- by the time `to_cnf` has run, constants have already
/// been eliminated (see [crate::wff::to_cnf] phase 7).
pub fn to_dimacs(expr: &Expr, mapping: &VarMapping) -> Dimacs {
    let clauses = expr
        .iter()
        .map(|clause| {
            clause
                .iter()
                .filter_map(|term| {
                    term.as_var().map(|(v, positive)| {
                        let id = mapping.id(v);
                        if positive {
                            id
                        } else {
                            -id
                        }
                    })
                })
                .collect()
        })
        .collect();
    Dimacs {
        num_vars: mapping.len(),
        clauses,
    }
}

/// Maps a solver [Model] back to a `Var -> bool` assignment via `mapping`.
pub fn decode(model: &Model, mapping: &VarMapping) -> HashMap<Var, bool> {
    model
        .0
        .iter()
        .map(|&lit| (mapping.var(lit), lit > 0))
        .collect()
}

/// The default `iter_solve`: after each satisfiable result, blocks the
/// model's exact assignment (over every variable that appeared in the
/// original formula) and solves again, stopping on `Unsat`.
///
/// This is deliberately generic and not what the placement encoder uses to
/// enumerate placements --- blocking over every variable, including
/// Tseitin/auxiliary ones, would yield a new "model" for assignments that
/// differ only in those auxiliary variables. [crate::placement] builds its
/// own loop blocking over choice variables only.
pub fn iter_solve<A: Adapter>(
    adapter: &mut A,
    dimacs: Dimacs,
) -> impl Iterator<Item = Result<Model, errors::Solver>> + '_ {
    let mut current = Some(dimacs);
    std::iter::from_fn(move || {
        let dimacs = current.take()?;
        match adapter.solve(&dimacs) {
            Ok(Outcome::Sat(model)) => {
                let mut next = dimacs;
                let blocking: Vec<Literal> = model.0.iter().map(|&lit| -lit).collect();
                next.clauses.push(blocking);
                current = Some(next);
                Some(Ok(model))
            }
            Ok(Outcome::Unsat) => None,
            Ok(Outcome::Unknown) => Some(Err(errors::Solver::Unknown)),
            Err(e) => Some(Err(e)),
        }
    })
}

/// Adapter lookup by [crate::config::SolverName].
pub mod registry {
    use super::{embedded, external, Adapter};
    use crate::config::SolverName;

    /// Resolves `name` to a fresh, ready-to-use adapter.
    pub fn resolve(name: &SolverName) -> Box<dyn Adapter> {
        match name {
            SolverName::Embedded => Box::new(embedded::Embedded::default()),
            SolverName::External(binary) => {
                Box::new(external::External::with_binary(binary.clone()))
            }
        }
    }
}
