//! Well-formed formulae, and their conversion to CNF.
//!
//! A [Wff] is a tree over [Atom]s with the usual propositional connectives,
//! plus one marker node, [Wff::AddVar], which is not a connective at all:
//! it asks [to_cnf] to replace the subtree under it with a fresh Tseitin
//! variable bound to it, rather than expanding it in place. This is what
//! keeps the encoder's recursive connectivity definitions
//! (`term_conn`/`term_dist` in [crate::encoder]) linear instead of
//! exponential once distributed into clauses.

use std::collections::HashMap;

use log::trace;

use crate::misc::log::targets;
use crate::var::{Atom, Clause, Const, Expr, Term, Var, VarTable};

/// A propositional formula over [Atom]s.
///
/// Trees are immutable once built: every constructor consumes its operands
/// and returns a new tree, mirroring the way [Clause]/[Expr] are assembled.
#[derive(Clone, Debug)]
pub enum Wff {
    Atom(Atom),
    Not(Box<Wff>),
    And(Box<Wff>, Box<Wff>),
    Or(Box<Wff>, Box<Wff>),
    Implies(Box<Wff>, Box<Wff>),
    Iff(Box<Wff>, Box<Wff>),
    /// Marks `sub` for Tseitin replacement: [to_cnf] introduces a fresh
    /// variable bound to `sub` instead of inlining it.
    AddVar(Box<Wff>),
}

impl Wff {
    pub fn atom(atom: impl Into<Atom>) -> Wff {
        Wff::Atom(atom.into())
    }

    pub fn var(v: Var) -> Wff {
        Wff::Atom(Atom::Var(v))
    }

    pub fn constant(value: bool) -> Wff {
        Wff::Atom(Atom::Const(Const(value)))
    }

    pub fn and(self, other: Wff) -> Wff {
        Wff::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Wff) -> Wff {
        Wff::Or(Box::new(self), Box::new(other))
    }

    pub fn implies(self, other: Wff) -> Wff {
        Wff::Implies(Box::new(self), Box::new(other))
    }

    pub fn iff(self, other: Wff) -> Wff {
        Wff::Iff(Box::new(self), Box::new(other))
    }

    /// Flags this subtree to be named by a fresh Tseitin variable rather
    /// than expanded in place. See the module docs.
    pub fn add_var(self) -> Wff {
        Wff::AddVar(Box::new(self))
    }
}

impl std::ops::Not for Wff {
    type Output = Wff;
    fn not(self) -> Wff {
        Wff::Not(Box::new(self))
    }
}

impl std::ops::BitAnd for Wff {
    type Output = Wff;
    fn bitand(self, rhs: Wff) -> Wff {
        self.and(rhs)
    }
}

impl std::ops::BitOr for Wff {
    type Output = Wff;
    fn bitor(self, rhs: Wff) -> Wff {
        self.or(rhs)
    }
}

/// The disjunction of `terms`, folding from falsum so an empty sequence is
/// unsatisfiable rather than vacuously true.
pub fn exists(terms: impl IntoIterator<Item = Wff>) -> Wff {
    terms.into_iter().fold(Wff::constant(false), Wff::or)
}

/// The conjunction of `terms`, folding from verum so an empty sequence holds
/// vacuously.
pub fn for_all(terms: impl IntoIterator<Item = Wff>) -> Wff {
    terms.into_iter().fold(Wff::constant(true), Wff::and)
}

/// Converts `wff` to an [Expr] (CNF), allocating any Tseitin variables
/// needed for [Wff::AddVar] markers from `vars`.
///
/// Proceeds in the eight fixed phases described on the module: extract
/// intermediate vars, eliminate IFF, eliminate IMPLIES, push NOT inward,
/// distribute OR over AND, extract clauses, eliminate constants, and
/// finally add the intermediate-variable definitions with polarity-aware
/// strength (`<->`, `->`, `<-`, or nothing at all for a binding that never
/// made it into a clause).
pub fn to_cnf(wff: &Wff, vars: &mut VarTable) -> Expr {
    trace!(target: targets::WFF, "to_cnf over a formula with {} vars allocated so far", vars.count());
    let expr = to_cnf_inner(wff, vars);
    trace!(target: targets::CNF, "to_cnf produced {} clauses", expr.len());
    expr
}

fn to_cnf_inner(wff: &Wff, vars: &mut VarTable) -> Expr {
    let mut bindings = Vec::new();
    let extracted = extract_vars(wff, vars, &mut bindings);

    let no_iff = eliminate_iff(&extracted);
    let no_implies = eliminate_implies(&no_iff);
    let nnf = push_not_inward(&no_implies);
    let distributed = distribute(&nnf);
    let raw = extract_clauses(&distributed);
    let mut expr = Expr::new(eliminate_constants(raw));

    if bindings.is_empty() {
        return expr;
    }

    // Polarity is read off the clause set built so far, in one pass over
    // all bindings rather than one scan per variable (see the design note
    // on batching this).
    let polarity = scan_polarity(&expr);

    for (v, sub) in bindings {
        let definition = match polarity.get(&v) {
            Some((true, true)) => Some(Wff::var(v).iff(sub)),
            Some((true, false)) => Some(Wff::var(v).implies(sub)),
            Some((false, true)) => Some(sub.implies(Wff::var(v))),
            _ => None,
        };
        if let Some(definition) = definition {
            expr = expr.union(to_cnf_inner(&definition, vars));
        }
    }

    expr
}

/// `(saw_positive, saw_negative)` per variable, across every clause in `expr`.
fn scan_polarity(expr: &Expr) -> HashMap<Var, (bool, bool)> {
    let mut polarity: HashMap<Var, (bool, bool)> = HashMap::new();
    for clause in expr.iter() {
        for term in clause.iter() {
            if let Some((v, positive)) = term.as_var() {
                let entry = polarity.entry(v).or_insert((false, false));
                if positive {
                    entry.0 = true;
                } else {
                    entry.1 = true;
                }
            }
        }
    }
    polarity
}

/// Phase 1: replace every `AddVar(sub)` node with a fresh variable, bottom-up
/// so nested markers are resolved before their parent is.
fn extract_vars(wff: &Wff, vars: &mut VarTable, bindings: &mut Vec<(Var, Wff)>) -> Wff {
    match wff {
        Wff::Atom(a) => Wff::Atom(*a),
        Wff::Not(x) => Wff::Not(Box::new(extract_vars(x, vars, bindings))),
        Wff::And(x, y) => Wff::And(
            Box::new(extract_vars(x, vars, bindings)),
            Box::new(extract_vars(y, vars, bindings)),
        ),
        Wff::Or(x, y) => Wff::Or(
            Box::new(extract_vars(x, vars, bindings)),
            Box::new(extract_vars(y, vars, bindings)),
        ),
        Wff::Implies(x, y) => Wff::Implies(
            Box::new(extract_vars(x, vars, bindings)),
            Box::new(extract_vars(y, vars, bindings)),
        ),
        Wff::Iff(x, y) => Wff::Iff(
            Box::new(extract_vars(x, vars, bindings)),
            Box::new(extract_vars(y, vars, bindings)),
        ),
        Wff::AddVar(sub) => {
            let rewritten = extract_vars(sub, vars, bindings);
            let v = vars.fresh(None);
            bindings.push((v, rewritten));
            Wff::var(v)
        }
    }
}

/// Phase 2: `a.iff(b)` becomes `(a -> b) & (b -> a)`.
fn eliminate_iff(wff: &Wff) -> Wff {
    match wff {
        Wff::Atom(a) => Wff::Atom(*a),
        Wff::Not(x) => Wff::Not(Box::new(eliminate_iff(x))),
        Wff::And(x, y) => Wff::And(Box::new(eliminate_iff(x)), Box::new(eliminate_iff(y))),
        Wff::Or(x, y) => Wff::Or(Box::new(eliminate_iff(x)), Box::new(eliminate_iff(y))),
        Wff::Implies(x, y) => {
            Wff::Implies(Box::new(eliminate_iff(x)), Box::new(eliminate_iff(y)))
        }
        Wff::Iff(x, y) => {
            let x = eliminate_iff(x);
            let y = eliminate_iff(y);
            Wff::And(
                Box::new(Wff::Implies(Box::new(x.clone()), Box::new(y.clone()))),
                Box::new(Wff::Implies(Box::new(y), Box::new(x))),
            )
        }
        Wff::AddVar(_) => unreachable!("AddVar nodes are resolved in phase 1"),
    }
}

/// Phase 3: `a -> b` becomes `!a | b`.
fn eliminate_implies(wff: &Wff) -> Wff {
    match wff {
        Wff::Atom(a) => Wff::Atom(*a),
        Wff::Not(x) => Wff::Not(Box::new(eliminate_implies(x))),
        Wff::And(x, y) => Wff::And(
            Box::new(eliminate_implies(x)),
            Box::new(eliminate_implies(y)),
        ),
        Wff::Or(x, y) => Wff::Or(
            Box::new(eliminate_implies(x)),
            Box::new(eliminate_implies(y)),
        ),
        Wff::Implies(x, y) => Wff::Or(
            Box::new(Wff::Not(Box::new(eliminate_implies(x)))),
            Box::new(eliminate_implies(y)),
        ),
        Wff::Iff(_, _) => unreachable!("IFF nodes are resolved in phase 2"),
        Wff::AddVar(_) => unreachable!("AddVar nodes are resolved in phase 1"),
    }
}

/// Phase 4: push every `Not` down to an atom (De Morgan), collapsing double
/// negation along the way. After this phase a `Not` node only ever wraps an
/// `Atom`.
fn push_not_inward(wff: &Wff) -> Wff {
    match wff {
        Wff::Atom(a) => Wff::Atom(*a),
        Wff::Not(inner) => negate(inner),
        Wff::And(x, y) => Wff::And(Box::new(push_not_inward(x)), Box::new(push_not_inward(y))),
        Wff::Or(x, y) => Wff::Or(Box::new(push_not_inward(x)), Box::new(push_not_inward(y))),
        Wff::Implies(_, _) | Wff::Iff(_, _) | Wff::AddVar(_) => {
            unreachable!("implies/iff/add_var are resolved in earlier phases")
        }
    }
}

/// The NNF of `!wff`.
fn negate(wff: &Wff) -> Wff {
    match wff {
        Wff::Atom(a) => Wff::Not(Box::new(Wff::Atom(*a))),
        Wff::Not(inner) => push_not_inward(inner),
        Wff::And(x, y) => Wff::Or(Box::new(negate(x)), Box::new(negate(y))),
        Wff::Or(x, y) => Wff::And(Box::new(negate(x)), Box::new(negate(y))),
        Wff::Implies(_, _) | Wff::Iff(_, _) | Wff::AddVar(_) => {
            unreachable!("implies/iff/add_var are resolved in earlier phases")
        }
    }
}

/// Phase 5: distribute OR over AND until the tree is a conjunction of
/// disjunctions of literals.
fn distribute(wff: &Wff) -> Wff {
    match wff {
        Wff::Atom(_) | Wff::Not(_) => wff.clone(),
        Wff::And(x, y) => Wff::And(Box::new(distribute(x)), Box::new(distribute(y))),
        Wff::Or(x, y) => distribute_or(&distribute(x), &distribute(y)),
        Wff::Implies(_, _) | Wff::Iff(_, _) | Wff::AddVar(_) => {
            unreachable!("implies/iff/add_var are resolved in earlier phases")
        }
    }
}

fn distribute_or(x: &Wff, y: &Wff) -> Wff {
    match (x, y) {
        (Wff::And(a, b), _) => distribute(&Wff::And(
            Box::new(distribute_or(a, y)),
            Box::new(distribute_or(b, y)),
        )),
        (_, Wff::And(a, b)) => distribute(&Wff::And(
            Box::new(distribute_or(x, a)),
            Box::new(distribute_or(x, b)),
        )),
        _ => Wff::Or(Box::new(x.clone()), Box::new(y.clone())),
    }
}

/// Phase 6: collect a conjunction of disjunctions of literals into clauses
/// of terms (still possibly carrying constants, resolved in phase 7).
fn extract_clauses(wff: &Wff) -> Vec<Vec<Term>> {
    match wff {
        Wff::And(x, y) => {
            let mut clauses = extract_clauses(x);
            clauses.extend(extract_clauses(y));
            clauses
        }
        _ => vec![extract_disjunction(wff)],
    }
}

fn extract_disjunction(wff: &Wff) -> Vec<Term> {
    match wff {
        Wff::Or(x, y) => {
            let mut terms = extract_disjunction(x);
            terms.extend(extract_disjunction(y));
            terms
        }
        Wff::Atom(a) => vec![Term::pos(*a)],
        Wff::Not(inner) => match inner.as_ref() {
            Wff::Atom(a) => vec![Term::neg(*a)],
            _ => unreachable!("push_not_inward only ever wraps Not around an Atom"),
        },
        Wff::And(_, _) | Wff::Implies(_, _) | Wff::Iff(_, _) | Wff::AddVar(_) => {
            unreachable!("distribute has already pushed every AND above every OR")
        }
    }
}

/// Phase 7: drop clauses a constant term already satisfies, and drop
/// constant terms a clause can never be satisfied by.
fn eliminate_constants(clauses: Vec<Vec<Term>>) -> Vec<Clause> {
    let mut kept_clauses = Vec::with_capacity(clauses.len());

    'clauses: for terms in clauses {
        let mut kept_terms = Vec::with_capacity(terms.len());
        for term in terms {
            if let Atom::Const(c) = term.atom {
                let term_is_always_true = c.0 != term.negated;
                if term_is_always_true {
                    continue 'clauses;
                }
                // Always false: drop the term, the clause survives on its
                // other terms (or becomes empty, i.e. falsum).
                continue;
            }
            kept_terms.push(term);
        }
        kept_clauses.push(Clause::new(kept_terms));
    }

    kept_clauses
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sat(expr: &Expr, assignment: &HashMap<Var, bool>) -> bool {
        expr.iter().all(|clause| {
            clause.iter().any(|term| match term.as_var() {
                Some((v, positive)) => assignment.get(&v).copied().unwrap_or(false) == positive,
                None => false,
            })
        })
    }

    #[test]
    fn and_of_two_atoms() {
        let mut vars = VarTable::new();
        let a = vars.fresh(None);
        let b = vars.fresh(None);
        let expr = to_cnf(&Wff::var(a).and(Wff::var(b)), &mut vars);

        let mut m = HashMap::new();
        m.insert(a, true);
        m.insert(b, true);
        assert!(sat(&expr, &m));

        m.insert(b, false);
        assert!(!sat(&expr, &m));
    }

    #[test]
    fn double_negation_collapses() {
        let mut vars = VarTable::new();
        let a = vars.fresh(None);
        let expr = to_cnf(&!(!Wff::var(a)), &mut vars);

        let mut m = HashMap::new();
        m.insert(a, true);
        assert!(sat(&expr, &m));
        m.insert(a, false);
        assert!(!sat(&expr, &m));
    }

    #[test]
    fn iff_is_symmetric_equivalence() {
        let mut vars = VarTable::new();
        let a = vars.fresh(None);
        let b = vars.fresh(None);
        let expr = to_cnf(&Wff::var(a).iff(Wff::var(b)), &mut vars);

        for (av, bv) in [(true, true), (false, false)] {
            let mut m = HashMap::new();
            m.insert(a, av);
            m.insert(b, bv);
            assert!(sat(&expr, &m), "{av} <-> {bv} should be satisfied");
        }
        for (av, bv) in [(true, false), (false, true)] {
            let mut m = HashMap::new();
            m.insert(a, av);
            m.insert(b, bv);
            assert!(!sat(&expr, &m), "{av} <-> {bv} should not be satisfied");
        }
    }

    /// Brute-forces whether some assignment to the variables not pinned by
    /// `fixed` satisfies `expr`. Used to check formulas involving Tseitin
    /// variables, whose allocated `Var` isn't known to the caller.
    fn exists_satisfying(expr: &Expr, vars: &VarTable, fixed: &[(Var, bool)]) -> bool {
        let free: Vec<Var> = vars
            .vars()
            .filter(|v| !fixed.iter().any(|(fv, _)| fv == v))
            .collect();
        for bits in 0..(1u32 << free.len()) {
            let mut m: HashMap<Var, bool> = fixed.iter().copied().collect();
            for (i, v) in free.iter().enumerate() {
                m.insert(*v, (bits >> i) & 1 == 1);
            }
            if sat(expr, &m) {
                return true;
            }
        }
        false
    }

    #[test]
    fn add_var_with_mixed_polarity_gets_full_iff_definition() {
        let mut vars = VarTable::new();
        let a = vars.fresh(None);
        let b = vars.fresh(None);
        let c = vars.fresh(None);
        // `named` appears on both sides of an IFF after elimination, so the
        // Tseitin variable it introduces shows up with both polarities and
        // must get a full `<->` definition rather than a one-sided one.
        let named = Wff::var(a).and(Wff::var(b)).add_var();
        let formula = named.iff(Wff::var(c));
        let expr = to_cnf(&formula, &mut vars);

        assert!(exists_satisfying(&expr, &vars, &[(a, true), (b, true), (c, true)]));
        assert!(!exists_satisfying(&expr, &vars, &[(a, true), (b, true), (c, false)]));
        assert!(exists_satisfying(&expr, &vars, &[(a, false), (b, true), (c, false)]));
        assert!(!exists_satisfying(&expr, &vars, &[(a, false), (b, true), (c, true)]));
    }

    #[test]
    fn or_of_self_is_equisatisfiable_with_self() {
        let mut vars = VarTable::new();
        let a = vars.fresh(None);
        let b = vars.fresh(None);
        let plain = to_cnf(&Wff::var(a).and(Wff::var(b)), &mut vars);
        let doubled = to_cnf(&Wff::var(a).or(Wff::var(a)).and(Wff::var(b)), &mut vars);

        for (av, bv) in [(true, true), (true, false), (false, true), (false, false)] {
            let mut m = HashMap::new();
            m.insert(a, av);
            m.insert(b, bv);
            assert_eq!(sat(&plain, &m), sat(&doubled, &m));
        }
    }

    #[test]
    fn union_of_separate_cnfs_matches_cnf_of_conjunction() {
        let mut vars = VarTable::new();
        let a = vars.fresh(None);
        let b = vars.fresh(None);
        let f = Wff::var(a).or(Wff::var(b));
        let g = !Wff::var(a).or(!Wff::var(b));

        let separate = to_cnf(&f, &mut vars).union(to_cnf(&g, &mut vars));
        let combined = to_cnf(&f.and(g), &mut vars);

        for (av, bv) in [(true, true), (true, false), (false, true), (false, false)] {
            let mut m = HashMap::new();
            m.insert(a, av);
            m.insert(b, bv);
            assert_eq!(sat(&separate, &m), sat(&combined, &m));
        }
    }

    #[test]
    fn exists_and_for_all_degenerate_cases() {
        let mut vars = VarTable::new();
        let empty_exists = to_cnf(&exists(Vec::<Wff>::new()), &mut vars);
        // falsum: the empty clause must appear.
        assert!(empty_exists.iter().any(|c| c.is_empty()));

        let empty_for_all = to_cnf(&for_all(Vec::<Wff>::new()), &mut vars);
        assert!(empty_for_all.is_empty());
    }
}
