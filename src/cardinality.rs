//! Cardinality constraints: at-most-one, exactly-one, and at-most-k.
//!
//! `at_most_one` uses the commander encoding (linear in the number of
//! variables); `at_most_k` uses the sequential unary-counter encoding
//! (Sinz, "Towards an Optimal CNF Encoding of Boolean Cardinality
//! Constraints", 2005), sometimes called LTseq. Both introduce auxiliary
//! variables, so every entry point here takes the [VarTable] it should
//! allocate from.

use log::trace;

use crate::misc::log::targets;
use crate::var::{Clause, Expr, Term, Var, VarTable};

/// Below this many variables, pairwise clauses are cheaper than a commander
/// tree.
const PAIRWISE_THRESHOLD: usize = 6;

/// A CNF expression true iff at most one of `items` is true.
pub fn at_most_one(items: &[Var], vars: &mut VarTable) -> Expr {
    trace!(target: targets::CARDINALITY, "at_most_one over {} vars", items.len());
    let mut level = items.to_vec();
    let mut expr = Expr::empty();
    while level.len() >= PAIRWISE_THRESHOLD {
        let (commanders, sub_expr) = at_most_one_reduce(&level, vars);
        expr = expr.union(sub_expr);
        level = commanders;
    }
    expr.union(pairwise_at_most_one(&level))
}

/// A CNF expression true iff at least one of `items` is true.
pub fn at_least_one(items: &[Var]) -> Expr {
    Expr::single(Clause::new(items.iter().map(|&v| Term::pos(v))))
}

/// A CNF expression true iff exactly one of `items` is true.
pub fn exactly_one(items: &[Var], vars: &mut VarTable) -> Expr {
    at_most_one(items, vars).union(at_least_one(items))
}

fn pairwise_at_most_one(items: &[Var]) -> Expr {
    let mut clauses = Vec::new();
    for i in 0..items.len() {
        for j in (i + 1)..items.len() {
            clauses.push(Clause::new([Term::neg(items[i]), Term::neg(items[j])]));
        }
    }
    Expr::new(clauses)
}

/// A fresh commander variable for `group`, true iff at least one member of
/// `group` is true.
fn create_commander(group: &[Var], vars: &mut VarTable) -> (Var, Expr) {
    let c = vars.fresh(None);

    let mut at_least = vec![Term::neg(c)];
    at_least.extend(group.iter().map(|&p| Term::pos(p)));
    let mut clauses = vec![Clause::new(at_least)];

    for &p in group {
        clauses.push(Clause::new([Term::pos(c), Term::neg(p)]));
    }

    (c, Expr::new(clauses))
}

/// Splits `items` into groups of 3, replaces each group with a commander
/// variable, and returns the shorter list of commanders alongside the CNF
/// that makes `at_most_one(items) <=> at_most_one(commanders)`.
fn at_most_one_reduce(items: &[Var], vars: &mut VarTable) -> (Vec<Var>, Expr) {
    debug_assert!(items.len() >= PAIRWISE_THRESHOLD);

    let mut commanders = Vec::new();
    let mut expr = Expr::empty();
    for group in items.chunks(3) {
        let (c, sub) = create_commander(group, vars);
        commanders.push(c);
        expr = expr.union(sub).union(pairwise_at_most_one(group));
    }

    (commanders, expr)
}

/// A CNF expression true iff at most `k` of `items` are true.
///
/// Uses the sequential counter encoding: an auxiliary register
/// `s[i][j]`, 1 ≤ i ≤ n−1 and 1 ≤ j ≤ k, where `s[i][j]` is forced true
/// once at least `j` of `items[0..i]` are true. Clause count is exactly
/// `2nk + n - 3k - 1` for `0 < k < n`.
pub fn at_most_k(items: &[Var], k: usize, vars: &mut VarTable) -> Expr {
    trace!(target: targets::CARDINALITY, "at_most_k over {} vars, k={}", items.len(), k);

    let n = items.len();
    if k == 0 {
        return Expr::new(items.iter().map(|&p| Clause::new([Term::neg(p)])));
    }
    if k >= n {
        // No assignment can exceed the bound.
        return Expr::empty();
    }

    let rows = n - 1;
    let s: Vec<Vec<Var>> = (0..rows)
        .map(|_| (0..k).map(|_| vars.fresh(None)).collect())
        .collect();
    let s_at = |i: usize, j: usize| -> Var { s[i - 1][j - 1] };
    let p = |i: usize| -> Var { items[i - 1] };

    let mut clauses = Vec::new();

    clauses.push(Clause::new([Term::neg(p(1)), Term::pos(s_at(1, 1))]));
    for j in 2..=k {
        clauses.push(Clause::new([Term::neg(s_at(1, j))]));
    }

    for i in 2..n {
        clauses.push(Clause::new([Term::neg(p(i)), Term::pos(s_at(i, 1))]));
        clauses.push(Clause::new([Term::neg(s_at(i - 1, 1)), Term::pos(s_at(i, 1))]));
        for j in 2..=k {
            clauses.push(Clause::new([
                Term::neg(p(i)),
                Term::neg(s_at(i - 1, j - 1)),
                Term::pos(s_at(i, j)),
            ]));
            clauses.push(Clause::new([
                Term::neg(s_at(i - 1, j)),
                Term::pos(s_at(i, j)),
            ]));
        }
    }

    for i in 2..=n {
        clauses.push(Clause::new([Term::neg(p(i)), Term::neg(s_at(i - 1, k))]));
    }

    Expr::new(clauses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    fn satisfies(expr: &Expr, assignment: &HashMap<Var, bool>) -> bool {
        expr.iter().all(|clause| {
            clause.iter().any(|term| match term.as_var() {
                Some((v, positive)) => assignment.get(&v).copied().unwrap_or(false) == positive,
                None => false,
            })
        })
    }

    /// The number of distinct assignments to `choice` that extend to a full
    /// satisfying assignment of `expr` over every variable in `vars`.
    /// Auxiliary variables (commanders, counter bits) may be
    /// under-constrained by one-directional implications, so this counts
    /// projections rather than raw full assignments.
    fn count_choice_models(expr: &Expr, vars: &VarTable, choice: &[Var]) -> usize {
        let all: Vec<Var> = vars.vars().collect();
        let mut seen: HashSet<Vec<bool>> = HashSet::new();
        for bits in 0..(1u32 << all.len()) {
            let assignment: HashMap<Var, bool> = all
                .iter()
                .enumerate()
                .map(|(i, &v)| (v, (bits >> i) & 1 == 1))
                .collect();
            if satisfies(expr, &assignment) {
                let projection: Vec<bool> = choice.iter().map(|v| assignment[v]).collect();
                seen.insert(projection);
            }
        }
        seen.len()
    }

    #[test]
    fn at_most_one_pairwise_admits_n_plus_one_models() {
        let mut vars = VarTable::new();
        let items: Vec<Var> = (0..4).map(|_| vars.fresh(None)).collect();
        let expr = at_most_one(&items, &mut vars);
        assert_eq!(count_choice_models(&expr, &vars, &items), items.len() + 1);
    }

    #[test]
    fn at_most_one_commander_admits_n_plus_one_models() {
        let mut vars = VarTable::new();
        let items: Vec<Var> = (0..7).map(|_| vars.fresh(None)).collect();
        let expr = at_most_one(&items, &mut vars);
        assert_eq!(count_choice_models(&expr, &vars, &items), items.len() + 1);
    }

    #[test]
    fn exactly_one_admits_n_models() {
        let mut vars = VarTable::new();
        let items: Vec<Var> = (0..4).map(|_| vars.fresh(None)).collect();
        let expr = exactly_one(&items, &mut vars);
        assert_eq!(count_choice_models(&expr, &vars, &items), items.len());
    }

    #[test]
    fn at_most_k_admits_binomial_sum_models() {
        let mut vars = VarTable::new();
        let items: Vec<Var> = (0..5).map(|_| vars.fresh(None)).collect();
        let expr = at_most_k(&items, 2, &mut vars);
        // C(5,0) + C(5,1) + C(5,2) = 1 + 5 + 10
        assert_eq!(count_choice_models(&expr, &vars, &items), 16);
    }

    #[test]
    fn at_most_k_degenerate_zero_forces_all_false() {
        let mut vars = VarTable::new();
        let items: Vec<Var> = (0..4).map(|_| vars.fresh(None)).collect();
        let expr = at_most_k(&items, 0, &mut vars);
        assert_eq!(count_choice_models(&expr, &vars, &items), 1);
    }

    #[test]
    fn at_most_k_clause_count_matches_closed_form() {
        let mut vars = VarTable::new();
        let items: Vec<Var> = (0..10).map(|_| vars.fresh(None)).collect();
        let expr = at_most_k(&items, 3, &mut vars);
        assert_eq!(expr.len(), 2 * 10 * 3 + 10 - 3 * 3 - 1);
        assert_eq!(expr.len(), 60);
    }
}
