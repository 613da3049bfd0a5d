//! Decodes a solver model back into a [Placement](crate::placement::Placement).

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::errors;
use crate::geometry::Position;
use crate::placement::Placement;
use crate::var::Var;

use super::Encoded;

/// Reads `assignment` (a full `Var -> bool` map, as produced by
/// [crate::solver::decode]) into a [Placement].
///
/// Asserts exactly one position is selected per component --- anything else
/// means the `exactly_one` constraint from family 1 was violated, which
/// indicates a bug in this encoder or in the solver backend, never in the
/// input problem.
pub fn decode_model(
    encoded: &Encoded,
    assignment: &HashMap<Var, bool>,
) -> Result<Placement, errors::EncoderInvariant> {
    let is_true = |v: Var| assignment.get(&v).copied().unwrap_or(false);

    let mut components: BTreeMap<usize, Position> = BTreeMap::new();
    for (c_idx, positions) in encoded.comp_pos.iter().enumerate() {
        for (position, var) in positions {
            if is_true(*var) {
                components.insert(c_idx, position.clone());
            }
        }
    }

    if components.len() != encoded.comp_pos.len() {
        return Err(errors::EncoderInvariant::PlacementCount {
            expected: encoded.comp_pos.len(),
            found: components.len(),
        });
    }

    let drilled: BTreeSet<_> = encoded
        .drilled
        .iter()
        .filter(|&(_, &v)| is_true(v))
        .map(|(&h, _)| h)
        .collect();

    let jumpers: BTreeSet<_> = encoded
        .jumpers
        .iter()
        .filter(|&&(_, _, v)| is_true(v))
        .map(|&(h1, h2, _)| (h1, h2))
        .collect();

    Ok(Placement {
        components,
        drilled,
        jumpers,
    })
}
