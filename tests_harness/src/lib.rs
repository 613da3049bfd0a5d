//! Shared helpers for the integration test suite.

use gridsat::config::EncodeOptions;
use gridsat::errors;
use gridsat::geometry::{Board, Component, Net};
use gridsat::placement::{solve_placements, Placement};

/// Runs a scenario to exhaustion and returns every placement found.
pub fn solve_all(
    board: &Board,
    components: &[Box<dyn Component>],
    nets: &[Net],
    options: EncodeOptions,
) -> Result<Vec<Placement>, errors::Error> {
    solve_placements(board, components, nets, options)?.collect()
}
