//! Built-in demo scenarios, used by the CLI's `demo` subcommand and by the
//! integration test suite's scenario tests (S1/S2/S3).
//!
//! Grounded directly in the worked examples shipped alongside the original
//! placer: a loop of leaded components, each net wiring one resistor's
//! tail to the next's head.

use crate::geometry::{Board, Component, Net, TerminalId};

use super::LeadedComponent;

fn terminal(component: usize, terminal: usize) -> TerminalId {
    TerminalId { component, terminal }
}

/// A loop of `max_lengths.len()` leaded components on a `width x height`
/// stripboard, net `i` wiring component `i`'s tail (`t2`) to component
/// `i+1`'s head (`t1`), wrapping around.
fn resistor_loop(
    width: i64,
    height: i64,
    labels_and_lengths: &[(&str, i64)],
) -> (Board, Vec<Box<dyn Component>>, Vec<Net>) {
    let board = Board::stripboard(width, height).unwrap();
    let components: Vec<Box<dyn Component>> = labels_and_lengths
        .iter()
        .map(|&(label, max_length)| Box::new(LeadedComponent::new(label, max_length)) as _)
        .collect();

    let n = components.len();
    let nets = (0..n)
        .map(|i| Net::new([terminal(i, 1), terminal((i + 1) % n, 0)]))
        .collect();

    (board, components, nets)
}

/// S1: three resistors in a loop on a 2x3 stripboard. R1 has a maximum
/// lead length of 2; R2 and R3 have a maximum lead length of 1. Exactly 2
/// solutions with drilling and jumpers both disabled.
pub fn three_resistor_loop() -> (Board, Vec<Box<dyn Component>>, Vec<Net>) {
    resistor_loop(2, 3, &[("R1", 2), ("R2", 1), ("R3", 1)])
}

/// S2: four resistors in a loop on a 3x4 stripboard. R1 has a maximum lead
/// length of 3; R2/R3/R4 have a maximum lead length of 1. Exactly 12
/// solutions with drilling and jumpers both disabled.
pub fn four_resistor_loop() -> (Board, Vec<Box<dyn Component>>, Vec<Net>) {
    resistor_loop(3, 4, &[("R1", 3), ("R2", 1), ("R3", 1), ("R4", 1)])
}

/// S3: two length-1 resistors can't both fit on a single-hole board --- a
/// trivially infeasible problem that should terminate enumeration
/// immediately with no solutions.
pub fn infeasible_pair() -> (Board, Vec<Box<dyn Component>>, Vec<Net>) {
    let board = Board::stripboard(1, 1).unwrap();
    let components: Vec<Box<dyn Component>> = vec![
        Box::new(LeadedComponent::new("R1", 1)),
        Box::new(LeadedComponent::new("R2", 1)),
    ];
    let nets = vec![
        Net::new([terminal(0, 0), terminal(0, 1)]),
        Net::new([terminal(1, 0), terminal(1, 1)]),
    ];
    (board, components, nets)
}
