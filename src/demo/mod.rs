//! A small worked geometry fixture: a two-terminal leaded component (a
//! through-hole resistor, diode, or similar) on a rectangular stripboard.
//!
//! This is illustrative, not a general geometry engine --- per the geometry
//! contract (§4.4), arbitrary component footprints and board shapes are
//! somebody else's library. It exists so the CLI's demo subcommand and the
//! integration tests have something concrete to place.

use crate::geometry::{Board, Component, Hole, Position, Terminal};

mod scenarios;
pub use scenarios::{four_resistor_loop, infeasible_pair, three_resistor_loop};

/// A two-terminal component placeable horizontally or vertically, at any
/// lead length from 1 up to `max_length` holes.
#[derive(Clone, Debug)]
pub struct LeadedComponent {
    label: String,
    terminals: [Terminal; 2],
    color: String,
    max_length: i64,
}

impl LeadedComponent {
    pub fn new(label: impl Into<String>, max_length: i64) -> LeadedComponent {
        LeadedComponent {
            label: label.into(),
            terminals: [Terminal::new("t1"), Terminal::new("t2")],
            color: "#000000".to_string(),
            max_length,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> LeadedComponent {
        self.color = color.into();
        self
    }
}

impl Component for LeadedComponent {
    fn label(&self) -> &str {
        &self.label
    }

    fn terminals(&self) -> &[Terminal] {
        &self.terminals
    }

    fn color(&self) -> &str {
        &self.color
    }

    fn positions(&self, board: &Board) -> Vec<Position> {
        let mut positions = Vec::new();
        for (hx, hy) in board.holes() {
            for length in 1..=self.max_length {
                for (dx, dy) in [(length, 0), (0, length)] {
                    for swap in [false, true] {
                        let (t0, t1): (Hole, Hole) = if swap {
                            ((hx + dx, hy + dy), (hx, hy))
                        } else {
                            ((hx, hy), (hx + dx, hy + dy))
                        };
                        if board.has_hole(t0) && board.has_hole(t1) {
                            let occupies = span(t0, t1);
                            if occupies.iter().all(|&c| board.has_space(c)) {
                                positions.push(Position::new(occupies, vec![t0, t1]));
                            }
                        }
                    }
                }
            }
        }
        positions
    }
}

/// Every hole from `a` to `b` inclusive, along whichever axis they share.
fn span(a: Hole, b: Hole) -> Vec<Hole> {
    let (ax, ay) = a;
    let (bx, by) = b;
    if ay == by {
        let (lo, hi) = if ax <= bx { (ax, bx) } else { (bx, ax) };
        (lo..=hi).map(|x| (x, ay)).collect()
    } else {
        let (lo, hi) = if ay <= by { (ay, by) } else { (by, ay) };
        (lo..=hi).map(|y| (ax, y)).collect()
    }
}
