//! Board/component geometry contracts.
//!
//! Everything in this module is a read-only description of physical
//! layout, supplied by a geometry library external to this crate (see the
//! module docs on [crate] for where the boundary sits). The encoder never
//! constructs a [Board] or a [Component] itself --- it only reads them --- so
//! the types here are plain data plus one trait, [Component], standing in
//! for "ask the geometry library where this part can go".
//!
//! A small worked fixture implementing [Component] lives in [crate::demo],
//! used by the CLI and by the integration tests.

use std::collections::BTreeSet;

use crate::errors;

/// An integer board coordinate. Used both for holes (connection points) and
/// for cells (physical space).
pub type Hole = (i64, i64);

/// A board of holes, the spaces components may occupy, and the fixed
/// traces connecting holes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    holes: BTreeSet<Hole>,
    spaces: BTreeSet<Hole>,
    traces: BTreeSet<(Hole, Hole)>,
}

impl Board {
    /// Builds a board, checking that every trace names two holes that are
    /// actually in `holes`.
    pub fn new(
        holes: impl IntoIterator<Item = Hole>,
        spaces: impl IntoIterator<Item = Hole>,
        traces: impl IntoIterator<Item = (Hole, Hole)>,
    ) -> Result<Board, errors::Geometry> {
        let holes: BTreeSet<Hole> = holes.into_iter().collect();
        let spaces: BTreeSet<Hole> = spaces.into_iter().collect();
        let traces: BTreeSet<(Hole, Hole)> = traces
            .into_iter()
            .map(|(a, b)| if a <= b { (a, b) } else { (b, a) })
            .collect();

        for &(a, b) in &traces {
            if !holes.contains(&a) {
                return Err(errors::Geometry::TraceOffBoard { hole: a });
            }
            if !holes.contains(&b) {
                return Err(errors::Geometry::TraceOffBoard { hole: b });
            }
        }

        Ok(Board {
            holes,
            spaces,
            traces,
        })
    }

    /// A stripboard: holes in a grid, each row fully traced together.
    ///
    /// `width` and `height` are in holes; `spaces` defaults to the same
    /// grid of cells, since a stripboard's physical footprint matches its
    /// hole grid one-for-one.
    pub fn stripboard(width: i64, height: i64) -> Result<Board, errors::Geometry> {
        let holes: Vec<Hole> = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .collect();
        let traces: Vec<(Hole, Hole)> = (0..height)
            .flat_map(|y| (0..width - 1).map(move |x| ((x, y), (x + 1, y))))
            .collect();
        Board::new(holes.clone(), holes, traces)
    }

    pub fn holes(&self) -> impl Iterator<Item = Hole> + '_ {
        self.holes.iter().copied()
    }

    pub fn spaces(&self) -> impl Iterator<Item = Hole> + '_ {
        self.spaces.iter().copied()
    }

    /// Every trace, as a canonicalized `(lesser, greater)` pair of holes.
    pub fn traces(&self) -> impl Iterator<Item = (Hole, Hole)> + '_ {
        self.traces.iter().copied()
    }

    pub fn has_hole(&self, hole: Hole) -> bool {
        self.holes.contains(&hole)
    }

    pub fn has_space(&self, cell: Hole) -> bool {
        self.spaces.contains(&cell)
    }

    pub fn hole_count(&self) -> usize {
        self.holes.len()
    }
}

/// A labeled endpoint of a [Component].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Terminal {
    pub label: String,
}

impl Terminal {
    pub fn new(label: impl Into<String>) -> Terminal {
        Terminal {
            label: label.into(),
        }
    }
}

/// The position of a `terminal` within whatever collection of components
/// an encoding run is working with.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct TerminalId {
    pub component: usize,
    pub terminal: usize,
}

/// One way a [Component] can be placed on a [Board]: the cells it covers,
/// and the hole each of its terminals lands on.
///
/// Value-equal by `(occupies, terminal_positions)`, per the data model:
/// within one encoding run a component's positions are canonicalized once,
/// so identity and value equality coincide in practice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub occupies: BTreeSet<Hole>,
    /// Indexed the same way as the owning component's `terminals()`.
    pub terminal_positions: Vec<Hole>,
}

impl Position {
    pub fn new(occupies: impl IntoIterator<Item = Hole>, terminal_positions: Vec<Hole>) -> Position {
        Position {
            occupies: occupies.into_iter().collect(),
            terminal_positions,
        }
    }

    pub fn terminal_hole(&self, terminal: usize) -> Option<Hole> {
        self.terminal_positions.get(terminal).copied()
    }
}

/// A physical part: a label, a fixed sequence of terminals, a render
/// color, and a rule enumerating where it may legally sit on a board.
///
/// Implementations are expected to return positions already filtered so
/// every terminal lands in `board.holes()` and every occupied cell lies in
/// `board.spaces()` --- the encoder does not re-check this, per the
/// geometry contract.
pub trait Component {
    fn label(&self) -> &str;
    fn terminals(&self) -> &[Terminal];
    fn color(&self) -> &str;
    fn positions(&self, board: &Board) -> Vec<Position>;
}

/// An ordered group of terminals that must end up mutually connected. The
/// first terminal is the *head*, used as the representative in the
/// encoder's connectivity constraints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Net {
    terminals: Vec<TerminalId>,
}

impl Net {
    pub fn new(terminals: impl IntoIterator<Item = TerminalId>) -> Net {
        Net {
            terminals: terminals.into_iter().collect(),
        }
    }

    pub fn head(&self) -> TerminalId {
        self.terminals[0]
    }

    pub fn terminals(&self) -> &[TerminalId] {
        &self.terminals
    }
}

/// A potentially-present conductive edge between two holes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// A fixed board trace, conductive unless one endpoint is drilled.
    Trace,
    /// A user-installable straight wire, chosen by the solver.
    Jumper,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Link {
    pub kind: LinkKind,
    pub ends: (Hole, Hole),
}
