//! Error taxonomy.
//!
//! Names of the error enums --- for the most part --- overlap with their
//! corresponding modules, so the intended use is to namespace errors via the
//! module path, e.g. `errors::Config::NegativeMaxDrilled`.
//!
//! Every stage-specific enum below converts into the top-level [Error] via
//! `From`, so `?` composes across module boundaries without pulling in a
//! blanket error-handling crate.

use std::fmt;

/// Invalid [EncodeOptions](crate::config::EncodeOptions); raised before any
/// [Var](crate::var::Var) is allocated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Config {
    /// `max_jumpers` was negative.
    NegativeMaxJumpers,
    /// `max_drilled` was negative.
    NegativeMaxDrilled,
    /// `max_jumper_length` was negative.
    NegativeMaxJumperLength,
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeMaxJumpers => write!(f, "max_jumpers must not be negative"),
            Self::NegativeMaxDrilled => write!(f, "max_drilled must not be negative"),
            Self::NegativeMaxJumperLength => {
                write!(f, "max_jumper_length must not be negative")
            }
        }
    }
}

/// A component declared a position whose terminals or occupied cells land
/// off the board; surfaced by the geometry adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Geometry {
    /// A position occupies a cell outside `board.spaces`.
    CellOffBoard {
        component: String,
        cell: (i64, i64),
    },
    /// A position places a terminal on a hole outside `board.holes`.
    TerminalOffBoard {
        component: String,
        terminal: String,
        hole: (i64, i64),
    },
    /// A trace names a hole that is not in `board.holes`.
    TraceOffBoard { hole: (i64, i64) },
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CellOffBoard { component, cell } => {
                write!(f, "component '{component}' occupies {cell:?}, which is not a board space")
            }
            Self::TerminalOffBoard {
                component,
                terminal,
                hole,
            } => write!(
                f,
                "component '{component}' terminal '{terminal}' lands on {hole:?}, which is not a board hole"
            ),
            Self::TraceOffBoard { hole } => {
                write!(f, "trace references {hole:?}, which is not a board hole")
            }
        }
    }
}

/// A terminal is missing from the net list, or appears in more than one net.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Net {
    /// A terminal does not appear in any net.
    Unassigned { component: String, terminal: String },
    /// A terminal appears in two or more nets.
    Duplicated { component: String, terminal: String },
}

impl fmt::Display for Net {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unassigned { component, terminal } => {
                write!(f, "terminal '{component}.{terminal}' appears in no net")
            }
            Self::Duplicated { component, terminal } => {
                write!(f, "terminal '{component}.{terminal}' appears in more than one net")
            }
        }
    }
}

/// A post-solve sanity check failed; indicates a bug in the encoder or the
/// solver backend, never in the input problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncoderInvariant {
    /// The model did not select exactly one position per component.
    PlacementCount { expected: usize, found: usize },
}

impl fmt::Display for EncoderInvariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlacementCount { expected, found } => write!(
                f,
                "model assigned {found} component placements, expected {expected}"
            ),
        }
    }
}

/// Errors surfaced by a [solver adapter](crate::solver).
///
/// `Unsatisfiable` is deliberately absent: it ends enumeration cleanly and
/// is never surfaced to the caller as a failure (see
/// [solver::Outcome](crate::solver::Outcome)).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Solver {
    /// The backend gave up: a timeout, or output the adapter does not
    /// understand.
    Unknown,
    /// The external-process adapter received a response that does not
    /// follow the documented DIMACS protocol.
    Protocol(String),
}

impl fmt::Display for Solver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "solver backend returned an unknown outcome"),
            Self::Protocol(detail) => write!(f, "malformed solver response: {detail}"),
        }
    }
}

/// Aggregate error for a placement run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Config(Config),
    Geometry(Geometry),
    Net(Net),
    Encoder(EncoderInvariant),
    Solver(Solver),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "{e}"),
            Self::Geometry(e) => write!(f, "{e}"),
            Self::Net(e) => write!(f, "{e}"),
            Self::Encoder(e) => write!(f, "{e}"),
            Self::Solver(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<Config> for Error {
    fn from(value: Config) -> Self {
        Self::Config(value)
    }
}

impl From<Geometry> for Error {
    fn from(value: Geometry) -> Self {
        Self::Geometry(value)
    }
}

impl From<Net> for Error {
    fn from(value: Net) -> Self {
        Self::Net(value)
    }
}

impl From<EncoderInvariant> for Error {
    fn from(value: EncoderInvariant) -> Self {
        Self::Encoder(value)
    }
}

impl From<Solver> for Error {
    fn from(value: Solver) -> Self {
        Self::Solver(value)
    }
}
