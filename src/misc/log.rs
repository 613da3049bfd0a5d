//! Miscellaneous items related to [logging](log).
//!
//! Calls to the `log` macros are made throughout the crate, targeted at the
//! string constants below. These are intended to help someone extending the
//! crate (or diagnosing a bad encoding) filter for the stage they care
//! about.
//!
//! No logging implementation is provided. A consumer (e.g. the CLI) installs
//! one --- see [log] for details.

/// Targets to be used within a [log] macro.
pub mod targets {
    pub const WFF: &str = "wff";
    pub const CNF: &str = "cnf";
    pub const CARDINALITY: &str = "cardinality";
    pub const ENCODER: &str = "encoder";
    pub const SOLVER: &str = "solver";
    pub const ENUMERATE: &str = "enumerate";
}
