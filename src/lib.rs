//! A library for finding placements of electronic components on grid-based
//! prototyping boards (e.g. stripboard) that satisfy a net list.
//!
//! # The shape of a run
//!
//! - [var] and [wff] \
//!   Propositional primitives (atoms, clauses, CNF expressions) and a small
//!   well-formed-formula algebra with a polarity-aware Tseitin `to_cnf`
//!   rewriter.
//! - [cardinality] \
//!   At-most-one (commander encoding) and at-most-k (sequential/LTseq)
//!   cardinality constraints built on top of [wff].
//! - [solver] \
//!   A uniform adapter over an embedded CDCL library and an external
//!   DIMACS-speaking process, plus a blocking-clause `iter_solve` loop.
//! - [geometry] \
//!   Read-only contracts (`Board`, `Component`, `Terminal`, `Position`,
//!   `Net`) supplied by an external geometry library. A small worked
//!   fixture lives in [demo].
//! - [encoder] \
//!   Builds the full constraint system for a placement problem (component
//!   exclusion, net connectivity via the unary-distance reachability
//!   encoding, drilling and jumper options) and decodes solver models.
//! - [placement] \
//!   The `Placement` output type and the lazy enumeration loop.
//!
//! # Design
//! - The encoder is built once per run and discarded; nothing survives
//!   between placement problems (see [config] and the per-run state
//!   machine documented in the [encoder] module docs).
//! - The SAT solver itself is treated as a replaceable backend behind
//!   [solver::Adapter]; the encoder never depends on a particular solver's
//!   internals.
//!
//! Private items are documented.

#![allow(clippy::too_many_arguments)]
#![allow(clippy::collapsible_else_if)]

pub mod cardinality;
pub mod config;
pub mod demo;
pub mod encoder;
pub mod errors;
pub mod geometry;
pub mod misc;
pub mod placement;
pub mod solver;
pub mod var;
pub mod wff;
