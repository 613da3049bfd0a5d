//! Miscellaneous items not tied to any one stage of an encoding run.

pub mod log;
