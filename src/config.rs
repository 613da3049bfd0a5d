//! Options controlling a single placement-encoding run.
//!
//! Mirrors the shape of a solver `Config`: a plain struct of options plus a
//! `defaults` module of named constants, validated eagerly so a bad option
//! is reported as a [crate::errors::Config] before any [crate::var::Var] is
//! allocated.

use crate::errors;

/// Named defaults, kept alongside [EncodeOptions] the way a solver's tuning
/// knobs are kept alongside its `Config`.
pub mod defaults {
    pub const ALLOW_DRILLED: bool = false;
    pub const MAX_JUMPER_LENGTH: i64 = 0;
}

/// The solver adapter to drive, looked up by name in the
/// [registry](crate::solver::registry).
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum SolverName {
    /// The bundled in-process CDCL library.
    #[default]
    Embedded,
    /// An external DIMACS-speaking process, registered under this name.
    External(String),
}

/// Options for a placement-encoding run.
///
/// Corresponds directly to the `options` record in the placement encoder's
/// contract: `{allow_drilled, max_jumper_length, max_drilled, max_jumpers,
/// solver}`.
#[derive(Clone, Debug)]
pub struct EncodeOptions {
    /// Whether a hole may be drilled out to break a trace's conductivity.
    pub allow_drilled: bool,
    /// The longest jumper wire to consider, in holes. `0` disables jumpers.
    pub max_jumper_length: i64,
    /// An upper bound on the number of drilled holes in any one model, if
    /// any.
    pub max_drilled: Option<i64>,
    /// An upper bound on the number of installed jumpers in any one model,
    /// if any.
    pub max_jumpers: Option<i64>,
    /// Which registered solver adapter to drive.
    pub solver: SolverName,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            allow_drilled: defaults::ALLOW_DRILLED,
            max_jumper_length: defaults::MAX_JUMPER_LENGTH,
            max_drilled: None,
            max_jumpers: None,
            solver: SolverName::default(),
        }
    }
}

impl EncodeOptions {
    /// Checks every numeric option is non-negative, and applies the
    /// `max_jumpers = 0 => max_jumper_length = 0` normalisation from the
    /// encoder's link-enumeration rules.
    pub fn validate(mut self) -> Result<Self, errors::Config> {
        if self.max_jumper_length < 0 {
            return Err(errors::Config::NegativeMaxJumperLength);
        }
        if let Some(max_drilled) = self.max_drilled {
            if max_drilled < 0 {
                return Err(errors::Config::NegativeMaxDrilled);
            }
        }
        if let Some(max_jumpers) = self.max_jumpers {
            if max_jumpers < 0 {
                return Err(errors::Config::NegativeMaxJumpers);
            }
            if max_jumpers == 0 {
                self.max_jumper_length = 0;
            }
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate_cleanly() {
        assert!(EncodeOptions::default().validate().is_ok());
    }

    #[test]
    fn negative_max_jumper_length_rejected() {
        let opts = EncodeOptions {
            max_jumper_length: -1,
            ..EncodeOptions::default()
        };
        assert_eq!(
            opts.validate().unwrap_err(),
            errors::Config::NegativeMaxJumperLength
        );
    }

    #[test]
    fn negative_max_drilled_rejected() {
        let opts = EncodeOptions {
            max_drilled: Some(-1),
            ..EncodeOptions::default()
        };
        assert_eq!(
            opts.validate().unwrap_err(),
            errors::Config::NegativeMaxDrilled
        );
    }

    #[test]
    fn negative_max_jumpers_rejected() {
        let opts = EncodeOptions {
            max_jumpers: Some(-1),
            ..EncodeOptions::default()
        };
        assert_eq!(
            opts.validate().unwrap_err(),
            errors::Config::NegativeMaxJumpers
        );
    }

    #[test]
    fn zero_max_jumpers_forces_zero_jumper_length() {
        let opts = EncodeOptions {
            max_jumpers: Some(0),
            max_jumper_length: 4,
            ..EncodeOptions::default()
        };
        let validated = opts.validate().unwrap();
        assert_eq!(validated.max_jumper_length, 0);
    }
}
