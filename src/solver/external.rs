//! An adapter over an external DIMACS-speaking process.
//!
//! Writes a `p cnf V C` preamble followed by one `0`-terminated clause per
//! line, closes stdin, then reads `s SATISFIABLE`/`s UNSATISFIABLE` and `v
//! ...` lines back. Mirrors the subprocess protocol real DIMACS solvers
//! (MiniSat, Lingeling, CaDiCaL's own CLI) all speak.

use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use log::trace;

use crate::errors;
use crate::misc::log::targets;

use super::{Adapter, Dimacs, Literal, Model, Outcome};

/// The path to the external solver binary may be overridden by this
/// environment variable; absent, [External::DEFAULT_BINARY] is looked up
/// on `PATH`.
pub const ENV_VAR: &str = "GRIDSAT_SOLVER_PATH";

/// The external solver name if nothing else is configured.
pub const DEFAULT_BINARY: &str = "minisat";

pub struct External {
    binary: PathBuf,
}

impl External {
    /// Resolves the binary from `GRIDSAT_SOLVER_PATH`, falling back to
    /// [DEFAULT_BINARY].
    pub fn new() -> External {
        let binary = std::env::var_os(ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BINARY));
        External { binary }
    }

    pub fn with_binary(binary: impl Into<PathBuf>) -> External {
        External {
            binary: binary.into(),
        }
    }
}

impl Default for External {
    fn default() -> Self {
        External::new()
    }
}

impl Adapter for External {
    fn solve(&mut self, dimacs: &Dimacs) -> Result<Outcome, errors::Solver> {
        trace!(
            target: targets::SOLVER,
            "spawning '{}' with {} clauses over {} vars",
            self.binary.display(),
            dimacs.clauses.len(),
            dimacs.num_vars,
        );
        let mut child = Command::new(&self.binary)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| {
                errors::Solver::Protocol(format!(
                    "failed to spawn solver '{}': {e}",
                    self.binary.display()
                ))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .expect("child spawned with a piped stdin");
        write_dimacs(&mut stdin, dimacs)
            .map_err(|e| errors::Solver::Protocol(format!("writing to solver stdin: {e}")))?;
        drop(stdin);

        let stdout = child
            .stdout
            .take()
            .expect("child spawned with a piped stdout");
        let outcome = read_response(BufReader::new(stdout));

        let _ = child.wait();
        outcome
    }
}

fn write_dimacs(out: &mut impl Write, dimacs: &Dimacs) -> std::io::Result<()> {
    writeln!(out, "p cnf {} {}", dimacs.num_vars, dimacs.clauses.len())?;
    for clause in &dimacs.clauses {
        for lit in clause {
            write!(out, "{lit} ")?;
        }
        writeln!(out, "0")?;
    }
    Ok(())
}

fn read_response(reader: impl BufRead) -> Result<Outcome, errors::Solver> {
    let mut model = Vec::new();

    for line in reader.lines() {
        let line = line.map_err(|e| errors::Solver::Protocol(e.to_string()))?;

        if line.starts_with("s UNSATISFIABLE") {
            return Ok(Outcome::Unsat);
        }
        if line.starts_with("s SATISFIABLE") {
            continue;
        }
        if let Some(rest) = line.strip_prefix("v ") {
            for token in rest.split_whitespace() {
                let lit: Literal = token
                    .parse()
                    .map_err(|_| errors::Solver::Protocol(format!("non-integer literal '{token}'")))?;
                if lit == 0 {
                    return Ok(Outcome::Sat(Model(model)));
                }
                model.push(lit);
            }
        }
    }

    Ok(Outcome::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_satisfiable_response() {
        let response = "c comment\ns SATISFIABLE\nv 1 -2 3 0\n";
        let outcome = read_response(Cursor::new(response.as_bytes())).unwrap();
        assert_eq!(outcome, Outcome::Sat(Model(vec![1, -2, 3])));
    }

    #[test]
    fn parses_unsatisfiable_response() {
        let response = "s UNSATISFIABLE\n";
        let outcome = read_response(Cursor::new(response.as_bytes())).unwrap();
        assert_eq!(outcome, Outcome::Unsat);
    }

    #[test]
    fn no_recognised_line_is_unknown() {
        let response = "c nothing useful here\n";
        let outcome = read_response(Cursor::new(response.as_bytes())).unwrap();
        assert_eq!(outcome, Outcome::Unknown);
    }

    #[test]
    #[cfg(unix)]
    fn external_adapter_round_trips_through_a_stub_solver() {
        use std::io::Write as _;
        use std::os::unix::fs::PermissionsExt;

        let mut script = tempfile::NamedTempFile::new().unwrap();
        writeln!(script, "#!/bin/sh").unwrap();
        writeln!(script, "cat >/dev/null").unwrap();
        writeln!(script, "echo 's SATISFIABLE'").unwrap();
        writeln!(script, "echo 'v 1 -2 0'").unwrap();
        let mut perms = script.as_file().metadata().unwrap().permissions();
        perms.set_mode(0o755);
        script.as_file().set_permissions(perms).unwrap();

        let mut adapter = External::with_binary(script.path());
        let dimacs = Dimacs {
            num_vars: 2,
            clauses: vec![vec![1, -2]],
        };
        let outcome = adapter.solve(&dimacs).unwrap();
        assert_eq!(outcome, Outcome::Sat(Model(vec![1, -2])));
    }

    #[test]
    #[cfg(unix)]
    fn external_adapter_reports_unsat_through_a_stub_solver() {
        use std::io::Write as _;
        use std::os::unix::fs::PermissionsExt;

        let mut script = tempfile::NamedTempFile::new().unwrap();
        writeln!(script, "#!/bin/sh").unwrap();
        writeln!(script, "cat >/dev/null").unwrap();
        writeln!(script, "echo 's UNSATISFIABLE'").unwrap();
        let mut perms = script.as_file().metadata().unwrap().permissions();
        perms.set_mode(0o755);
        script.as_file().set_permissions(perms).unwrap();

        let mut adapter = External::with_binary(script.path());
        let dimacs = Dimacs {
            num_vars: 2,
            clauses: vec![vec![1, 2], vec![-1, -2], vec![1, -2], vec![-1, 2]],
        };
        let outcome = adapter.solve(&dimacs).unwrap();
        assert_eq!(outcome, Outcome::Unsat);
    }

    #[test]
    fn dimacs_header_and_clauses_are_well_formed() {
        let dimacs = Dimacs {
            num_vars: 2,
            clauses: vec![vec![1, -2], vec![-1]],
        };
        let mut buf = Vec::new();
        write_dimacs(&mut buf, &dimacs).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "p cnf 2 2\n1 -2 0\n-1 0\n");
    }
}
