//! A thin driver over the `gridsat` library: parses arguments, builds an
//! `EncodeOptions`, drives one of the bundled demo scenarios through the
//! placement encoder, and prints the resulting placements.
//!
//! Presentation only --- the actual geometry, constraint compilation, and
//! enumeration all live in the library. Swapping in a real geometry
//! adapter in place of the bundled demo fixture is future work; this
//! binary only ever drives the fixture.

use std::process::ExitCode;

use clap::{value_parser, Arg, Command};

use gridsat::config::{EncodeOptions, SolverName};
use gridsat::demo::{self, LeadedComponent};
use gridsat::geometry::{Board, Component, Net};
use gridsat::placement::{solve_placements, Placement};

fn cli() -> Command {
    Command::new("gridsat")
        .about("Enumerates component placements on a grid prototyping board satisfying a net list")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("scenario")
                .required(false)
                .default_value("three-resistor-loop")
                .value_parser(["three-resistor-loop", "four-resistor-loop", "infeasible-pair"])
                .help("Which bundled demo scenario to enumerate placements for."),
        )
        .arg(
            Arg::new("first_only")
                .long("first-only")
                .num_args(0)
                .help("Stop after the first placement found."),
        )
        .arg(
            Arg::new("allow_drilled")
                .long("allow-drilled")
                .num_args(0)
                .help("Allow holes to be drilled out to break trace conductivity."),
        )
        .arg(
            Arg::new("max_jumper_length")
                .long("max-jumper-length")
                .value_name("N")
                .value_parser(value_parser!(i64))
                .default_value("0")
                .help("The longest jumper wire to consider, in holes. 0 disables jumpers."),
        )
        .arg(
            Arg::new("svg")
                .long("svg")
                .value_name("PATH")
                .num_args(0..=1)
                .help("Render the first placement as SVG (delegated to an external renderer)."),
        )
        .arg(
            Arg::new("solver")
                .long("solver")
                .value_name("NAME")
                .help("Which registered solver adapter to drive. Default: the embedded adapter."),
        )
}

fn scenario(name: &str) -> (Board, Vec<Box<dyn Component>>, Vec<Net>) {
    match name {
        "three-resistor-loop" => demo::three_resistor_loop(),
        "four-resistor-loop" => demo::four_resistor_loop(),
        "infeasible-pair" => demo::infeasible_pair(),
        _ => unreachable!("clap restricts this to the values above"),
    }
}

fn print_placement(components: &[Box<dyn Component>], placement: &Placement) {
    for (idx, component) in components.iter().enumerate() {
        let position = &placement.components[&idx];
        let terminals: Vec<String> = component
            .terminals()
            .iter()
            .enumerate()
            .map(|(t_idx, terminal)| {
                let (x, y) = position.terminal_hole(t_idx).expect("exactly_one constraint guarantees a terminal hole per terminal");
                format!("{}:({x},{y})", terminal.label)
            })
            .collect();
        println!("{}: {}", component.label(), terminals.join(", "));
    }

    let drilled: Vec<String> = placement.drilled.iter().map(|(x, y)| format!("({x},{y})")).collect();
    let jumpers: Vec<String> = placement
        .jumpers
        .iter()
        .map(|((x1, y1), (x2, y2))| format!("({x1},{y1})-({x2},{y2})"))
        .collect();
    println!("Drilled: {{{}}}", drilled.join(", "));
    println!("Jumpers: {{{}}}", jumpers.join(", "));
}

fn main() -> ExitCode {
    env_logger::init();

    let matches = cli().get_matches();

    let scenario_name = matches.get_one::<String>("scenario").unwrap();
    let (board, components, nets) = scenario(scenario_name);

    let solver = match matches.get_one::<String>("solver") {
        Some(name) if name == "embedded" => SolverName::Embedded,
        Some(name) => SolverName::External(name.clone()),
        None => SolverName::Embedded,
    };

    let options = EncodeOptions {
        allow_drilled: matches.get_flag("allow_drilled"),
        max_jumper_length: *matches.get_one::<i64>("max_jumper_length").unwrap(),
        max_drilled: None,
        max_jumpers: None,
        solver,
    };

    let enumerator = match solve_placements(&board, &components, &nets, options) {
        Ok(enumerator) => enumerator,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let first_only = matches.get_flag("first_only");
    let svg = matches.get_one::<String>("svg").map(String::as_str);
    let svg_requested = matches.contains_id("svg");

    let mut count = 0usize;
    for result in enumerator {
        match result {
            Ok(placement) => {
                print_placement(&components, &placement);
                println!();
                count += 1;

                if svg_requested && count == 1 {
                    match svg {
                        Some(path) => println!("SVG rendering of this placement to '{path}' is delegated to an external renderer."),
                        None => println!("SVG rendering of this placement is delegated to an external renderer."),
                    }
                }

                if first_only {
                    break;
                }
            }
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    println!("{count} solutions");
    ExitCode::SUCCESS
}
