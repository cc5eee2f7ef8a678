//! Command-line surface. A `clap`-derived parser over the two entry points
//! the engine actually exposes at the top (`safety`, `simulate`), wired
//! against the crate's own built-in demo transition systems (`src/demos/`)
//! rather than a hardware-description front-end, since parsing an HTS from a
//! file format is explicitly out of scope (§1).

use clap::{Arg, ArgAction, Command};

pub fn build_cli() -> Command {
	Command::new("symbmc")
		.version("0.1.0")
		.about("Bounded model checker for symbolic transition systems")
		.subcommand(
			Command::new("check")
				.about("Check a safety/invariant property against a demo system")
				.arg(
					Arg::new("system")
						.short('s')
						.long("system")
						.value_name("NAME")
						.help("Demo system to check: toggle | counter")
						.default_value("toggle"),
				)
				.arg(
					Arg::new("strategy")
						.long("strategy")
						.value_name("STRATEGY")
						.help("FWD | BWD | ZZ")
						.default_value("FWD"),
				)
				.arg(
					Arg::new("k")
						.short('k')
						.long("bound")
						.value_name("K")
						.help("Maximum unrolling depth")
						.default_value("10"),
				)
				.arg(
					Arg::new("k_min")
						.long("k-min")
						.value_name("K_MIN")
						.help("Minimum depth before checking SAT")
						.default_value("0"),
				)
				.arg(
					Arg::new("non_incremental")
						.long("non-incremental")
						.help("Use the non-incremental forward search (§4.8)")
						.action(ArgAction::SetTrue),
				)
				.arg(
					Arg::new("prove")
						.long("prove")
						.help("Run the k-induction prover alongside forward search")
						.action(ArgAction::SetTrue),
				)
				.arg(
					Arg::new("simplify")
						.long("simplify")
						.help("Simplify init/trans/invar before the search loop")
						.action(ArgAction::SetTrue),
				)
				.arg(
					Arg::new("full_trace")
						.long("full-trace")
						.help("Print every variable in every frame, not just changed ones")
						.action(ArgAction::SetTrue),
				)
				.arg(
					Arg::new("vcd")
						.long("vcd")
						.value_name("FILE")
						.help("Write a VCD trace to FILE on a counterexample"),
				)
				.arg(
					Arg::new("smt2file")
						.long("smt2file")
						.value_name("FILE")
						.help("Write the main solver's SMT-LIB trace to FILE"),
				),
		)
		.subcommand(
			Command::new("simulate")
				.about("Simulate a demo system, searching for a length-k witness trace")
				.arg(
					Arg::new("system")
						.short('s')
						.long("system")
						.value_name("NAME")
						.help("Demo system to simulate: toggle | counter")
						.default_value("toggle"),
				)
				.arg(
					Arg::new("strategy")
						.long("strategy")
						.value_name("STRATEGY")
						.help("FWD | NU")
						.default_value("FWD"),
				)
				.arg(
					Arg::new("k")
						.short('k')
						.long("length")
						.value_name("K")
						.help("Witness trace length")
						.default_value("5"),
				)
				.arg(
					Arg::new("full_trace")
						.long("full-trace")
						.action(ArgAction::SetTrue),
				),
		)
		.subcommand(
			Command::new("fsm-check")
				.about("Determinism check: compare a demo system against a copy of itself")
				.arg(
					Arg::new("system")
						.short('s')
						.long("system")
						.value_name("NAME")
						.default_value("toggle"),
				),
		)
}
