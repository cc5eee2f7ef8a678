#![allow(dead_code)]

mod bmc;
mod cli;
mod config;
mod demos;
mod error;
mod logging;
mod trace;
mod ts;

use z3::{Config as Z3Config, Context};

use crate::bmc::engine::{self, Verdict};
use crate::config::{BmcConfig, Strategy};
use crate::ts::Hts;
use crate::{error, error_and_exit, message};

fn parse_strategy(s: &str) -> Option<Strategy> {
	match s.to_ascii_uppercase().as_str() {
		"FWD" => Some(Strategy::Fwd),
		"BWD" => Some(Strategy::Bwd),
		"ZZ" => Some(Strategy::Zz),
		"NU" => Some(Strategy::Nu),
		_ => None,
	}
}

/// Builds one of the crate's two built-in demo systems together with the
/// property it is known to exercise (§A.3/A.4: these double as the concrete
/// scenarios of §8 of the specification).
fn build_demo<'ctx>(ctx: &'ctx Context, name: &str) -> Option<(Hts<'ctx>, bmc::term::Formula<'ctx>)> {
	match name {
		"toggle" => Some((demos::toggle::build(ctx), demos::toggle::always_not_b(ctx))),
		"counter" => Some((demos::counter::build(ctx), demos::counter::never_max(ctx))),
		_ => None,
	}
}

fn run_check(sub_m: &clap::ArgMatches) {
	let system = sub_m.get_one::<String>("system").unwrap();
	let Some(strategy) = sub_m
		.get_one::<String>("strategy")
		.and_then(|s| parse_strategy(s))
	else {
		error_and_exit!("unknown strategy `{}` (expected FWD | BWD | ZZ)", sub_m.get_one::<String>("strategy").unwrap());
	};
	let k: u32 = sub_m
		.get_one::<String>("k")
		.and_then(|s| s.parse().ok())
		.unwrap_or(10);
	let k_min: u32 = sub_m
		.get_one::<String>("k_min")
		.and_then(|s| s.parse().ok())
		.unwrap_or(0);

	let cfg = Z3Config::new();
	let ctx = Context::new(&cfg);
	let Some((hts, prop)) = build_demo(&ctx, system) else {
		error_and_exit!("unknown demo system `{}` (expected toggle | counter)", system);
	};

	let config = BmcConfig {
		strategy,
		incremental: !sub_m.get_flag("non_incremental"),
		prove: sub_m.get_flag("prove"),
		simplify: sub_m.get_flag("simplify"),
		full_trace: sub_m.get_flag("full_trace"),
		smt2file: sub_m.get_one::<String>("smt2file").cloned(),
		vcd_trace: sub_m.get_one::<String>("vcd").is_some(),
		..BmcConfig::default()
	};

	message!("checking system `{}` with strategy {}, k={}, k_min={}", system, strategy.name(), k, k_min);

	match engine::safety(&ctx, &hts, &prop, &config, k, k_min, &[]) {
		Ok(outcome) => report(&hts, &config, outcome, sub_m.get_one::<String>("vcd").cloned()),
		Err(e) => error_and_exit!("{}", e),
	}
}

fn run_simulate(sub_m: &clap::ArgMatches) {
	let system = sub_m.get_one::<String>("system").unwrap();
	let Some(strategy) = sub_m
		.get_one::<String>("strategy")
		.and_then(|s| parse_strategy(s))
	else {
		error_and_exit!("unknown strategy `{}` (expected FWD | NU)", sub_m.get_one::<String>("strategy").unwrap());
	};
	let k: u32 = sub_m
		.get_one::<String>("k")
		.and_then(|s| s.parse().ok())
		.unwrap_or(5);

	let cfg = Z3Config::new();
	let ctx = Context::new(&cfg);
	let Some((hts, _prop)) = build_demo(&ctx, system) else {
		error_and_exit!("unknown demo system `{}` (expected toggle | counter)", system);
	};
	// cover = TRUE: any execution of length k is a witness.
	let cover = bmc::term::Formula::tru(&ctx);
	let config = BmcConfig {
		strategy,
		full_trace: sub_m.get_flag("full_trace"),
		..BmcConfig::default()
	};

	message!("simulating system `{}` with strategy {}, k={}", system, strategy.name(), k);

	match engine::simulate(&ctx, &hts, &cover, &config, k) {
		Ok(outcome) => report(&hts, &config, outcome, None),
		Err(e) => error_and_exit!("{}", e),
	}
}

fn run_fsm_check(sub_m: &clap::ArgMatches) {
	let system = sub_m.get_one::<String>("system").unwrap();
	let cfg = Z3Config::new();
	let ctx = Context::new(&cfg);
	let Some((hts, _prop)) = build_demo(&ctx, system) else {
		error_and_exit!("unknown demo system `{}` (expected toggle | counter)", system);
	};
	let config = BmcConfig::default();

	message!("running determinism (fsm) check on `{}`", system);
	match engine::fsm_check(&ctx, &hts, &config) {
		Ok(outcome) => report(&hts, &config, outcome, None),
		Err(e) => error_and_exit!("{}", e),
	}
}

fn report(hts: &Hts, config: &BmcConfig, outcome: engine::CheckOutcome, vcd_path: Option<String>) {
	match outcome.verdict {
		Verdict::True => message!("VERDICT: TRUE (property holds, k={})", outcome.k),
		Verdict::Unk => message!("VERDICT: UNKNOWN (exhausted horizon)"),
		Verdict::False => message!("VERDICT: FALSE (counterexample at k={})", outcome.k),
	}
	if let Some(model) = &outcome.trace {
		let vars = hts.vars();
		let rendered =
			trace::printer::format_trace(model, &vars, outcome.k.max(0) as u32, !config.full_trace);
		println!("{rendered}");
		if let Some(path) = vcd_path {
			match trace::vcd::render_vcd(model, &vars, outcome.k.max(0) as u32) {
				Ok(vcd) => {
					if let Err(e) = std::fs::write(&path, vcd) {
						error!("failed to write VCD trace to {}: {}", path, e);
					} else {
						message!("wrote VCD trace to {}", path);
					}
				}
				Err(e) => error!("failed to render VCD trace: {}", e),
			}
		}
	}
}

fn main() {
	let matches = cli::build_cli().get_matches();
	match matches.subcommand() {
		Some(("check", sub_m)) => run_check(sub_m),
		Some(("simulate", sub_m)) => run_simulate(sub_m),
		Some(("fsm-check", sub_m)) => run_fsm_check(sub_m),
		_ => {
			error!("No valid subcommand was used. Use --help for more information.");
		}
	}
}
