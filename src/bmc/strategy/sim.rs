//! No-unroll step simulation (§4.9): advances one concrete transition at a
//! time instead of building a growing SMT formula, re-seeding each step's
//! initial-state constraint from the previous step's model. Grounded on
//! `BMC.sim_no_unroll`.

use std::collections::HashMap;

use crate::bmc::remap::TraceModel;
use crate::bmc::solver::{CheckResult, SolverFacade};
use crate::bmc::strategy::SearchInputs;
use crate::bmc::term::{self, Formula};
use crate::bmc::unroller::unroll;
use crate::error::BmcResult;
use crate::message;
use crate::ts::names;

/// What a step-at-a-time simulation concluded.
#[derive(Debug, Clone)]
pub enum SimOutcome {
	/// No state satisfies `init ∧ invar` at all.
	NoInitialState,
	/// The system deadlocked (no successor state) before reaching `k` steps.
	Deadlocked { at: u32, trace: TraceModel },
	/// `cover` became satisfiable at the given step.
	CoverReached { at: u32, trace: TraceModel },
	/// Walked the full `k` steps without reaching `cover` (or `cover` is
	/// trivially true and this is simply "reached the horizon").
	Completed { trace: TraceModel },
}

/// `all_vars`: when true, every HTS variable is read back into the witness
/// model each step (the default); when false, only `state_vars ∪ inputs ∪
/// outputs` (`inputs.state_vars`, which the caller already restricts to that
/// union) is tracked — a cheaper trace for systems with a lot of purely
/// internal wiring that the caller doesn't care to see.
pub fn sim_no_unroll<'ctx>(
	inputs: &SearchInputs<'_, 'ctx>,
	solver: &mut SolverFacade<'ctx>,
	cover: &Formula<'ctx>,
	k: u32,
	incremental: bool,
	all_vars: bool,
) -> BmcResult<SimOutcome> {
	let ctx = inputs.ctx;
	let ti = inputs.ti;
	let vars = if all_vars { inputs.vars } else { inputs.state_vars };
	let want_cover = !cover.is_true_literal();

	let init_0 = ti.at_time(inputs.init, 0);
	let invar_0 = ti.at_time(inputs.invar, 0);
	let trans_01 = unroll(ti, ctx, inputs.trans, inputs.invar, 1, 0);
	let cover_1 = ti.at_time(cover, 1);

	let names_0: Vec<String> = vars
		.iter()
		.map(|v| names::get_timed_name(&v.name, 0))
		.collect();
	let names_1: Vec<String> = vars
		.iter()
		.map(|v| names::get_timed_name(&v.name, 1))
		.collect();

	let mut full_model = TraceModel::new();

	solver.reset()?;
	let seed = Formula::and(ctx, &[&init_0, &invar_0]);
	solver.assert(&seed, inputs.sorts)?;
	message!("solving for k=0");
	if solver.check() != CheckResult::Sat {
		return Ok(SimOutcome::NoInitialState);
	}
	let mut values = solver.get_model_values(&names_0, inputs.sorts)?;
	for (name, value) in &values {
		full_model.insert(name.clone(), value.to_string());
	}

	solver.reset()?;
	if incremental {
		solver.assert(&trans_01, inputs.sorts)?;
		solver.assert(&invar_0, inputs.sorts)?;
	}

	for t in 1..=k {
		message!("solving for k={}", t);

		if !incremental {
			solver.reset()?;
			solver.assert(&trans_01, inputs.sorts)?;
		} else {
			solver.push()?;
		}

		let pins: Vec<Formula<'ctx>> = vars
			.iter()
			.filter_map(|v| {
				let at_0 = names::get_timed_name(&v.name, 0);
				values
					.get(&at_0)
					.map(|val| term::var_eq_value(ctx, &at_0, &v.sort, val))
			})
			.collect();
		let pin_refs: Vec<&Formula<'ctx>> = pins.iter().collect();
		let pinned = Formula::and(ctx, &pin_refs);
		solver.assert(&pinned, inputs.sorts)?;

		if solver.check() != CheckResult::Sat {
			return Ok(SimOutcome::Deadlocked {
				at: t - 1,
				trace: full_model,
			});
		}

		values = solver.get_model_values(&names_1, inputs.sorts)?;
		for v in vars {
			let at_1 = names::get_timed_name(&v.name, 1);
			if let Some(val) = values.get(&at_1) {
				full_model.insert(names::get_timed_name(&v.name, t as i64), val.to_string());
			}
		}
		// Re-key the frame-1 values to frame-0 names so the next iteration's
		// pin lookup (`at_0`) finds them.
		values = rekey_to_frame_zero(values, vars);

		if want_cover {
			let pins_1: Vec<Formula<'ctx>> = vars
				.iter()
				.filter_map(|v| {
					let at_1 = names::get_timed_name(&v.name, 1);
					values
						.get(&names::get_timed_name(&v.name, 0))
						.map(|val| term::var_eq_value(ctx, &at_1, &v.sort, val))
				})
				.collect();
			let refs: Vec<&Formula<'ctx>> = pins_1.iter().collect();
			let pinned_1 = Formula::and(ctx, &refs);
			solver.assert(&pinned_1, inputs.sorts)?;
			solver.assert(&cover_1, inputs.sorts)?;

			if solver.check() == CheckResult::Sat {
				return Ok(SimOutcome::CoverReached {
					at: t,
					trace: full_model,
				});
			}
		}

		if incremental {
			solver.pop()?;
		}
	}

	Ok(SimOutcome::Completed { trace: full_model })
}

fn rekey_to_frame_zero<'ctx>(
	values: HashMap<String, z3::ast::Dynamic<'ctx>>,
	vars: &[crate::ts::Var],
) -> HashMap<String, z3::ast::Dynamic<'ctx>> {
	let mut out = HashMap::new();
	for v in vars {
		let at_1 = names::get_timed_name(&v.name, 1);
		if let Some(val) = values.get(&at_1) {
			out.insert(names::get_timed_name(&v.name, 0), val.clone());
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::bmc::timing::TimeIndexer;
	use crate::config::BmcConfig;
	use crate::demos::toggle;
	use z3::{Config, Context};

	/// Scenario 6 of the specification, specialized to the toggle demo:
	/// `init: b=false`, `trans: b'=!b`, cover `b=true` should be reached at
	/// step 1 with a full model recording `b@0=false, b@1=true`.
	#[test]
	fn cover_is_reached_at_the_first_toggled_step() {
		let cfg = Config::new();
		let ctx = Context::new(&cfg);
		let hts = toggle::build(&ctx);
		let vars = hts.vars();
		let state_vars = vars.clone();

		let ti = TimeIndexer::init(&ctx, &vars, 1, false);
		let sorts = ti.sorts().clone();
		let init = hts.single_init(&ctx);
		let trans = hts.single_trans(&ctx);
		let invar = hts.single_invar(&ctx);
		let cover = toggle::always_not_b(&ctx);
		let cover = Formula::not(&ctx, &cover); // b=true

		let config = BmcConfig::default();
		let mut solver = SolverFacade::new(&ctx, &config);
		let inputs = SearchInputs {
			ti: &ti,
			ctx: &ctx,
			init: &init,
			trans: &trans,
			invar: &invar,
			vars: &vars,
			state_vars: &state_vars,
			sorts: &sorts,
		};

		let outcome = sim_no_unroll(&inputs, &mut solver, &cover, 4, true, true).unwrap();
		match outcome {
			SimOutcome::CoverReached { at, trace } => {
				assert_eq!(at, 1);
				assert_eq!(trace.get("b@0"), Some(&"false".to_string()));
				assert_eq!(trace.get("b@1"), Some(&"true".to_string()));
			}
			other => panic!("expected CoverReached, got {other:?}"),
		}
	}

	#[test]
	fn no_initial_state_when_init_is_unsatisfiable() {
		let cfg = Config::new();
		let ctx = Context::new(&cfg);
		let hts = toggle::build(&ctx);
		let vars = hts.vars();
		let state_vars = vars.clone();

		let ti = TimeIndexer::init(&ctx, &vars, 1, false);
		let sorts = ti.sorts().clone();
		let true_init = Formula::tru(&ctx);
		let unsat_init = Formula::not(&ctx, &true_init); // FALSE
		let trans = hts.single_trans(&ctx);
		let invar = hts.single_invar(&ctx);
		let cover = Formula::tru(&ctx);

		let config = BmcConfig::default();
		let mut solver = SolverFacade::new(&ctx, &config);
		let inputs = SearchInputs {
			ti: &ti,
			ctx: &ctx,
			init: &unsat_init,
			trans: &trans,
			invar: &invar,
			vars: &vars,
			state_vars: &state_vars,
			sorts: &sorts,
		};

		let outcome = sim_no_unroll(&inputs, &mut solver, &cover, 4, true, true).unwrap();
		assert!(matches!(outcome, SimOutcome::NoInitialState));
	}
}
