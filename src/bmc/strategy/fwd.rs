//! Non-incremental forward search (§4.8): re-asserts the whole unrolling
//! from scratch at each candidate `k` rather than growing it incrementally.
//! Used when `config.incremental` is off. Grounded on `BMC.solve_fwd`.

use crate::bmc::solver::{CheckResult, SolverFacade};
use crate::bmc::strategy::{SearchInputs, SearchOutcome};
use crate::bmc::term::Formula;
use crate::bmc::unroller::unroll;
use crate::error::BmcResult;
use crate::message;
use crate::ts::names;

fn relevant_names(vars: &[crate::ts::Var], upto: u32) -> Vec<String> {
	let mut out = Vec::new();
	for v in vars {
		for t in 0..=upto {
			out.push(names::get_timed_name(&v.name, t as i64));
		}
	}
	out
}

/// `shortest`: when true, searches `k = 0, 1, ..., horizon`; when false,
/// jumps straight to `k = horizon` (used by `simulate` on a trivial `true`
/// property, where any single frame at the horizon suffices).
pub fn solve_fwd<'ctx>(
	inputs: &SearchInputs<'_, 'ctx>,
	solver: &mut SolverFacade<'ctx>,
	prop: &Formula<'ctx>,
	horizon: u32,
	shortest: bool,
) -> BmcResult<SearchOutcome> {
	let ctx = inputs.ctx;
	let ti = inputs.ti;
	let not_prop = Formula::not(ctx, prop);

	let mut t = if shortest { 0 } else { horizon };
	while t < horizon + 1 {
		solver.reset()?;

		let init_and_invar = Formula::and(ctx, &[inputs.init, inputs.invar]);
		let at0 = ti.at_time(&init_and_invar, 0);
		solver.assert(&at0, inputs.sorts)?;

		let trans_t = unroll(ti, ctx, inputs.trans, inputs.invar, t as i64, 0);
		solver.assert(&trans_t, inputs.sorts)?;

		let propt = ti.at_time(&not_prop, t);
		solver.assert(&propt, inputs.sorts)?;

		message!("solving for k={}", t);
		if solver.check() == CheckResult::Sat {
			let model = solver.get_model(&relevant_names(inputs.vars, t), inputs.sorts)?;
			return Ok(SearchOutcome::CounterExample { k: t, model });
		}

		t += 1;
	}

	Ok(SearchOutcome::NotFound)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::bmc::timing::TimeIndexer;
	use crate::config::BmcConfig;
	use crate::demos::toggle;
	use z3::{Config, Context};

	/// Scenario 2 of the specification: the toggle demo with `trans: b' =
	/// !b` and property `always !b` must fail exactly at `t=1`.
	#[test]
	fn finds_counterexample_at_the_first_toggled_frame() {
		let cfg = Config::new();
		let ctx = Context::new(&cfg);
		let hts = toggle::build(&ctx);
		let prop = toggle::always_not_b(&ctx);
		let vars = hts.vars();

		let ti = TimeIndexer::init(&ctx, &vars, 3, false);
		let sorts = ti.sorts().clone();
		let init = hts.single_init(&ctx);
		let trans = hts.single_trans(&ctx);
		let invar = hts.single_invar(&ctx);
		let config = BmcConfig::default();
		let mut solver = SolverFacade::new(&ctx, &config);
		let inputs = SearchInputs {
			ti: &ti,
			ctx: &ctx,
			init: &init,
			trans: &trans,
			invar: &invar,
			vars: &vars,
			state_vars: &vars,
			sorts: &sorts,
		};

		match solve_fwd(&inputs, &mut solver, &prop, 3, true).unwrap() {
			SearchOutcome::CounterExample { k, model } => {
				assert_eq!(k, 1);
				assert_eq!(model.get("b@0"), Some(&"false".to_string()));
				assert_eq!(model.get("b@1"), Some(&"true".to_string()));
			}
			other => panic!("expected a counterexample, got {other:?}"),
		}
	}

	#[test]
	fn shortest_false_checks_only_the_final_frame() {
		let cfg = Config::new();
		let ctx = Context::new(&cfg);
		let hts = toggle::build(&ctx);
		let prop = toggle::always_not_b(&ctx);
		let vars = hts.vars();

		let ti = TimeIndexer::init(&ctx, &vars, 2, false);
		let sorts = ti.sorts().clone();
		let init = hts.single_init(&ctx);
		let trans = hts.single_trans(&ctx);
		let invar = hts.single_invar(&ctx);
		let config = BmcConfig::default();
		let mut solver = SolverFacade::new(&ctx, &config);
		let inputs = SearchInputs {
			ti: &ti,
			ctx: &ctx,
			init: &init,
			trans: &trans,
			invar: &invar,
			vars: &vars,
			state_vars: &vars,
			sorts: &sorts,
		};

		// horizon=2, shortest=false: only k=2 is tried, and b is true there too.
		match solve_fwd(&inputs, &mut solver, &prop, 2, false).unwrap() {
			SearchOutcome::CounterExample { k, .. } => assert_eq!(k, 2),
			other => panic!("expected a counterexample, got {other:?}"),
		}
	}
}
