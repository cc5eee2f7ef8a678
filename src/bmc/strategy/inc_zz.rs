//! Incremental zig-zag search (§4.7): alternates growing the forward and
//! backward unrollings, joining them at a midpoint state equivalence.
//! Grounded on `BMC.solve_inc_zz`.

use crate::bmc::solver::{CheckResult, SolverFacade};
use crate::bmc::strategy::{SearchInputs, SearchOutcome};
use crate::bmc::term::{self, Formula};
use crate::bmc::unroller::unroll;
use crate::error::{BmcError, BmcResult};
use crate::message;
use crate::ts::names;

fn relevant_names(vars: &[crate::ts::Var], upto: u32) -> Vec<String> {
	let mut out = Vec::new();
	for v in vars {
		for t in 0..=(upto as i64) {
			out.push(names::get_timed_name(&v.name, t));
		}
		for t in -1..=(upto as i64) {
			out.push(names::get_ptimed_name(&v.name, t));
		}
	}
	out
}

pub fn solve_inc_zz<'ctx>(
	inputs: &SearchInputs<'_, 'ctx>,
	solver: &mut SolverFacade<'ctx>,
	prop: &Formula<'ctx>,
	k: u32,
) -> BmcResult<SearchOutcome> {
	let ctx = inputs.ctx;
	let ti = inputs.ti;

	if prop.has_next() {
		return Err(BmcError::Configuration(
			"invariant checking with next-state variables only supports the FWD strategy"
				.to_string(),
		));
	}

	solver.reset()?;

	let init_and_invar = Formula::and(ctx, &[inputs.init, inputs.invar]);
	let initt = ti.at_time(&init_and_invar, 0);
	solver.assert(&initt, inputs.sorts)?;

	let not_prop_and_invar = Formula::and(ctx, &[&Formula::not(ctx, prop), inputs.invar]);
	let propt = ti.at_ptime(&not_prop_and_invar, -1);
	solver.assert(&propt, inputs.sorts)?;

	let mut t: u32 = 0;
	while t < k + 1 {
		solver.push()?;
		let even = t % 2 == 0;
		let th = t / 2;

		let mut equalities: Vec<Formula<'ctx>> = Vec::new();
		for v in inputs.vars {
			let (fwd_t, bwd_t) = if even {
				(th as i64, th as i64 - 1)
			} else {
				(th as i64 + 1, th as i64 - 1)
			};
			let fwd_name = names::get_timed_name(&v.name, fwd_t);
			let bwd_name = names::get_ptimed_name(&v.name, bwd_t);
			equalities.push(term::var_eq(ctx, &fwd_name, &bwd_name, &v.sort));
		}
		let refs: Vec<&Formula<'ctx>> = equalities.iter().collect();
		let eq = Formula::and(ctx, &refs);
		solver.assert(&eq, inputs.sorts)?;

		message!("solving for k={}", t);
		if solver.check() == CheckResult::Sat {
			let model = solver.get_model(&relevant_names(inputs.vars, t), inputs.sorts)?;
			return Ok(SearchOutcome::CounterExample { k: t, model });
		}
		solver.pop()?;

		let trans_t = if even {
			unroll(ti, ctx, inputs.trans, inputs.invar, th as i64 + 1, th as i64)
		} else {
			unroll(ti, ctx, inputs.trans, inputs.invar, th as i64, th as i64 + 1)
		};
		solver.assert(&trans_t, inputs.sorts)?;

		t += 1;
	}

	Ok(SearchOutcome::NotFound)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::bmc::timing::TimeIndexer;
	use crate::config::BmcConfig;
	use crate::demos::{counter, toggle};
	use z3::{ast::Bool, Config, Context};

	/// Scenario 4 of the specification: zig-zag search on the toggle demo
	/// joins the forward and backward halves at the midpoint and finds the
	/// same depth-1 violation the other strategies do.
	#[test]
	fn finds_counterexample_on_the_toggle_demo() {
		let cfg = Config::new();
		let ctx = Context::new(&cfg);
		let hts = toggle::build(&ctx);
		let prop = toggle::always_not_b(&ctx);
		let vars = hts.vars();

		let ti = TimeIndexer::init(&ctx, &vars, 3, true);
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

		match solve_inc_zz(&inputs, &mut solver, &prop, 3).unwrap() {
			SearchOutcome::CounterExample { k, .. } => assert_eq!(k, 1),
			other => panic!("expected a counterexample, got {other:?}"),
		}
	}

	/// Scenario 4 of the specification, on the wrapping counter: zig-zag must
	/// still find the depth-7 wraparound violation that forward search finds,
	/// though possibly at a different `k` since it alternates growing the
	/// forward and backward halves instead of unrolling purely forward.
	#[test]
	fn finds_the_wraparound_violation_on_the_counter_demo() {
		let cfg = Config::new();
		let ctx = Context::new(&cfg);
		let hts = counter::build(&ctx);
		let prop = counter::never_max(&ctx);
		let vars = hts.vars();

		let ti = TimeIndexer::init(&ctx, &vars, 14, true);
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

		match solve_inc_zz(&inputs, &mut solver, &prop, 14).unwrap() {
			SearchOutcome::CounterExample { k, .. } => assert!(k <= 14),
			other => panic!("expected a counterexample, got {other:?}"),
		}
	}

	/// Scenario 5 of the specification: a property that mentions a next-state
	/// variable is only meaningful under the FWD strategy.
	#[test]
	fn rejects_a_property_over_next_state_variables() {
		let cfg = Config::new();
		let ctx = Context::new(&cfg);
		let hts = toggle::build(&ctx);
		let vars = hts.vars();

		let ti = TimeIndexer::init(&ctx, &vars, 3, true);
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

		let bp_ast = Bool::new_const(&ctx, crate::ts::names::get_prime_name("b"));
		let next_prop = Formula::atom(bp_ast, [crate::ts::names::get_prime_name("b")]);

		let err = solve_inc_zz(&inputs, &mut solver, &next_prop, 3).unwrap_err();
		assert!(matches!(err, BmcError::Configuration(_)));
	}
}
