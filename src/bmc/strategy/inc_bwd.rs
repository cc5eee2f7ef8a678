//! Incremental backward search (§4.6). Grounded on `BMC.solve_inc_bwd`.

use crate::bmc::solver::{CheckResult, SolverFacade};
use crate::bmc::strategy::{SearchInputs, SearchOutcome};
use crate::bmc::term::Formula;
use crate::bmc::unroller::unroll;
use crate::error::{BmcError, BmcResult};
use crate::message;
use crate::ts::names;

fn relevant_names(vars: &[crate::ts::Var], upto: u32) -> Vec<String> {
	let mut out = Vec::new();
	for v in vars {
		for t in -1..=(upto as i64) {
			out.push(names::get_ptimed_name(&v.name, t));
		}
	}
	out
}

pub fn solve_inc_bwd<'ctx>(
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

	let not_prop_and_invar = Formula::and(ctx, &[&Formula::not(ctx, prop), inputs.invar]);
	let seed = ti.at_ptime(&not_prop_and_invar, -1);
	solver.assert(&seed, inputs.sorts)?;

	let mut t: u32 = 0;
	while t < k + 1 {
		solver.push()?;

		let pinit = ti.at_ptime(inputs.init, t as i64 - 1);
		solver.assert(&pinit, inputs.sorts)?;

		message!("solving for k={}", t);
		if solver.check() == CheckResult::Sat {
			let model = solver.get_model(&relevant_names(inputs.vars, t), inputs.sorts)?;
			return Ok(SearchOutcome::CounterExample { k: t, model });
		}
		solver.pop()?;

		let trans_t = unroll(ti, ctx, inputs.trans, inputs.invar, t as i64, (t + 1) as i64);
		solver.assert(&trans_t, inputs.sorts)?;

		t += 1;
	}

	Ok(SearchOutcome::NotFound)
}
