//! Incremental forward search (§4.5), with an optional k-induction side
//! query (§4.9, `config.prove`). Grounded on `BMC.solve_inc_fwd`.

use crate::bmc::simple_path::simple_path;
use crate::bmc::solver::{CheckResult, SolverFacade};
use crate::bmc::strategy::{SearchInputs, SearchOutcome};
use crate::bmc::term::Formula;
use crate::bmc::unroller::unroll;
use crate::config::BmcConfig;
use crate::error::{BmcError, BmcResult};
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

pub fn solve_inc_fwd<'ctx>(
	inputs: &SearchInputs<'_, 'ctx>,
	solver: &mut SolverFacade<'ctx>,
	mut solver2: Option<&mut SolverFacade<'ctx>>,
	config: &BmcConfig,
	prop: &Formula<'ctx>,
	k: u32,
	k_min: u32,
) -> BmcResult<SearchOutcome> {
	let ctx = inputs.ctx;
	let ti = inputs.ti;

	let next_prop = prop.has_next();
	if next_prop && k < 1 {
		return Err(BmcError::Configuration(
			"invariant checking with next-state variables requires at least k=1".to_string(),
		));
	}
	let mut k_min = k_min;
	if next_prop {
		k_min = k_min.max(1);
	}

	solver.reset()?;
	if let Some(s2) = solver2.as_deref_mut() {
		s2.reset()?;
	}

	let init_and_invar = Formula::and(ctx, &[inputs.init, inputs.invar]);
	let at0 = ti.at_time(&init_and_invar, 0);
	solver.assert(&at0, inputs.sorts)?;

	if let Some(s2) = solver2.as_deref_mut() {
		let invar0 = ti.at_time(inputs.invar, 0);
		s2.assert(&invar0, inputs.sorts)?;
	}

	let not_prop = Formula::not(ctx, prop);
	let mut propt = Formula::fals(ctx);

	let mut t: u32 = 0;
	while t < k + 1 {
		solver.push()?;

		if k_min > 0 {
			let include = !next_prop || t > 0;
			if include {
				let t_prop = if next_prop { t - 1 } else { t };
				let next_term = ti.at_time(&not_prop, t_prop);
				propt = Formula::or(ctx, &[&propt, &next_term]);
			}
		} else {
			propt = ti.at_time(&not_prop, t);
		}
		solver.assert(&propt, inputs.sorts)?;

		if t >= k_min {
			message!("solving for k={}", t);
			if solver.check() == CheckResult::Sat {
				let model = solver.get_model(&relevant_names(inputs.vars, t), inputs.sorts)?;
				return Ok(SearchOutcome::CounterExample { k: t, model });
			}
		}
		solver.pop()?;

		let trans_t = unroll(ti, ctx, inputs.trans, inputs.invar, (t + 1) as i64, t as i64);
		solver.assert(&trans_t, inputs.sorts)?;

		if let Some(s2) = solver2.as_deref_mut() {
			if config.prove {
				s2.assert(&trans_t, inputs.sorts)?;
				let sp = simple_path(ti, ctx, inputs.vars, t, 0);
				s2.assert(&sp, inputs.sorts)?;

				s2.push()?;
				let not_prop_t = ti.at_time(&not_prop, t);
				s2.assert(&not_prop_t, inputs.sorts)?;

				if t >= k_min {
					if s2.check() == CheckResult::Sat {
						message!("induction failed with k={}", t);
					} else {
						message!("induction holds with k={}", t);
						return Ok(SearchOutcome::InductionHolds { k: t });
					}
				}
				s2.pop()?;
				let prop_t = ti.at_time(prop, t);
				s2.assert(&prop_t, inputs.sorts)?;
			}
		}

		t += 1;
	}

	Ok(SearchOutcome::NotFound)
}
