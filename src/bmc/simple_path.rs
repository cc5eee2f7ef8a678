//! §4.4 Simple-path constraint, used by the k-induction prover to rule out
//! a final frame that revisits any earlier one: `AND_{t in [k_start,
//! k_end)} OR_{v} v@k_end != v@t`. Grounded on `BMC.simple_path`.

use z3::Context;

use crate::bmc::term::{self, Formula};
use crate::bmc::timing::TimeIndexer;
use crate::ts::{names, Var};

pub fn simple_path<'ctx>(
	ti: &TimeIndexer<'ctx>,
	ctx: &'ctx Context,
	vars: &[Var],
	k_end: u32,
	k_start: u32,
) -> Formula<'ctx> {
	let _ = ti;
	if k_end == k_start {
		return Formula::tru(ctx);
	}

	let mut per_frame: Vec<Formula<'ctx>> = Vec::new();
	for t in k_start..k_end {
		let mut disagreements: Vec<Formula<'ctx>> = Vec::new();
		for v in vars {
			let end_name = names::get_timed_name(&v.name, k_end as i64);
			let t_name = names::get_timed_name(&v.name, t as i64);
			disagreements.push(term::var_neq(ctx, &end_name, &t_name, &v.sort));
		}
		if disagreements.is_empty() {
			continue;
		}
		let refs: Vec<&Formula<'ctx>> = disagreements.iter().collect();
		per_frame.push(Formula::or(ctx, &refs));
	}

	if per_frame.is_empty() {
		return Formula::tru(ctx);
	}
	let refs: Vec<&Formula<'ctx>> = per_frame.iter().collect();
	Formula::and(ctx, &refs)
}

#[cfg(test)]
mod tests {
	use super::*;
	use z3::Config;

	#[test]
	fn equal_bounds_have_no_constraint() {
		let cfg = Config::new();
		let ctx = Context::new(&cfg);
		let vars = vec![Var::bitvec("x", 4)];
		let ti = TimeIndexer::init(&ctx, &vars, 2, false);
		let sp = simple_path(&ti, &ctx, &vars, 0, 0);
		assert!(sp.is_true_literal());
	}

	#[test]
	fn three_frame_window_compares_each_earlier_frame_to_the_final_one() {
		let cfg = Config::new();
		let ctx = Context::new(&cfg);
		let vars = vec![Var::bitvec("x", 4)];
		let ti = TimeIndexer::init(&ctx, &vars, 3, false);
		let sp = simple_path(&ti, &ctx, &vars, 2, 0);
		assert_eq!(sp.conjuncts().len(), 2);
	}
}
