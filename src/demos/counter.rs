//! A wrapping 3-bit counter: `c' = c + 1`, starting at `0`. Exercises
//! bitvector arithmetic and the wrap-around edge case (`c = 7 -> c' = 0`)
//! that pure boolean demos like [`crate::demos::toggle`] can't.

use z3::ast::BV;
use z3::Context;

use crate::bmc::term::Formula;
use crate::ts::{names, Hts, Ts, Var};

const WIDTH: u32 = 3;

pub fn build<'ctx>(ctx: &'ctx Context) -> Hts<'ctx> {
	let c = Var::bitvec("c", WIDTH);

	let c_ast = BV::new_const(ctx, "c", WIDTH);
	let cp_ast = BV::new_const(ctx, names::get_prime_name("c"), WIDTH);
	let zero = BV::from_i64(ctx, 0, WIDTH);
	let one = BV::from_i64(ctx, 1, WIDTH);

	let init = Formula::atom(c_ast._eq(&zero), ["c".to_string()]);
	let trans = Formula::atom(
		cp_ast._eq(&(c_ast.clone() + one)),
		[names::get_prime_name("c"), "c".to_string()],
	);
	let invar = Formula::tru(ctx);

	let ts = Ts::new(
		vec![c.clone()],
		[c.name.clone()].into_iter().collect(),
		Default::default(),
		Default::default(),
		init,
		trans,
		invar,
	);

	let mut hts = Hts::new("counter", ctx, "QF_BV");
	hts.add_ts(ts);
	hts
}

/// Property: `c` never reaches `7` (the maximum 3-bit value). False at
/// frame 7.
pub fn never_max<'ctx>(ctx: &'ctx Context) -> Formula<'ctx> {
	let c = BV::new_const(ctx, "c", WIDTH);
	let max = BV::from_i64(ctx, 7, WIDTH);
	Formula::not(ctx, &Formula::atom(c._eq(&max), ["c".to_string()]))
}

#[cfg(test)]
mod tests {
	use super::*;
	use z3::Config;

	#[test]
	fn counter_system_has_one_bitvec_state_variable() {
		let cfg = Config::new();
		let ctx = Context::new(&cfg);
		let hts = build(&ctx);
		let vars = hts.vars();
		assert_eq!(vars.len(), 1);
		assert_eq!(vars[0].sort, crate::ts::Sort::BitVec(WIDTH));
	}
}
