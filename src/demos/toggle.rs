//! A 1-bit toggle flip-flop: `b' = !b`, starting at `false`. The textbook
//! smallest non-trivial BMC example — `AG !b` fails exactly at the odd
//! frames, giving every strategy a cheap, hand-checkable counterexample.

use z3::ast::Bool;
use z3::Context;

use crate::bmc::term::Formula;
use crate::ts::{names, Hts, Ts, Var};

pub fn build<'ctx>(ctx: &'ctx Context) -> Hts<'ctx> {
	let b = Var::boolean("b");

	let b_ast = Bool::new_const(ctx, "b");
	let bp_ast = Bool::new_const(ctx, names::get_prime_name("b"));

	let init = Formula::atom(b_ast.not(), ["b".to_string()]);
	let trans = Formula::atom(
		bp_ast.iff(&b_ast.not()),
		[names::get_prime_name("b"), "b".to_string()],
	);
	let invar = Formula::tru(ctx);

	let ts = Ts::new(
		vec![b.clone()],
		[b.name.clone()].into_iter().collect(),
		Default::default(),
		Default::default(),
		init,
		trans,
		invar,
	);

	let mut hts = Hts::new("toggle", ctx, "QF_BOOL");
	hts.add_ts(ts);
	hts
}

/// Property: `b` is always false. False at frame 1 (`b` toggles true).
pub fn always_not_b<'ctx>(ctx: &'ctx Context) -> Formula<'ctx> {
	let b = Bool::new_const(ctx, "b");
	Formula::not(ctx, &Formula::atom(b, ["b".to_string()]))
}
