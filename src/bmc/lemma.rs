//! §4.10 Lemma-assisted induction: each candidate lemma is checked for
//! `I -> L` and `L ∧ T -> L'`; lemmas that hold accumulate into a holding set
//! that is monotonically folded into `Hts::assumptions` (I4). Grounded on
//! `BMC._check_lemma` / `_check_lemmas` / `add_lemmas`.

use std::collections::HashMap;

use z3::Context;

use crate::bmc::solver::{CheckResult, SolverFacade};
use crate::bmc::term::{self, Formula};
use crate::config::BmcConfig;
use crate::error::BmcResult;
use crate::message;
use crate::ts::{names, Sort};

/// Builds `L'`, the next-state (primed) version of a lemma over the current-
/// state vocabulary: every free variable `x` is renamed to `x'`. `sorts`
/// must carry an entry for each primed name already (true for the
/// `TimeIndexer::sorts()` map every caller passes through).
fn primed<'ctx>(ctx: &'ctx Context, lemma: &Formula<'ctx>, sorts: &HashMap<String, Sort>) -> Formula<'ctx> {
	let rename: HashMap<String, String> = lemma
		.free_vars
		.iter()
		.map(|name| (name.clone(), names::get_prime_name(name)))
		.collect();
	term::substitute(ctx, lemma, sorts, &rename)
}

/// Whether a single lemma survived both induction checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LemmaOutcome {
	Holds,
	Failed,
}

/// `_check_lemma` (§4.10): `I ∧ invar -> L` at frame 0, then
/// `L ∧ T ∧ invar ∧ invar' -> L'` at frame 0. Both checks reuse the same
/// solver instance and reset it between queries, matching the original.
pub fn check_lemma<'ctx>(
	ctx: &'ctx Context,
	solver: &mut SolverFacade<'ctx>,
	sorts: &HashMap<String, Sort>,
	init: &Formula<'ctx>,
	trans: &Formula<'ctx>,
	invar: &Formula<'ctx>,
	lemma: &Formula<'ctx>,
) -> BmcResult<LemmaOutcome> {
	let init_with_invar = Formula::and(ctx, &[init, invar]);

	solver.reset()?;
	let init_implies_lemma = Formula::implies(ctx, &init_with_invar, lemma);
	let check_1 = Formula::not(ctx, &init_implies_lemma);
	solver.assert(&check_1, sorts)?;
	if solver.check() == CheckResult::Sat {
		message!("lemma failed for I -> L");
		return Ok(LemmaOutcome::Failed);
	}

	solver.reset()?;
	let trans_with_invar = Formula::and(ctx, &[trans, invar]);
	let next_lemma = primed(ctx, lemma, sorts);
	let not_next_lemma = Formula::not(ctx, &next_lemma);
	let check_2 = Formula::and(ctx, &[&trans_with_invar, lemma, &not_next_lemma]);
	solver.assert(&check_2, sorts)?;
	if solver.check() == CheckResult::Sat {
		message!("lemma failed for L & T -> L'");
		return Ok(LemmaOutcome::Failed);
	}

	Ok(LemmaOutcome::Holds)
}

/// `_check_lemmas` (§4.10): do the lemmas that hold so far already imply the
/// property on their own, with no unrolling at all?
fn lemmas_imply_property<'ctx>(
	ctx: &'ctx Context,
	solver: &mut SolverFacade<'ctx>,
	sorts: &HashMap<String, Sort>,
	prop: &Formula<'ctx>,
	holding: &[Formula<'ctx>],
) -> BmcResult<bool> {
	solver.reset()?;
	let refs: Vec<&Formula<'ctx>> = holding.iter().collect();
	let conj = Formula::and(ctx, &refs);
	let implication = Formula::implies(ctx, &conj, prop);
	let check = Formula::not(ctx, &implication);
	solver.assert(&check, sorts)?;
	Ok(solver.check() == CheckResult::Unsat)
}

/// `add_lemmas` (§4.10): returns the accumulated assumptions formula plus
/// whether the holding lemmas already imply the property outright (the
/// early short-circuit that lets `safety` skip unrolling entirely).
pub fn add_lemmas<'ctx>(
	ctx: &'ctx Context,
	solver: &mut SolverFacade<'ctx>,
	sorts: &HashMap<String, Sort>,
	_config: &BmcConfig,
	init: &Formula<'ctx>,
	trans: &Formula<'ctx>,
	invar: &Formula<'ctx>,
	prop: &Formula<'ctx>,
	lemmas: &[Formula<'ctx>],
) -> BmcResult<(Formula<'ctx>, bool)> {
	if lemmas.is_empty() {
		return Ok((Formula::tru(ctx), false));
	}

	let mut holding: Vec<Formula<'ctx>> = Vec::new();
	for (i, lemma) in lemmas.iter().enumerate() {
		message!("checking lemma {}", i + 1);
		match check_lemma(ctx, solver, sorts, init, trans, invar, lemma)? {
			LemmaOutcome::Holds => {
				holding.push(lemma.clone());
				message!("lemma {} holds", i + 1);
				if lemmas_imply_property(ctx, solver, sorts, prop, &holding)? {
					return Ok((Formula::tru(ctx), true));
				}
			}
			LemmaOutcome::Failed => {
				message!("lemma {} does not hold", i + 1);
			}
		}
	}

	let refs: Vec<&Formula<'ctx>> = holding.iter().collect();
	Ok((Formula::and(ctx, &refs), false))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::BmcConfig;
	use z3::ast::BV;
	use z3::Config;

	#[test]
	fn a_true_lemma_holds_for_a_constant_system() {
		let cfg = Config::new();
		let ctx = Context::new(&cfg);
		let config = BmcConfig::default();
		let mut solver = SolverFacade::new(&ctx, &config);

		let mut sorts = HashMap::new();
		sorts.insert("x".to_string(), Sort::BitVec(8));
		sorts.insert("x'".to_string(), Sort::BitVec(8));

		let x = BV::new_const(&ctx, "x", 8);
		let xp = BV::new_const(&ctx, "x'", 8);
		let zero = BV::from_i64(&ctx, 0, 8);

		let init = Formula::atom(x._eq(&zero), ["x".to_string()]);
		let trans = Formula::atom(xp._eq(&zero), ["x'".to_string()]);
		let invar = Formula::tru(&ctx);
		let lemma = Formula::atom(x._eq(&zero), ["x".to_string()]);

		let outcome = check_lemma(&ctx, &mut solver, &sorts, &init, &trans, &invar, &lemma).unwrap();
		assert_eq!(outcome, LemmaOutcome::Holds);
	}

	#[test]
	fn a_false_lemma_fails_the_init_check() {
		let cfg = Config::new();
		let ctx = Context::new(&cfg);
		let config = BmcConfig::default();
		let mut solver = SolverFacade::new(&ctx, &config);

		let mut sorts = HashMap::new();
		sorts.insert("x".to_string(), Sort::BitVec(8));
		sorts.insert("x'".to_string(), Sort::BitVec(8));

		let x = BV::new_const(&ctx, "x", 8);
		let xp = BV::new_const(&ctx, "x'", 8);
		let zero = BV::from_i64(&ctx, 0, 8);
		let one = BV::from_i64(&ctx, 1, 8);

		let init = Formula::atom(x._eq(&zero), ["x".to_string()]);
		let trans = Formula::atom(xp._eq(&zero), ["x'".to_string()]);
		let invar = Formula::tru(&ctx);
		let lemma = Formula::atom(x._eq(&one), ["x".to_string()]);

		let outcome = check_lemma(&ctx, &mut solver, &sorts, &init, &trans, &invar, &lemma).unwrap();
		assert_eq!(outcome, LemmaOutcome::Failed);
	}

	#[test]
	fn a_lemma_true_initially_but_broken_by_trans_fails_the_step_check() {
		let cfg = Config::new();
		let ctx = Context::new(&cfg);
		let config = BmcConfig::default();
		let mut solver = SolverFacade::new(&ctx, &config);

		let mut sorts = HashMap::new();
		sorts.insert("x".to_string(), Sort::BitVec(8));
		sorts.insert("x'".to_string(), Sort::BitVec(8));

		let x = BV::new_const(&ctx, "x", 8);
		let xp = BV::new_const(&ctx, "x'", 8);
		let zero = BV::from_i64(&ctx, 0, 8);
		let one = BV::from_i64(&ctx, 1, 8);

		let init = Formula::atom(x._eq(&zero), ["x".to_string()]);
		// x' = x + 1: "x = 0" holds at init but is not preserved by trans.
		let trans = Formula::atom(
			xp._eq(&(x.clone() + one)),
			["x'".to_string(), "x".to_string()],
		);
		let invar = Formula::tru(&ctx);
		let lemma = Formula::atom(x._eq(&zero), ["x".to_string()]);

		let outcome = check_lemma(&ctx, &mut solver, &sorts, &init, &trans, &invar, &lemma).unwrap();
		assert_eq!(outcome, LemmaOutcome::Failed);
	}
}
