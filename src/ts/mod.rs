//! The transition-system data model: `Var`, `Ts`, `Hts`, as described in §3
//! of the specification. Formulas (`init`, `trans`, `invar`) are
//! `bmc::term::Formula` values; this module only carries the structural
//! bookkeeping around them.

pub mod names;

use std::collections::HashSet;

use crate::bmc::term::Formula;

/// The sort of a symbolic variable: Boolean, a fixed-width bitvector, or an
/// array of bitvector-indexed bitvectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sort {
	Bool,
	BitVec(u32),
	Array { index_width: u32, elem_width: u32 },
}

/// A named, typed symbolic variable in the HTS vocabulary. `Var` never
/// carries a z3 term itself — the underlying constant is reconstructed on
/// demand from `(name, sort)`, which z3's hash-consing makes equivalent to
/// caching it (see DESIGN.md, "Why no persistent z3 handles").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Var {
	pub name: String,
	pub sort: Sort,
}

impl Var {
	pub fn new(name: impl Into<String>, sort: Sort) -> Self {
		let name = name.into();
		assert!(
			names::is_valid_base_name(&name),
			"variable name `{name}` would collide with a derived name (must not contain @ # ' ^)"
		);
		Self { name, sort }
	}

	pub fn boolean(name: impl Into<String>) -> Self {
		Self::new(name, Sort::Bool)
	}

	pub fn bitvec(name: impl Into<String>, width: u32) -> Self {
		Self::new(name, Sort::BitVec(width))
	}
}

// Hash/Eq for Sort needed by Var's derive; Sort has no interior mutability so
// a structural derive is fine, but floats aren't involved so Eq is sound.
impl std::hash::Hash for Sort {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		match self {
			Sort::Bool => 0u8.hash(state),
			Sort::BitVec(w) => {
				1u8.hash(state);
				w.hash(state);
			}
			Sort::Array {
				index_width,
				elem_width,
			} => {
				2u8.hash(state);
				index_width.hash(state);
				elem_width.hash(state);
			}
		}
	}
}

/// A single transition system: `(vars, init, trans, invar)` plus the
/// structural split of `vars` into state variables, inputs and outputs.
/// `trans` may reference both `x` and `x'`; `invar` references only `x`.
#[derive(Clone)]
pub struct Ts<'ctx> {
	pub vars: Vec<Var>,
	pub state_vars: HashSet<String>,
	pub inputs: HashSet<String>,
	pub outputs: HashSet<String>,
	pub init: Formula<'ctx>,
	pub trans: Formula<'ctx>,
	pub invar: Formula<'ctx>,
}

impl<'ctx> Ts<'ctx> {
	pub fn new(
		vars: Vec<Var>,
		state_vars: HashSet<String>,
		inputs: HashSet<String>,
		outputs: HashSet<String>,
		init: Formula<'ctx>,
		trans: Formula<'ctx>,
		invar: Formula<'ctx>,
	) -> Self {
		Self {
			vars,
			state_vars,
			inputs,
			outputs,
			init,
			trans,
			invar,
		}
	}
}

/// A hierarchical transition system: a collection of `Ts`s plus the unions
/// of their vocabularies, an `assumptions` slot that the lemma pipeline
/// monotonically accumulates into (I4), and an SMT-LIB `logic` tag used only
/// to open the solver's trace file.
pub struct Hts<'ctx> {
	pub name: String,
	pub members: Vec<Ts<'ctx>>,
	pub assumptions: Formula<'ctx>,
	pub logic: String,
}

impl<'ctx> Hts<'ctx> {
	pub fn new(name: impl Into<String>, ctx: &'ctx z3::Context, logic: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			members: Vec::new(),
			assumptions: Formula::tru(ctx),
			logic: logic.into(),
		}
	}

	pub fn add_ts(&mut self, ts: Ts<'ctx>) {
		self.members.push(ts);
	}

	pub fn vars(&self) -> Vec<Var> {
		let mut seen = HashSet::new();
		let mut out = Vec::new();
		for ts in &self.members {
			for v in &ts.vars {
				if seen.insert(v.name.clone()) {
					out.push(v.clone());
				}
			}
		}
		out
	}

	pub fn state_vars(&self) -> HashSet<String> {
		self.members
			.iter()
			.flat_map(|ts| ts.state_vars.iter().cloned())
			.collect()
	}

	pub fn inputs(&self) -> HashSet<String> {
		self.members
			.iter()
			.flat_map(|ts| ts.inputs.iter().cloned())
			.collect()
	}

	pub fn outputs(&self) -> HashSet<String> {
		self.members
			.iter()
			.flat_map(|ts| ts.outputs.iter().cloned())
			.collect()
	}

	pub fn sorts(&self) -> std::collections::HashMap<String, Sort> {
		self.vars()
			.into_iter()
			.map(|v| (v.name, v.sort))
			.collect()
	}

	pub fn single_init(&self, ctx: &'ctx z3::Context) -> Formula<'ctx> {
		let fs: Vec<&Formula<'ctx>> = self.members.iter().map(|ts| &ts.init).collect();
		Formula::and(ctx, &fs)
	}

	pub fn single_trans(&self, ctx: &'ctx z3::Context) -> Formula<'ctx> {
		let fs: Vec<&Formula<'ctx>> = self.members.iter().map(|ts| &ts.trans).collect();
		Formula::and(ctx, &fs)
	}

	pub fn single_invar(&self, ctx: &'ctx z3::Context) -> Formula<'ctx> {
		let fs: Vec<&Formula<'ctx>> = self.members.iter().map(|ts| &ts.invar).collect();
		Formula::and(ctx, &fs)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use z3::{Config, Context};

	#[test]
	#[should_panic(expected = "would collide")]
	fn var_rejects_a_name_shaped_like_a_derived_name() {
		Var::boolean("x'");
	}

	#[test]
	fn hts_vars_deduplicates_across_members() {
		let cfg = Config::new();
		let ctx = Context::new(&cfg);
		let shared = Var::boolean("shared");

		let ts_a = Ts::new(
			vec![shared.clone(), Var::boolean("a_only")],
			Default::default(),
			Default::default(),
			Default::default(),
			Formula::tru(&ctx),
			Formula::tru(&ctx),
			Formula::tru(&ctx),
		);
		let ts_b = Ts::new(
			vec![shared, Var::boolean("b_only")],
			Default::default(),
			Default::default(),
			Default::default(),
			Formula::tru(&ctx),
			Formula::tru(&ctx),
			Formula::tru(&ctx),
		);

		let mut hts = Hts::new("merged", &ctx, "QF_BOOL");
		hts.add_ts(ts_a);
		hts.add_ts(ts_b);

		let vars = hts.vars();
		assert_eq!(vars.len(), 3);
		assert_eq!(hts.sorts().len(), 3);
	}

	#[test]
	fn single_init_conjoins_across_members() {
		let cfg = Config::new();
		let ctx = Context::new(&cfg);
		let x = z3::ast::Bool::new_const(&ctx, "x");
		let y = z3::ast::Bool::new_const(&ctx, "y");

		let ts_a = Ts::new(
			vec![Var::boolean("x")],
			Default::default(),
			Default::default(),
			Default::default(),
			Formula::atom(x, ["x".to_string()]),
			Formula::tru(&ctx),
			Formula::tru(&ctx),
		);
		let ts_b = Ts::new(
			vec![Var::boolean("y")],
			Default::default(),
			Default::default(),
			Default::default(),
			Formula::atom(y, ["y".to_string()]),
			Formula::tru(&ctx),
			Formula::tru(&ctx),
		);

		let mut hts = Hts::new("merged", &ctx, "QF_BOOL");
		hts.add_ts(ts_a);
		hts.add_ts(ts_b);

		let init = hts.single_init(&ctx);
		assert_eq!(init.conjuncts().len(), 2);
		assert!(init.free_vars.contains("x"));
		assert!(init.free_vars.contains("y"));
	}
}
