//! The formula layer (§6, "Formula library"). There is no standalone
//! pysmt-like crate in the Rust ecosystem to reach for here; Z3's own `ast`
//! module already plays that role, so `Formula` is a thin wrapper around
//! `z3::ast::Bool` that additionally tracks its own free-variable set and
//! top-level conjunct list, rather than re-deriving them by walking the AST
//! on every query.

use std::collections::{HashMap, HashSet};

use z3::ast::{Ast, Bool, Dynamic};
use z3::Context;

use crate::ts::Sort;

/// A boolean formula over the HTS vocabulary, with its free-variable set and
/// top-level AND-conjuncts tracked alongside the z3 term itself.
#[derive(Clone)]
pub struct Formula<'ctx> {
	pub ast: Bool<'ctx>,
	pub free_vars: HashSet<String>,
	conjuncts: Vec<Bool<'ctx>>,
}

impl<'ctx> Formula<'ctx> {
	/// Wraps a leaf (non-conjunctive) z3 term together with the names it
	/// references.
	pub fn atom(ast: Bool<'ctx>, free_vars: impl IntoIterator<Item = String>) -> Self {
		Self {
			conjuncts: vec![ast.clone()],
			ast,
			free_vars: free_vars.into_iter().collect(),
		}
	}

	pub fn tru(ctx: &'ctx Context) -> Self {
		Self::atom(Bool::from_bool(ctx, true), [])
	}

	pub fn fals(ctx: &'ctx Context) -> Self {
		Self::atom(Bool::from_bool(ctx, false), [])
	}

	pub fn is_true_literal(&self) -> bool {
		self.free_vars.is_empty() && self.ast.as_bool().unwrap_or(false)
	}

	/// Conjunction. Flattens the operands' own top-level conjuncts, matching
	/// the distilled spec's "conjunctive partition" requirement: a formula
	/// built via repeated `and` can always be iterated one conjunct at a
	/// time later (used by the solver façade's one-assert-per-conjunct trace
	/// emission).
	pub fn and(ctx: &'ctx Context, fs: &[&Formula<'ctx>]) -> Self {
		let mut free_vars = HashSet::new();
		let mut conjuncts = Vec::new();
		let mut asts = Vec::new();
		for f in fs {
			free_vars.extend(f.free_vars.iter().cloned());
			conjuncts.extend(f.conjuncts.iter().cloned());
			asts.push(&f.ast);
		}
		Self {
			ast: Bool::and(ctx, &asts),
			free_vars,
			conjuncts,
		}
	}

	pub fn or(ctx: &'ctx Context, fs: &[&Formula<'ctx>]) -> Self {
		let mut free_vars = HashSet::new();
		let mut asts = Vec::new();
		for f in fs {
			free_vars.extend(f.free_vars.iter().cloned());
			asts.push(&f.ast);
		}
		let ast = Bool::or(ctx, &asts);
		Self {
			conjuncts: vec![ast.clone()],
			ast,
			free_vars,
		}
	}

	pub fn not(ctx: &'ctx Context, f: &Formula<'ctx>) -> Self {
		let _ = ctx;
		let ast = f.ast.not();
		Self {
			conjuncts: vec![ast.clone()],
			ast,
			free_vars: f.free_vars.clone(),
		}
	}

	pub fn implies(ctx: &'ctx Context, a: &Formula<'ctx>, b: &Formula<'ctx>) -> Self {
		let _ = ctx;
		let ast = a.ast.implies(&b.ast);
		let mut free_vars = a.free_vars.clone();
		free_vars.extend(b.free_vars.iter().cloned());
		Self {
			conjuncts: vec![ast.clone()],
			ast,
			free_vars,
		}
	}

	pub fn iff(ctx: &'ctx Context, a: &Formula<'ctx>, b: &Formula<'ctx>) -> Self {
		let _ = ctx;
		let ast = a.ast.iff(&b.ast);
		let mut free_vars = a.free_vars.clone();
		free_vars.extend(b.free_vars.iter().cloned());
		Self {
			conjuncts: vec![ast.clone()],
			ast,
			free_vars,
		}
	}

	/// `simplify()` (§6). Conjunct-level granularity is lost after
	/// simplification collapses the term; that is fine, the simplified
	/// formula is only ever asserted, never re-partitioned.
	pub fn simplify(&self) -> Self {
		Self::atom(self.ast.simplify(), self.free_vars.clone())
	}

	/// Whether this formula mentions a next-state (primed) variable.
	pub fn has_next(&self) -> bool {
		self.free_vars.iter().any(|n| n.ends_with('\''))
	}

	/// The top-level AND-conjuncts, for the solver façade's one-assert-per-
	/// conjunct trace emission.
	pub fn conjuncts(&self) -> &[Bool<'ctx>] {
		&self.conjuncts
	}
}

/// Reconstructs the z3 constant for `(name, sort)`. Z3 hash-conses constants
/// by `(name, sort)`, so calling this twice for the same pair yields the
/// same underlying AST node — this is why `Var` and `Formula` never need to
/// carry a persistent handle to a base variable's term.
pub fn make_const<'ctx>(ctx: &'ctx Context, name: &str, sort: &Sort) -> Dynamic<'ctx> {
	match sort {
		Sort::Bool => Dynamic::from_ast(&Bool::new_const(ctx, name)),
		Sort::BitVec(width) => Dynamic::from_ast(&z3::ast::BV::new_const(ctx, name, *width)),
		Sort::Array {
			index_width,
			elem_width,
		} => {
			let domain = z3::Sort::bitvector(ctx, *index_width);
			let range = z3::Sort::bitvector(ctx, *elem_width);
			Dynamic::from_ast(&z3::ast::Array::new_const(ctx, name, &domain, &range))
		}
	}
}

/// Builds an equality/iff atom between two same-sorted named variables.
pub fn var_eq<'ctx>(ctx: &'ctx Context, a_name: &str, b_name: &str, sort: &Sort) -> Formula<'ctx> {
	let a = make_const(ctx, a_name, sort);
	let b = make_const(ctx, b_name, sort);
	Formula::atom(
		a._eq(&b),
		[a_name.to_string(), b_name.to_string()],
	)
}

/// Builds a disequality atom between two same-sorted named variables.
pub fn var_neq<'ctx>(ctx: &'ctx Context, a_name: &str, b_name: &str, sort: &Sort) -> Formula<'ctx> {
	let eq = var_eq(ctx, a_name, b_name, sort);
	Formula::not(ctx, &eq)
}

/// Pins a named variable to a concrete model value, used by the no-unroll
/// simulator to re-seed the next step's initial-state constraint straight
/// from the previous step's model (no string round-trip through SMT-LIB).
pub fn var_eq_value<'ctx>(
	ctx: &'ctx Context,
	name: &str,
	sort: &Sort,
	value: &Dynamic<'ctx>,
) -> Formula<'ctx> {
	let a = make_const(ctx, name, sort);
	Formula::atom(a._eq(value), [name.to_string()])
}

/// Renames every free variable of `f` that appears as a key of `rename`,
/// reconstructing both the old and new constants from `sorts`. Encountering
/// a free variable with no entry in `sorts` is a programmer error (I2):
/// every symbol an asserted formula can mention must already be in the HTS
/// vocabulary.
pub fn substitute<'ctx>(
	ctx: &'ctx Context,
	f: &Formula<'ctx>,
	sorts: &HashMap<String, Sort>,
	rename: &HashMap<String, String>,
) -> Formula<'ctx> {
	let mut pairs: Vec<(Dynamic<'ctx>, Dynamic<'ctx>)> = Vec::new();
	let mut new_free = HashSet::new();
	for name in &f.free_vars {
		match rename.get(name) {
			Some(new_name) => {
				let sort = sorts
					.get(name)
					.unwrap_or_else(|| panic!("substitute: symbol `{name}` outside varmap cache"));
				let old = make_const(ctx, name, sort);
				let new = make_const(ctx, new_name, sort);
				pairs.push((old, new));
				new_free.insert(new_name.clone());
			}
			None => {
				new_free.insert(name.clone());
			}
		}
	}
	let pair_refs: Vec<(&Dynamic<'ctx>, &Dynamic<'ctx>)> =
		pairs.iter().map(|(a, b)| (a, b)).collect();
	let ast = f.ast.substitute(&pair_refs);
	let conjuncts = f
		.conjuncts
		.iter()
		.map(|c| c.substitute(&pair_refs))
		.collect();
	Formula {
		ast,
		free_vars: new_free,
		conjuncts,
	}
}
