//! §4.2 Solver façade. Owns the incremental z3 solver, an optional SMT-LIB
//! trace file, and the push/pop-scoped set of symbols already declared to
//! that trace file (I3) — grounded directly on `TraceSolver` /
//! `BMC._add_assertion` / `_write_smt2_log` / `_push` / `_pop` /
//! `_reset_assertions` in the original analyzer.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write as _;

use z3::ast::Ast;
use z3::{SatResult, Solver};

use crate::bmc::term::Formula;
use crate::config::BmcConfig;
use crate::error::{BmcError, BmcResult};
use crate::ts::Sort;
use crate::{debug_message, trace_message};

/// Outcome of a `check-sat` call. `Sat` carries nothing — the caller pulls
/// the model out via [`SolverFacade::get_model`] separately, matching the
/// two-step `solver.solve()` / `solver.get_model()` pattern this is grounded
/// on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckResult {
	Sat,
	Unsat,
	Unknown,
}

pub struct SolverFacade<'ctx> {
	ctx: &'ctx z3::Context,
	solver: Solver<'ctx>,
	skip_solving: bool,
	trace_file: Option<String>,
	logic: String,
	declared: std::collections::HashSet<String>,
	declared_stack: Vec<std::collections::HashSet<String>>,
}

impl<'ctx> SolverFacade<'ctx> {
	pub fn new(ctx: &'ctx z3::Context, config: &BmcConfig) -> Self {
		Self::with_logic(ctx, config, "ALL")
	}

	/// As [`Self::new`], but the SMT-LIB trace's opening `(set-logic ...)`
	/// names `logic` instead of the catch-all `ALL` — used by callers that
	/// know the HTS's own `logic` tag (§3).
	pub fn with_logic(ctx: &'ctx z3::Context, config: &BmcConfig, logic: &str) -> Self {
		let facade = Self {
			ctx,
			solver: Solver::new(ctx),
			skip_solving: config.skip_solving,
			trace_file: config.smt2file.clone(),
			logic: logic.to_string(),
			declared: std::collections::HashSet::new(),
			declared_stack: Vec::new(),
		};
		facade.write_logic_header();
		facade
	}

	/// `(set-logic <logic>)` (§4.2, §6): written fresh by both `new` and
	/// `reset`/`clear`, since `reset` truncates the trace file and would
	/// otherwise silently drop the header it started with.
	fn write_logic_header(&self) {
		if let Some(path) = &self.trace_file {
			let _ = std::fs::write(path, format!("(set-logic {})\n\n", self.logic));
		}
	}

	/// `_add_assertion` (§4.2). `sorts` must cover every free variable of
	/// `formula`; encountering one it doesn't is a translation error (I2
	/// violation upstream), surfaced here rather than panicking since trace
	/// emission is the one place malformed input becomes externally visible.
	pub fn assert(&mut self, formula: &Formula<'ctx>, sorts: &HashMap<String, Sort>) -> BmcResult<()> {
		if !self.skip_solving {
			self.solver.assert(&formula.ast);
		}
		debug_message!("assert: {}", formula.ast);

		if self.trace_file.is_some() {
			self.declare_free_vars(formula, sorts)?;
			for conjunct in formula.conjuncts() {
				self.write_trace_line(&format!("(assert {conjunct})"))?;
			}
		}
		Ok(())
	}

	fn declare_free_vars(
		&mut self,
		formula: &Formula<'ctx>,
		sorts: &HashMap<String, Sort>,
	) -> BmcResult<()> {
		let mut newly_declared = Vec::new();
		for name in &formula.free_vars {
			if self.declared.contains(name) {
				continue;
			}
			let sort = sorts.get(name).ok_or_else(|| {
				BmcError::Translation(format!("symbol `{name}` has no known sort"))
			})?;
			let decl = match sort {
				Sort::Bool => format!("(declare-fun {name} () Bool)"),
				Sort::BitVec(width) => format!("(declare-fun {name} () (_ BitVec {width}))"),
				Sort::Array {
					index_width,
					elem_width,
				} => format!(
					"(declare-fun {name} () (Array (_ BitVec {index_width}) (_ BitVec {elem_width})))"
				),
			};
			newly_declared.push(decl);
			self.declared.insert(name.clone());
		}
		for decl in newly_declared {
			self.write_trace_line(&decl)?;
		}
		Ok(())
	}

	/// `_push` (§4.2): pushes both the z3 assertion stack and the declared-
	/// symbol set (I3), so a later `pop` forgets symbols declared only inside
	/// the pushed scope.
	pub fn push(&mut self) -> BmcResult<()> {
		if !self.skip_solving {
			self.solver.push();
		}
		self.declared_stack.push(self.declared.clone());
		self.write_trace_line("(push 1)")
	}

	pub fn pop(&mut self) -> BmcResult<()> {
		if !self.skip_solving {
			self.solver.pop(1);
		}
		if let Some(restored) = self.declared_stack.pop() {
			self.declared = restored;
		}
		self.write_trace_line("(pop 1)")
	}

	/// `_reset_assertions` (§4.2): clears the solver and the declared-symbol
	/// bookkeeping, truncating the trace file rather than appending.
	pub fn reset(&mut self) -> BmcResult<()> {
		if !self.skip_solving {
			self.solver.reset();
		}
		self.declared.clear();
		self.declared_stack.clear();
		if self.trace_file.is_some() {
			self.write_logic_header();
		}
		Ok(())
	}

	pub fn check(&self) -> CheckResult {
		if self.skip_solving {
			return CheckResult::Unknown;
		}
		trace_message!("check-sat");
		match self.solver.check() {
			SatResult::Sat => CheckResult::Sat,
			SatResult::Unsat => CheckResult::Unsat,
			SatResult::Unknown => CheckResult::Unknown,
		}
	}

	/// Reads back the value of each named symbol from the last `Sat` model,
	/// as a [`super::remap::TraceModel`]-ready flat map of `name ->
	/// z3-formatted value string`. `sorts` lets each name be reconstructed as
	/// the right kind of z3 constant before evaluation.
	pub fn get_model(
		&self,
		relevant_vars: &[String],
		sorts: &HashMap<String, Sort>,
	) -> BmcResult<HashMap<String, String>> {
		let model = self
			.solver
			.get_model()
			.ok_or_else(|| BmcError::Solver("check-sat did not yield a model".to_string()))?;
		let mut out = HashMap::new();
		for name in relevant_vars {
			let Some(sort) = sorts.get(name) else {
				continue;
			};
			let constant = crate::bmc::term::make_const(self.ctx, name, sort);
			if let Some(val) = model.eval(&constant, true) {
				out.insert(name.clone(), val.to_string());
			}
		}
		Ok(out)
	}

	/// As [`Self::get_model`], but returns live z3 terms instead of their
	/// string rendering — used where the model's values get folded back into
	/// a new assertion rather than only displayed (the no-unroll simulator's
	/// step-to-step state pinning).
	pub fn get_model_values(
		&self,
		relevant_vars: &[String],
		sorts: &HashMap<String, Sort>,
	) -> BmcResult<HashMap<String, z3::ast::Dynamic<'ctx>>> {
		let model = self
			.solver
			.get_model()
			.ok_or_else(|| BmcError::Solver("check-sat did not yield a model".to_string()))?;
		let mut out = HashMap::new();
		for name in relevant_vars {
			let Some(sort) = sorts.get(name) else {
				continue;
			};
			let constant = crate::bmc::term::make_const(self.ctx, name, sort);
			if let Some(val) = model.eval(&constant, true) {
				out.insert(name.clone(), val);
			}
		}
		Ok(out)
	}

	fn write_trace_line(&self, line: &str) -> BmcResult<()> {
		let Some(path) = &self.trace_file else {
			return Ok(());
		};
		trace_message!("{}", line);
		let mut file = OpenOptions::new()
			.create(true)
			.append(true)
			.open(path)
			.map_err(|e| BmcError::Solver(e.to_string()))?;
		writeln!(file, "{line}").map_err(|e| BmcError::Solver(e.to_string()))?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::bmc::term::Formula;
	use z3::ast::Bool;
	use z3::Config;

	#[test]
	fn unsatisfiable_conjunction_reports_unsat() {
		let cfg = Config::new();
		let ctx = z3::Context::new(&cfg);
		let config = BmcConfig::default();
		let mut solver = SolverFacade::new(&ctx, &config);
		let mut sorts = HashMap::new();
		sorts.insert("b".to_string(), Sort::Bool);

		let b = Bool::new_const(&ctx, "b");
		let t = Formula::atom(b.clone(), ["b".to_string()]);
		let f = Formula::not(&ctx, &t);
		let conj = Formula::and(&ctx, &[&t, &f]);

		solver.assert(&conj, &sorts).unwrap();
		assert_eq!(solver.check(), CheckResult::Unsat);
	}

	#[test]
	fn push_pop_forgets_a_scoped_declaration() {
		let cfg = Config::new();
		let ctx = z3::Context::new(&cfg);
		let config = BmcConfig::default();
		let mut solver = SolverFacade::new(&ctx, &config);
		let mut sorts = HashMap::new();
		sorts.insert("b".to_string(), Sort::Bool);
		let b = Bool::new_const(&ctx, "b");
		let t = Formula::atom(b, ["b".to_string()]);

		solver.push().unwrap();
		solver.assert(&t, &sorts).unwrap();
		assert!(solver.declared.contains("b"));
		solver.pop().unwrap();
		assert!(!solver.declared.contains("b"));
	}
}
