//! §4.5-4.9 Search strategies. Each strategy unrolls the transition
//! relation a different way and returns a [`SearchOutcome`] — a
//! counterexample frame plus model, an early induction proof, or exhaustion
//! of the configured horizon (`Unk`, not an error).

pub mod fwd;
pub mod inc_bwd;
pub mod inc_fwd;
pub mod inc_zz;
pub mod sim;

use std::collections::HashMap;

use z3::Context;

use crate::bmc::remap::TraceModel;
use crate::bmc::term::Formula;
use crate::bmc::timing::TimeIndexer;
use crate::ts::{Sort, Var};

/// What a bounded search over `[0, k]` concluded.
#[derive(Debug, Clone)]
pub enum SearchOutcome {
	/// The property was refuted at frame `k`; `model` is still in whichever
	/// timed-name family the strategy searched in (forward-timed for
	/// FWD/NU, pseudo-timed for BWD/ZZ) — callers remap before printing.
	CounterExample { k: u32, model: TraceModel },
	/// The k-induction side query (FWD only, `config.prove`) discharged the
	/// property at frame `k` without needing to grow the horizon further.
	InductionHolds { k: u32 },
	/// No counterexample within the configured horizon.
	NotFound,
}

/// The read-only pieces every strategy needs: the time-indexer, the three
/// HTS formulas already folded across members, and the full/state variable
/// lists used for simple-path constraints and model extraction.
pub struct SearchInputs<'a, 'ctx> {
	pub ti: &'a TimeIndexer<'ctx>,
	pub ctx: &'ctx Context,
	pub init: &'a Formula<'ctx>,
	pub trans: &'a Formula<'ctx>,
	pub invar: &'a Formula<'ctx>,
	pub vars: &'a [Var],
	pub state_vars: &'a [Var],
	pub sorts: &'a HashMap<String, Sort>,
}
