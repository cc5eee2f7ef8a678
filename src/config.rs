/// The four symbolic search strategies a `Engine` can dispatch on.
///
/// `Nu` (no-unroll simulation) is only a valid choice for `simulate`; using it
/// with `safety` is a `BmcError::Configuration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
	/// Unroll from frame 0 upward; property checked at the growing frontier.
	Fwd,
	/// Unroll from the property (pinned at pseudo-time -1) downward.
	Bwd,
	/// Alternating forward/backward growth meeting at a midpoint equivalence.
	Zz,
	/// Step-at-a-time simulation, no unrolling. Simulation only.
	Nu,
}

impl Strategy {
	pub fn name(&self) -> &'static str {
		match self {
			Strategy::Fwd => "FWD",
			Strategy::Bwd => "BWD",
			Strategy::Zz => "ZZ",
			Strategy::Nu => "NU",
		}
	}
}

/// Mirrors the teacher's `z3` dependency directly: there is exactly one
/// solver backend wired up, so `solver_name` is carried for trace-file
/// fidelity (it becomes the `(set-logic ...)` companion line) rather than
/// to select between backends.
#[derive(Debug, Clone)]
pub struct BmcConfig {
	pub incremental: bool,
	pub strategy: Strategy,
	pub solver_name: String,
	pub full_trace: bool,
	pub prefix: Option<String>,
	pub smt2file: Option<String>,
	pub simplify: bool,
	pub vcd_trace: bool,
	pub prove: bool,
	pub skip_solving: bool,
	pub map_function: Option<fn(&str) -> String>,
}

impl Default for BmcConfig {
	fn default() -> Self {
		Self {
			incremental: true,
			strategy: Strategy::Fwd,
			solver_name: "z3".to_string(),
			full_trace: false,
			prefix: None,
			smt2file: None,
			simplify: false,
			vcd_trace: false,
			prove: false,
			skip_solving: false,
			map_function: None,
		}
	}
}

impl BmcConfig {
	/// Convenience constructor for the common case of just picking a strategy.
	pub fn with_strategy(strategy: Strategy) -> Self {
		Self {
			strategy,
			..Default::default()
		}
	}

	/// `smt2file`'s sibling for the induction solver in `prove` mode (§6):
	/// `foo.smt2` becomes `foo-ind.smt2`; a path with no recognizable
	/// extension just gets the suffix appended.
	pub fn induction_smt2file(&self) -> Option<String> {
		self.smt2file.as_ref().map(|path| match path.rsplit_once('.') {
			Some((stem, ext)) => format!("{stem}-ind.{ext}"),
			None => format!("{path}-ind"),
		})
	}
}
