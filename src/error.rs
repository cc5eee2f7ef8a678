use std::fmt;

/// Error taxonomy for the BMC core. Matches the three fatal kinds the engine can
/// raise on its own (configuration, solver, translation); the "exhausted the
/// horizon" case is not an error at all, it is `Verdict::Unk`.
#[derive(Debug, Clone)]
pub enum BmcError {
	/// Unknown strategy, `NU` requested outside simulation, a next-state property
	/// with `k < 1`, or BWD/ZZ requested on a property with next-state variables.
	Configuration(String),
	/// The underlying solver returned an error from `check-sat` or `get-model`.
	Solver(String),
	/// The SMT-LIB trace serializer hit a variable whose sort is not Bool,
	/// bitvector, or bitvector-indexed bitvector array.
	Translation(String),
}

impl fmt::Display for BmcError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			BmcError::Configuration(msg) => write!(f, "configuration error: {msg}"),
			BmcError::Solver(msg) => write!(f, "solver failure: {msg}"),
			BmcError::Translation(msg) => write!(f, "translation error: {msg}"),
		}
	}
}

impl std::error::Error for BmcError {}

pub type BmcResult<T> = Result<T, BmcError>;
