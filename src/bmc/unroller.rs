//! §4.3 Unrolling. `unroll(trans, invar, k_end, k_start)` chains one copy of
//! `trans`/`invar` per frame over `[min(k_start,k_end), max(k_start,k_end)]`;
//! the *order* of `k_end` vs `k_start` picks the direction (forward-timed
//! `@` names when `k_start <= k_end`, pseudo-timed `#` names otherwise),
//! matching `BMC.unroll` in the original analyzer this module is grounded
//! on. Boundary `init`/`invar` at the starting frame are asserted
//! separately by the caller, not by this function — same split as the
//! original.

use z3::Context;

use crate::bmc::term::Formula;
use crate::bmc::timing::TimeIndexer;

/// Unrolls `trans`/`invar` from `k_start` to `k_end`. When `k_start <=
/// k_end` this walks forward through `fwdmap`; otherwise it walks backward
/// through `bwdmap`, which must have been initialized.
pub fn unroll<'ctx>(
	ti: &TimeIndexer<'ctx>,
	ctx: &'ctx Context,
	trans: &Formula<'ctx>,
	invar: &Formula<'ctx>,
	k_end: i64,
	k_start: i64,
) -> Formula<'ctx> {
	let fwd = k_start <= k_end;
	let lo = k_start.min(k_end);
	let hi = k_start.max(k_end);

	let mut parts: Vec<Formula<'ctx>> = Vec::new();
	let mut t = lo;
	while t < hi {
		let to_t = if fwd { t + 1 } else { t };
		if fwd {
			parts.push(ti.at_time(trans, t as u32));
			parts.push(ti.at_time(invar, to_t as u32));
		} else {
			parts.push(ti.at_ptime(trans, t));
			parts.push(ti.at_ptime(invar, to_t));
		}
		t += 1;
	}

	if parts.is_empty() {
		return Formula::tru(ctx);
	}
	let refs: Vec<&Formula<'ctx>> = parts.iter().collect();
	Formula::and(ctx, &refs)
}
