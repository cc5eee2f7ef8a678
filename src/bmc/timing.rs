//! §4.1 Time-indexing. Builds the forward (`fwdmap`) and previous (`bwdmap`)
//! varmap caches described in §3 and substitutes formulas through them.
//!
//! The caches here store *name -> name* renamings rather than *name -> term*
//! mappings, which is closer to the distilled spec's own notation
//! (`fwdmap[t]: name→V@t`) than caching z3 terms directly would be: the
//! actual constant for a timed name is reconstructed on demand by
//! `term::substitute` via z3's hash-consing (see `bmc::term::make_const`).
//! What *is* precomputed once per horizon, satisfying I1, is the expensive
//! part — the string formatting and the three-flavor fan-out per variable
//! per time step.

use std::collections::HashMap;

use z3::Context;

use crate::bmc::term::{self, Formula};
use crate::ts::{names, Sort, Var};

pub struct TimeIndexer<'ctx> {
	ctx: &'ctx Context,
	sorts: HashMap<String, Sort>,
	fwdmap: Vec<HashMap<String, String>>,
	bwdmap: Option<HashMap<i64, HashMap<String, String>>>,
}

impl<'ctx> TimeIndexer<'ctx> {
	/// Populates `fwdmap[0..=horizon+1]` and, if `need_backward`,
	/// `bwdmap[-1..=horizon+1]` (I1). Any previously built caches are
	/// discarded, matching "must be discarded on re-init" from §4.1 — there
	/// is nothing to explicitly free since this simply replaces `self`.
	pub fn init(ctx: &'ctx Context, vars: &[Var], horizon: u32, need_backward: bool) -> Self {
		let mut sorts = HashMap::new();
		for v in vars {
			sorts.insert(v.name.clone(), v.sort.clone());
			sorts.insert(names::get_prime_name(&v.name), v.sort.clone());
			sorts.insert(names::get_prev_name(&v.name), v.sort.clone());
		}

		let horizon = horizon as i64;
		let mut fwdmap = Vec::with_capacity((horizon + 2) as usize);
		for t in 0..=(horizon + 1) {
			let mut m = HashMap::new();
			for v in vars {
				m.insert(v.name.clone(), names::get_timed_name(&v.name, t));
				m.insert(
					names::get_prime_name(&v.name),
					names::get_timed_name(&v.name, t + 1),
				);
				m.insert(
					names::get_prev_name(&v.name),
					names::get_timed_name(&v.name, t - 1),
				);
			}
			fwdmap.push(m);
		}

		let bwdmap = if need_backward {
			let mut bm = HashMap::new();
			for t in -1..=(horizon + 1) {
				let mut m = HashMap::new();
				for v in vars {
					m.insert(v.name.clone(), names::get_ptimed_name(&v.name, t));
					m.insert(
						names::get_prime_name(&v.name),
						names::get_ptimed_name(&v.name, t - 1),
					);
					m.insert(
						names::get_prev_name(&v.name),
						names::get_ptimed_name(&v.name, t + 1),
					);
				}
				bm.insert(t, m);
			}
			Some(bm)
		} else {
			None
		};

		Self {
			ctx,
			sorts,
			fwdmap,
			bwdmap,
		}
	}

	/// `at_time(f, t)` (§4.1): substitutes per `fwdmap[t]`. Fatal (panics) on
	/// a `t` outside the initialized horizon — per §4.1 that is a
	/// programmer error, not a recoverable condition.
	pub fn at_time(&self, f: &Formula<'ctx>, t: u32) -> Formula<'ctx> {
		let rename = self
			.fwdmap
			.get(t as usize)
			.unwrap_or_else(|| panic!("at_time: t={t} outside initialized horizon"));
		term::substitute(self.ctx, f, &self.sorts, rename)
	}

	/// `at_ptime(f, t)` (§4.1): substitutes per `bwdmap[t]`.
	pub fn at_ptime(&self, f: &Formula<'ctx>, t: i64) -> Formula<'ctx> {
		let bwdmap = self
			.bwdmap
			.as_ref()
			.expect("at_ptime: backward cache not initialized (strategy is FWD)");
		let rename = bwdmap
			.get(&t)
			.unwrap_or_else(|| panic!("at_ptime: t={t} outside initialized horizon"));
		term::substitute(self.ctx, f, &self.sorts, rename)
	}

	pub fn sorts(&self) -> &HashMap<String, Sort> {
		&self.sorts
	}

	pub fn horizon(&self) -> u32 {
		(self.fwdmap.len() as i64 - 2).max(0) as u32
	}
}
