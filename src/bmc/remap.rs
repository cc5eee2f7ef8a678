//! §4.11 Model remapping. BWD and ZZ strategies solve over pseudo-timed
//! (`#`) names; before a trace can be printed it must be translated back
//! into the forward-timed (`@`) vocabulary every other strategy and the
//! trace printer expect. Grounded on `_remap_model_fwd` / `_bwd` / `_zz`.

use std::collections::HashMap;

use crate::ts::{names, Var};

/// A flat `name -> value` snapshot read back from a solver model, keyed by
/// whichever timed-name family the originating strategy used.
pub type TraceModel = HashMap<String, String>;

/// FWD/NU: the model is already forward-timed, nothing to do.
pub fn remap_model_fwd(model: TraceModel) -> TraceModel {
	model
}

/// BWD: `x@t` for every `t in [0, k]` is read out of `x#(k-t)`.
pub fn remap_model_bwd(vars: &[Var], model: &TraceModel, k: u32) -> TraceModel {
	let mut out = TraceModel::new();
	for v in vars {
		for t in 0..=k {
			let timed = names::get_timed_name(&v.name, t as i64);
			let ptimed = names::get_ptimed_name(&v.name, (k - t) as i64);
			if let Some(value) = model.get(&ptimed) {
				out.insert(timed, value.clone());
			}
		}
	}
	out
}

/// ZZ: forward frames `[0, k/2]` came from the forward half of the search
/// and are already present under `@`; only the backward half,
/// `(k/2, k]`, needs remapping from `#(k-t)`.
pub fn remap_model_zz(vars: &[Var], model: &TraceModel, k: u32) -> TraceModel {
	let mut out = model.clone();
	for v in vars {
		for t in (k / 2 + 1)..=k {
			let timed = names::get_timed_name(&v.name, t as i64);
			let ptimed = names::get_ptimed_name(&v.name, (k - t) as i64);
			if let Some(value) = model.get(&ptimed) {
				out.insert(timed, value.clone());
			}
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::ts::Sort;

	#[test]
	fn bwd_remap_reads_each_forward_frame_from_its_mirrored_pseudo_frame() {
		let vars = vec![Var::new("x", Sort::BitVec(4))];
		let mut model = TraceModel::new();
		model.insert("x#0".to_string(), "#x00".to_string());
		model.insert("x#1".to_string(), "#x01".to_string());
		model.insert("x#2".to_string(), "#x02".to_string());

		let remapped = remap_model_bwd(&vars, &model, 2);
		assert_eq!(remapped.get("x@0"), Some(&"#x02".to_string()));
		assert_eq!(remapped.get("x@1"), Some(&"#x01".to_string()));
		assert_eq!(remapped.get("x@2"), Some(&"#x00".to_string()));
	}

	#[test]
	fn zz_remap_only_touches_the_backward_half() {
		let vars = vec![Var::new("x", Sort::BitVec(4))];
		let mut model = TraceModel::new();
		model.insert("x@0".to_string(), "#x00".to_string());
		model.insert("x@1".to_string(), "#x01".to_string());
		model.insert("x#0".to_string(), "#xff".to_string());

		let remapped = remap_model_zz(&vars, &model, 2);
		assert_eq!(remapped.get("x@0"), Some(&"#x00".to_string()));
		assert_eq!(remapped.get("x@2"), Some(&"#xff".to_string()));
	}
}
