//! Minimal VCD (Value Change Dump) emission, enabled by `BmcConfig::vcd_trace`.
//! Only emits scalar wires — arrays aren't representable in VCD and are
//! skipped, matching the non-goal the distilled spec sets for waveform
//! export fidelity.

use std::fmt::Write as _;

use crate::bmc::remap::TraceModel;
use crate::error::{BmcError, BmcResult};
use crate::ts::{names, Sort, Var};

/// Renders `trace` as a VCD document covering frames `[0, length]`. Each
/// variable gets a single-character VCD identifier derived from its index,
/// which is enough for the handful of signals a BMC trace typically has.
pub fn render_vcd(trace: &TraceModel, vars: &[Var], length: u32) -> BmcResult<String> {
	let mut out = String::new();
	writeln!(out, "$timescale 1ns $end").ok();
	writeln!(out, "$scope module top $end").ok();

	let mut ids = Vec::with_capacity(vars.len());
	for (i, v) in vars.iter().enumerate() {
		let id = vcd_id(i);
		let width = match &v.sort {
			Sort::Bool => 1,
			Sort::BitVec(w) => *w,
			Sort::Array { .. } => {
				return Err(BmcError::Translation(format!(
					"cannot render array variable `{}` to VCD",
					v.name
				)))
			}
		};
		writeln!(out, "$var wire {width} {id} {} $end", v.name).ok();
		ids.push(id);
	}
	writeln!(out, "$upscope $end").ok();
	writeln!(out, "$enddefinitions $end").ok();

	for t in 0..=length {
		writeln!(out, "#{t}").ok();
		for (i, v) in vars.iter().enumerate() {
			let timed = names::get_timed_name(&v.name, t as i64);
			let Some(value) = trace.get(&timed) else {
				continue;
			};
			match &v.sort {
				Sort::Bool => {
					let bit = if value.contains("true") { '1' } else { '0' };
					writeln!(out, "{bit}{}", ids[i]).ok();
				}
				Sort::BitVec(_) => {
					writeln!(out, "b{} {}", vcd_bits(value), ids[i]).ok();
				}
				Sort::Array { .. } => unreachable!("rejected above"),
			}
		}
	}

	Ok(out)
}

fn vcd_id(index: usize) -> char {
	(b'!' + (index as u8 % 94)) as char
}

fn vcd_bits(z3_value: &str) -> String {
	if let Some(hex) = z3_value.strip_prefix("#x") {
		let bits = u64::from_str_radix(hex, 16).unwrap_or(0);
		format!("{bits:b}")
	} else if let Some(bin) = z3_value.strip_prefix("#b") {
		bin.to_string()
	} else {
		"0".to_string()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn array_variables_are_rejected() {
		let vars = vec![Var::new(
			"mem",
			Sort::Array {
				index_width: 4,
				elem_width: 8,
			},
		)];
		let trace = TraceModel::new();
		assert!(render_vcd(&trace, &vars, 0).is_err());
	}

	#[test]
	fn bitvec_values_are_rendered_as_binary() {
		let vars = vec![Var::bitvec("x", 4)];
		let mut trace = TraceModel::new();
		trace.insert("x@0".to_string(), "#x0a".to_string());
		let vcd = render_vcd(&trace, &vars, 0).unwrap();
		assert!(vcd.contains("b1010"));
	}
}
