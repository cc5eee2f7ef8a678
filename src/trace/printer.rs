//! Human-readable trace rendering.

use colored::Colorize;

use crate::bmc::remap::TraceModel;
use crate::ts::{names, Var};

/// Renders `trace` over frames `[0, length]`, one block per frame. When
/// `diff_only` is set, a variable is only printed in a frame if its value
/// changed from the previous one — matches the default CLI experience,
/// where `--full-trace` turns it off.
pub fn format_trace(trace: &TraceModel, vars: &[Var], length: u32, diff_only: bool) -> String {
	let mut out = String::new();
	let mut previous: Vec<Option<&String>> = vec![None; vars.len()];

	for t in 0..=length {
		out.push_str(&format!("{}\n", format!("-- frame {t} --").bold()));
		for (i, v) in vars.iter().enumerate() {
			let timed = names::get_timed_name(&v.name, t as i64);
			let Some(value) = trace.get(&timed) else {
				continue;
			};
			let changed = previous[i] != Some(value);
			if diff_only && !changed && t > 0 {
				continue;
			}
			out.push_str(&format!("  {} = {}\n", v.name.cyan(), value));
			previous[i] = Some(value);
		}
	}

	out
}
