//! Deterministic name transforms for the three variable flavors (current,
//! next, previous) and the two time-indexed families (forward `@`, previous
//! `#`). Collision-freedom across flavors rests on `'` and `^` never
//! appearing in a base variable name — enforced by [`is_valid_base_name`] at
//! `Ts` construction time.

/// The next-state flavor of a variable: `x` -> `x'`.
pub fn get_prime_name(name: &str) -> String {
	format!("{name}'")
}

/// The previous-state flavor of a variable: `x` -> `x^`.
pub fn get_prev_name(name: &str) -> String {
	format!("{name}^")
}

/// The forward time-indexed name at frame `t`: `x` -> `x@t`.
pub fn get_timed_name(name: &str, t: i64) -> String {
	format!("{name}@{t}")
}

/// The previous-time (backward/zig-zag) indexed name at pseudo-frame `t`:
/// `x` -> `x#t`.
pub fn get_ptimed_name(name: &str, t: i64) -> String {
	format!("{name}#{t}")
}

/// Prefixes a name with a component tag, used by the equivalence miter to
/// disambiguate the two systems being compared (`S1·v`, `S2·v`).
pub fn get_prefix(name: &str, prefix: &str) -> String {
	format!("{prefix}{name}")
}

/// A base variable name must not itself look like a derived name, or the
/// three flavors (and the two timed families) stop being collision-free.
pub fn is_valid_base_name(name: &str) -> bool {
	!name.is_empty() && !name.contains(['@', '#', '\'', '^'])
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn transforms_are_distinguishable() {
		let names = [
			"x".to_string(),
			get_prime_name("x"),
			get_prev_name("x"),
			get_timed_name("x", 3),
			get_ptimed_name("x", 3),
		];
		for (i, a) in names.iter().enumerate() {
			for (j, b) in names.iter().enumerate() {
				if i != j {
					assert_ne!(a, b, "name transforms collided: {a} vs {b}");
				}
			}
		}
	}

	#[test]
	fn rejects_names_that_would_collide() {
		assert!(!is_valid_base_name("x'"));
		assert!(!is_valid_base_name("x^"));
		assert!(!is_valid_base_name("x@0"));
		assert!(!is_valid_base_name("x#0"));
		assert!(is_valid_base_name("x"));
		assert!(is_valid_base_name("counter_lo"));
	}
}
