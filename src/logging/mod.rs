//! Bare `eprintln!`-based logging macros (no `log`/`tracing` crate): a small
//! research CLI genuinely doesn't need a logging façade, so this keeps the
//! teacher's own idiom rather than importing an ambient-logging dependency
//! it never used.

pub mod messages;
