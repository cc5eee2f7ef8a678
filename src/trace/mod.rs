//! Trace rendering: a human-readable frame-by-frame printer and a minimal
//! VCD writer, both driven off the `bmc::remap::TraceModel` a search
//! strategy hands back after remapping. Grounded on `BMC.print_trace`'s
//! human-readable/VCD dual output, reimplemented without a pysmt-style
//! dedicated printer class since there's no such abstraction to mirror in
//! this crate's dependency stack.

pub mod printer;
pub mod vcd;
