#![forbid(unsafe_code)]

//! Engine-agnostic core of the decoder benchmark.
//!
//! A benchmark run scans a fixed code buffer `loop_count` times, asking a
//! [`DecodeBackend`] to decode one instruction at a time. Failed decodes advance
//! the read offset by a single byte; successful ones advance by the decoded
//! length and (optionally) format the instruction into a scratch buffer whose
//! contents are thrown away. Only the round loop is timed.
//!
//! The decoder engines themselves live in `disas-bench-backends`; nothing in this
//! crate knows about any particular instruction set.

mod backend;
mod config;
mod driver;
mod error;
mod format;
mod source;
mod stats;
mod timer;

pub use backend::{DecodeBackend, Decoded};
pub use config::{BackendOptions, Bitness, LoopCount, Syntax};
pub use driver::{run, run_with_clock, scan, Counts, NoCount, RunOptions, Tally};
pub use error::{BenchError, Result};
pub use format::{FormatBuf, FORMAT_BUF_CAPACITY};
pub use source::{auto_loop_count, parse_int, CodeBuffer, CodeSource};
pub use stats::{Report, RunRecord, RunStats};
pub use timer::{duration_ms, Clock, ManualClock, MonotonicClock, Stopwatch};
