use core::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::driver::Counts;
use crate::timer::duration_ms;

const MIB: f64 = 1024.0 * 1024.0;

/// Result of one benchmark run (one backend, one code buffer).
#[derive(Debug, Clone, PartialEq)]
pub struct RunStats {
    pub backend: &'static str,
    pub rounds: usize,
    pub code_len: usize,
    pub formatted: bool,
    /// `None` when the run did not count instructions.
    pub counts: Option<Counts>,
    pub elapsed: Duration,
}

impl RunStats {
    pub fn elapsed_ms(&self) -> f64 {
        duration_ms(self.elapsed)
    }

    /// Bytes scanned per second, in MiB/s. `None` when no time was measured.
    pub fn throughput_mib_s(&self) -> Option<f64> {
        let secs = self.elapsed.as_secs_f64();
        if secs <= 0.0 {
            return None;
        }
        Some(self.code_len as f64 / MIB * self.rounds as f64 / secs)
    }

    /// The one-line text report.
    pub fn report(&self) -> Report<'_> {
        Report(self)
    }

    pub fn record(&self) -> RunRecord {
        RunRecord {
            backend: self.backend,
            rounds: self.rounds,
            code_len: self.code_len,
            format: self.formatted,
            valid: self.counts.map(|c| c.valid),
            invalid: self.counts.map(|c| c.invalid),
            elapsed_ms: self.elapsed_ms(),
            throughput_mib_s: self.throughput_mib_s(),
        }
    }
}

/// `12.34 ms`, or with counters
/// `Disassembled 10 instructions (9 valid, 1 bad), 12.34 ms`.
pub struct Report<'a>(&'a RunStats);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = self.0.elapsed_ms();
        match self.0.counts {
            None => write!(f, "{ms:.2} ms"),
            Some(counts) => write!(
                f,
                "Disassembled {} instructions ({} valid, {} bad), {ms:.2} ms",
                counts.total(),
                counts.valid,
                counts.invalid
            ),
        }
    }
}

/// Machine-readable form of [`RunStats`] for `--json` output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunRecord {
    pub backend: &'static str,
    pub rounds: usize,
    pub code_len: usize,
    pub format: bool,
    pub valid: Option<u64>,
    pub invalid: Option<u64>,
    pub elapsed_ms: f64,
    pub throughput_mib_s: Option<f64>,
}
