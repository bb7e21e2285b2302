//! The benchmark loop.

use std::hint::black_box;

use crate::backend::{DecodeBackend, Decoded};
use crate::format::FormatBuf;
use crate::stats::RunStats;
use crate::timer::{Clock, MonotonicClock, Stopwatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub loop_count: usize,
    /// Call [`DecodeBackend::format`] for every valid instruction.
    pub format: bool,
    /// Track valid/invalid counters. Minimal mode reports elapsed time only.
    pub count: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            loop_count: 1,
            format: true,
            count: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub valid: u64,
    pub invalid: u64,
}

impl Counts {
    pub fn total(&self) -> u64 {
        self.valid + self.invalid
    }
}

/// Per-step bookkeeping, chosen statically so the minimal mode compiles to a
/// loop without counters.
pub trait Tally: Default {
    fn valid(&mut self);
    fn invalid(&mut self);
    fn counts(&self) -> Option<Counts>;
}

impl Tally for Counts {
    #[inline(always)]
    fn valid(&mut self) {
        self.valid += 1;
    }

    #[inline(always)]
    fn invalid(&mut self) {
        self.invalid += 1;
    }

    fn counts(&self) -> Option<Counts> {
        Some(*self)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoCount;

impl Tally for NoCount {
    #[inline(always)]
    fn valid(&mut self) {}

    #[inline(always)]
    fn invalid(&mut self) {}

    fn counts(&self) -> Option<Counts> {
        None
    }
}

/// One round: scan `code` from offset 0 to its end.
///
/// Returns the final read offset. It can be past `code.len()` when the last
/// instruction's reported length runs off the end; the length is not clamped.
#[inline]
pub fn scan<B, T>(backend: &mut B, code: &[u8], mut text: Option<&mut FormatBuf>, tally: &mut T) -> usize
where
    B: DecodeBackend + ?Sized,
    T: Tally,
{
    let mut offset = 0usize;
    while offset < code.len() {
        match backend.decode(code, offset) {
            Decoded::Valid { len } => {
                tally.valid();
                if let Some(buf) = text.as_deref_mut() {
                    buf.clear();
                    backend.format(buf);
                    black_box(buf.len());
                }
                debug_assert!(len > 0, "{} decoded a zero-length instruction", backend.name());
                offset = offset.saturating_add(len.max(1));
            }
            Decoded::Invalid => {
                tally.invalid();
                offset += 1;
            }
        }
    }
    offset
}

/// Run `opts.loop_count` rounds and time them with the monotonic clock.
pub fn run<B>(backend: &mut B, code: &[u8], opts: &RunOptions) -> RunStats
where
    B: DecodeBackend + ?Sized,
{
    run_with_clock(backend, code, opts, &MonotonicClock)
}

pub fn run_with_clock<B, C>(backend: &mut B, code: &[u8], opts: &RunOptions, clock: &C) -> RunStats
where
    B: DecodeBackend + ?Sized,
    C: Clock,
{
    if opts.count {
        measure::<B, Counts, C>(backend, code, opts, clock)
    } else {
        measure::<B, NoCount, C>(backend, code, opts, clock)
    }
}

fn measure<B, T, C>(backend: &mut B, code: &[u8], opts: &RunOptions, clock: &C) -> RunStats
where
    B: DecodeBackend + ?Sized,
    T: Tally,
    C: Clock,
{
    let mut tally = T::default();
    let mut text = FormatBuf::new();

    let stopwatch = Stopwatch::start(clock);
    for _ in 0..opts.loop_count {
        let sink = if opts.format { Some(&mut text) } else { None };
        scan(backend, code, sink, &mut tally);
    }
    let elapsed = stopwatch.elapsed();

    RunStats {
        backend: backend.name(),
        rounds: opts.loop_count,
        code_len: code.len(),
        formatted: opts.format,
        counts: tally.counts(),
        elapsed,
    }
}
