#![forbid(unsafe_code)]

//! Decoder engines behind the [`DecodeBackend`] contract.
//!
//! Each engine gets a thin wrapper that owns whatever the engine needs to be set
//! up once (decoder tables, formatter, library handle) and translates its decode
//! result into [`Decoded`](disas_bench_core::Decoded). [`run`] picks the engine
//! named by a [`BenchConfig`] and drives it with the generic loop from
//! `disas-bench-core`, monomorphized per engine.

mod iced;
mod yaxpeax;

#[cfg(feature = "capstone")]
mod cs;

use core::fmt;
use core::str::FromStr;

use disas_bench_core::{
    BackendOptions, BenchError, CodeBuffer, DecodeBackend, Result, RunOptions, RunStats,
};

pub use iced::IcedBackend;
pub use yaxpeax::YaxpeaxBackend;

#[cfg(feature = "capstone")]
pub use cs::CapstoneBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Iced,
    Yaxpeax,
    Capstone,
}

impl BackendKind {
    pub const ALL: [BackendKind; 3] = [BackendKind::Iced, BackendKind::Yaxpeax, BackendKind::Capstone];

    pub fn name(self) -> &'static str {
        match self {
            BackendKind::Iced => "iced",
            BackendKind::Yaxpeax => "yaxpeax",
            BackendKind::Capstone => "capstone",
        }
    }

    /// Whether this build can construct the backend.
    pub fn is_available(self) -> bool {
        match self {
            BackendKind::Capstone => cfg!(feature = "capstone"),
            _ => true,
        }
    }
}

impl FromStr for BackendKind {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "iced-x86" => Ok(BackendKind::Iced),
            "yaxpeax-x86" => Ok(BackendKind::Yaxpeax),
            "cs" => Ok(BackendKind::Capstone),
            name => BackendKind::ALL
                .into_iter()
                .find(|kind| kind.name() == name)
                .ok_or_else(|| BenchError::UnknownBackend(s.to_string())),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything needed for one measurement besides the code itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchConfig {
    pub backend: BackendKind,
    pub options: BackendOptions,
    pub run: RunOptions,
}

/// Set up the configured backend, run the benchmark, tear the backend down.
///
/// Only setup can fail; the timed loop itself never does.
pub fn run(config: &BenchConfig, code: &CodeBuffer) -> Result<RunStats> {
    match config.backend {
        BackendKind::Iced => {
            let backend = IcedBackend::new(&config.options, code.as_bytes())?;
            Ok(measure(backend, config, code))
        }
        BackendKind::Yaxpeax => {
            let backend = YaxpeaxBackend::new(&config.options)?;
            Ok(measure(backend, config, code))
        }
        #[cfg(feature = "capstone")]
        BackendKind::Capstone => {
            let backend = CapstoneBackend::new(&config.options)?.keep_text(config.run.format);
            Ok(measure(backend, config, code))
        }
        #[cfg(not(feature = "capstone"))]
        BackendKind::Capstone => Err(BenchError::BackendInit {
            backend: "capstone",
            reason: "built without the `capstone` feature".to_string(),
        }),
    }
}

fn measure<B: DecodeBackend>(mut backend: B, config: &BenchConfig, code: &CodeBuffer) -> RunStats {
    tracing::info!(
        backend = backend.name(),
        bitness = %config.options.bitness,
        syntax = %config.options.syntax,
        format = config.run.format,
        count = config.run.count,
        rounds = config.run.loop_count,
        code_len = code.len(),
        "backend ready"
    );
    let stats = disas_bench_core::run(&mut backend, code.as_bytes(), &config.run);
    drop(backend);
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_names_parse_with_aliases() {
        for kind in BackendKind::ALL {
            assert_eq!(kind.name().parse::<BackendKind>().unwrap(), kind);
        }
        assert_eq!("iced-x86".parse::<BackendKind>().unwrap(), BackendKind::Iced);
        assert_eq!("CS".parse::<BackendKind>().unwrap(), BackendKind::Capstone);
        assert!(matches!(
            "zydis".parse::<BackendKind>(),
            Err(BenchError::UnknownBackend(name)) if name == "zydis"
        ));
    }

    #[test]
    fn setup_errors_surface_before_running() {
        let config = BenchConfig {
            backend: BackendKind::Yaxpeax,
            options: BackendOptions {
                syntax: disas_bench_core::Syntax::Gas,
                ..BackendOptions::default()
            },
            run: RunOptions::default(),
        };
        let err = run(&config, &CodeBuffer::from(vec![0x90])).unwrap_err();
        assert!(matches!(err, BenchError::UnsupportedSyntax { backend: "yaxpeax", .. }));
    }

    #[test]
    fn every_available_backend_counts_the_same_simple_stream() {
        // push rbp; mov rbp, rsp; nop; (64-bit-invalid) push es; pop rbp; ret
        let code = CodeBuffer::from(vec![0x55, 0x48, 0x89, 0xE5, 0x90, 0x06, 0x5D, 0xC3]);
        for kind in BackendKind::ALL.into_iter().filter(|k| k.is_available()) {
            let config = BenchConfig {
                backend: kind,
                options: BackendOptions::default(),
                run: RunOptions {
                    loop_count: 2,
                    format: true,
                    count: true,
                },
            };
            let stats = run(&config, &code).unwrap();
            let counts = stats.counts.unwrap();
            assert_eq!((counts.valid, counts.invalid), (10, 2), "{kind}");
            assert_eq!(stats.backend, kind.name());
        }
    }
}
