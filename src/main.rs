#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use disas_bench_backends::{BackendKind, BenchConfig};
use disas_bench_core::{
    parse_int, BackendOptions, BenchError, Bitness, CodeSource, LoopCount, RunOptions, Syntax,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "disas-bench",
    about = "Benchmark an x86 decoder: decode (and optionally format) a code range N times and report the elapsed time."
)]
struct Args {
    /// Number of passes over the code (decimal, 0x-hex, or `auto` to scale by code length)
    loop_count: LoopCount,

    /// Offset of the code inside FILENAME
    #[arg(value_parser = parse_u64)]
    code_offset: u64,

    /// Number of code bytes to read
    #[arg(value_parser = parse_usize)]
    code_len: usize,

    /// File containing the machine code (e.g. a PE/ELF image)
    filename: PathBuf,

    /// Decoder engine (iced, yaxpeax, capstone)
    #[arg(long, default_value = "iced")]
    backend: BackendKind,

    /// Processor mode (16, 32 or 64)
    #[arg(long, default_value = "64")]
    bitness: Bitness,

    /// Formatter syntax (intel, masm, nasm, gas, fast; engine-dependent)
    #[arg(long, default_value = "intel")]
    syntax: Syntax,

    /// Decode only; skip instruction formatting
    #[arg(long, action = clap::ArgAction::SetTrue)]
    no_fmt: bool,

    /// Count valid and invalid instructions
    #[arg(long, action = clap::ArgAction::SetTrue)]
    count: bool,

    /// Print the result as a JSON object instead of a text line
    #[arg(long, action = clap::ArgAction::SetTrue)]
    json: bool,

    /// Only log warnings and errors
    #[arg(long, action = clap::ArgAction::SetTrue)]
    quiet: bool,
}

fn parse_u64(s: &str) -> Result<u64, BenchError> {
    parse_int(s)
}

fn parse_usize(s: &str) -> Result<usize, BenchError> {
    let n = parse_int(s)?;
    usize::try_from(n).map_err(|_| BenchError::InvalidInteger(s.to_string()))
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.quiet);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(quiet: bool) {
    // Logs go to stderr; stdout is reserved for the result line.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if quiet { "warn" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> anyhow::Result<()> {
    let source = CodeSource {
        path: args.filename.clone(),
        offset: args.code_offset,
        len: args.code_len,
    };
    let code = source.load().with_context(|| {
        format!(
            "load {:#x} bytes at offset {:#x} from {}",
            args.code_len,
            args.code_offset,
            args.filename.display()
        )
    })?;

    let config = BenchConfig {
        backend: args.backend,
        options: BackendOptions {
            bitness: args.bitness,
            syntax: args.syntax,
        },
        run: RunOptions {
            loop_count: args.loop_count.resolve(code.len()),
            format: !args.no_fmt,
            count: args.count,
        },
    };
    if !args.backend.is_available() {
        tracing::warn!(backend = %args.backend, "backend not compiled into this build");
    }

    let stats = disas_bench_backends::run(&config, &code)
        .with_context(|| format!("set up {} backend", args.backend))?;

    match stats.throughput_mib_s() {
        Some(mib_s) => tracing::info!(
            backend = stats.backend,
            rounds = stats.rounds,
            elapsed_ms = stats.elapsed_ms(),
            "{mib_s:.2} MiB/s"
        ),
        None => tracing::info!(backend = stats.backend, rounds = stats.rounds, "no measurable time elapsed"),
    }

    if args.json {
        let json = serde_json::to_string(&stats.record()).context("serialize run record")?;
        println!("{json}");
    } else {
        println!("{}", stats.report());
    }
    Ok(())
}
