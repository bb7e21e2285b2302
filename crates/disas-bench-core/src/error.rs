use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::Syntax;

pub type Result<T> = std::result::Result<T, BenchError>;

/// Setup failures.
///
/// Everything in here is fatal and happens before the timed loop starts. Decode
/// failures inside the loop are not errors; they are counted as invalid
/// instructions.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("failed to open {}", .path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("failed to seek to offset {offset:#x} in {}", .path.display())]
    Seek {
        path: PathBuf,
        offset: u64,
        source: io::Error,
    },

    #[error("couldn't read {len} bytes at offset {offset:#x} from {}", .path.display())]
    Read {
        path: PathBuf,
        offset: u64,
        len: usize,
        source: io::Error,
    },

    #[error("unable to allocate a {len}-byte code buffer")]
    Alloc { len: usize },

    #[error("invalid integer {0:?} (expected decimal or 0x-prefixed hex)")]
    InvalidInteger(String),

    #[error("unsupported bitness {0} (expected 16, 32 or 64)")]
    UnsupportedBitness(u32),

    #[error("unknown syntax {0:?}")]
    UnknownSyntax(String),

    #[error("unknown backend {0:?}")]
    UnknownBackend(String),

    #[error("{backend} does not support {syntax} syntax")]
    UnsupportedSyntax {
        backend: &'static str,
        syntax: Syntax,
    },

    #[error("failed to initialize {backend}: {reason}")]
    BackendInit {
        backend: &'static str,
        reason: String,
    },
}
