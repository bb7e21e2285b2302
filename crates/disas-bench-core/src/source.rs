//! Loading the code buffer.
//!
//! All of this runs before the timed loop starts.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::PathBuf;

use crate::error::{BenchError, Result};

/// Length of the reference input (the `.text` of a large DLL) the default
/// round count was tuned for.
const REFERENCE_CODE_LEN: usize = 0x2460400;
const REFERENCE_LOOP_COUNT: usize = 20;

/// Immutable machine code to benchmark against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBuffer {
    bytes: Box<[u8]>,
}

impl CodeBuffer {
    pub fn new(bytes: impl Into<Box<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<Vec<u8>> for CodeBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

/// A byte range inside a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSource {
    pub path: PathBuf,
    pub offset: u64,
    pub len: usize,
}

impl CodeSource {
    /// Read exactly `len` bytes starting at `offset`. A file that is too short is
    /// an error, not a shorter buffer.
    pub fn load(&self) -> Result<CodeBuffer> {
        let mut file = File::open(&self.path).map_err(|source| BenchError::Open {
            path: self.path.clone(),
            source,
        })?;
        file.seek(SeekFrom::Start(self.offset))
            .map_err(|source| BenchError::Seek {
                path: self.path.clone(),
                offset: self.offset,
                source,
            })?;

        let mut code: Vec<u8> = Vec::new();
        code.try_reserve_exact(self.len)
            .map_err(|_| BenchError::Alloc { len: self.len })?;
        code.resize(self.len, 0);
        file.read_exact(&mut code).map_err(|source| BenchError::Read {
            path: self.path.clone(),
            offset: self.offset,
            len: self.len,
            source,
        })?;

        tracing::debug!(
            path = %self.path.display(),
            offset = self.offset,
            len = self.len,
            "loaded code buffer"
        );
        Ok(CodeBuffer::from(code))
    }
}

/// Parse a decimal or `0x`-prefixed hexadecimal integer.
pub fn parse_int(s: &str) -> Result<u64> {
    let trimmed = s.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => trimmed.parse(),
    };
    parsed.map_err(|_| BenchError::InvalidInteger(s.to_string()))
}

/// Round count that makes a `code_len`-byte input cost about as many decoded
/// bytes as 20 rounds over the reference input. Never below 1.
pub fn auto_loop_count(code_len: usize) -> usize {
    if code_len == 0 {
        return 1;
    }
    let scaled = (REFERENCE_CODE_LEN as f64 * REFERENCE_LOOP_COUNT as f64 / code_len as f64).round();
    (scaled as usize).max(1)
}
