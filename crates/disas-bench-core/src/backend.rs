use crate::format::FormatBuf;

/// Outcome of a single decode attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    /// An instruction of `len` bytes (always at least 1) starts at the offset.
    Valid { len: usize },
    /// The bytes at the offset do not form an instruction.
    Invalid,
}

impl Decoded {
    pub fn valid(len: usize) -> Self {
        Decoded::Valid { len }
    }

    pub fn is_valid(self) -> bool {
        matches!(self, Decoded::Valid { .. })
    }
}

/// A decoder engine as seen by the benchmark driver.
///
/// Implementations are constructed once (mode, syntax and any engine tables are
/// set up there) and then reused for every round. `&mut self` is only for
/// scratch state such as the last decoded instruction; for the same code buffer
/// and offset `decode` must always return the same result.
pub trait DecodeBackend {
    /// Short engine name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Decode one instruction starting at `code[offset]`.
    ///
    /// Must not read past `code.len()`. An offset at or past the end decodes as
    /// [`Decoded::Invalid`].
    fn decode(&mut self, code: &[u8], offset: usize) -> Decoded;

    /// Render the instruction returned by the most recent successful
    /// [`decode`](Self::decode) into `out`.
    ///
    /// `out` truncates silently once full, so this never fails.
    fn format(&mut self, out: &mut FormatBuf);
}

impl<B: DecodeBackend + ?Sized> DecodeBackend for Box<B> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    #[inline]
    fn decode(&mut self, code: &[u8], offset: usize) -> Decoded {
        (**self).decode(code, offset)
    }

    fn format(&mut self, out: &mut FormatBuf) {
        (**self).format(out)
    }
}
