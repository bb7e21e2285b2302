use core::fmt;

/// Size of the text buffer handed to [`DecodeBackend::format`](crate::DecodeBackend::format).
///
/// Matches the 256-byte print buffers the C engines format into.
pub const FORMAT_BUF_CAPACITY: usize = 256;

/// Fixed-capacity text sink that drops whatever doesn't fit.
///
/// Truncation always happens on a `char` boundary so the contents stay valid
/// UTF-8.
#[derive(Clone)]
pub struct FormatBuf {
    bytes: [u8; FORMAT_BUF_CAPACITY],
    len: usize,
    truncated: bool,
}

impl FormatBuf {
    pub fn new() -> Self {
        Self {
            bytes: [0; FORMAT_BUF_CAPACITY],
            len: 0,
            truncated: false,
        }
    }

    pub fn clear(&mut self) {
        self.len = 0;
        self.truncated = false;
    }

    pub fn push_str(&mut self, s: &str) {
        let room = FORMAT_BUF_CAPACITY - self.len;
        let mut take = s.len().min(room);
        while !s.is_char_boundary(take) {
            take -= 1;
        }
        if take < s.len() {
            self.truncated = true;
        }
        self.bytes[self.len..self.len + take].copy_from_slice(&s.as_bytes()[..take]);
        self.len += take;
    }

    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.bytes[..self.len]).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether any text was dropped since the last [`clear`](Self::clear).
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

impl Default for FormatBuf {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Write for FormatBuf {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s);
        Ok(())
    }
}

impl fmt::Debug for FormatBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatBuf")
            .field("text", &self.as_str())
            .field("truncated", &self.truncated)
            .finish()
    }
}
