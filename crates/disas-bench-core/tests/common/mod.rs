// Shared test helpers (integration tests compile as separate crates, so put
// common code in a submodule to avoid it becoming its own test target).
#![allow(dead_code)]

use disas_bench_core::{DecodeBackend, Decoded, FormatBuf};

/// Backend whose answer depends only on the byte at the offset:
/// `b % 4 == 0` is invalid, otherwise the instruction is `b % 4` bytes long.
///
/// Lengths are allowed to run off the end of the buffer so the driver's
/// no-clamping behaviour gets exercised.
#[derive(Debug, Default)]
pub struct ByteRule {
    pub decodes: usize,
    pub formats: usize,
    last_len: usize,
}

impl ByteRule {
    pub fn expected(code: &[u8]) -> (u64, u64) {
        let (mut valid, mut invalid) = (0, 0);
        let mut offset = 0;
        while offset < code.len() {
            match code[offset] % 4 {
                0 => {
                    invalid += 1;
                    offset += 1;
                }
                len => {
                    valid += 1;
                    offset += len as usize;
                }
            }
        }
        (valid, invalid)
    }
}

impl DecodeBackend for ByteRule {
    fn name(&self) -> &'static str {
        "byte-rule"
    }

    fn decode(&mut self, code: &[u8], offset: usize) -> Decoded {
        self.decodes += 1;
        match code.get(offset).map(|b| b % 4) {
            None | Some(0) => Decoded::Invalid,
            Some(len) => {
                self.last_len = len as usize;
                Decoded::valid(self.last_len)
            }
        }
    }

    fn format(&mut self, out: &mut FormatBuf) {
        self.formats += 1;
        out.push_str("insn/");
        out.push_str(match self.last_len {
            1 => "1",
            2 => "2",
            _ => "3",
        });
    }
}

/// Tiny deterministic PRNG for test input generation.
pub struct XorShift64(pub u64);

impl XorShift64 {
    pub fn next_u64(&mut self) -> u64 {
        // xorshift64*
        let mut x = self.0;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.0 = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    pub fn fill(&mut self, buf: &mut [u8]) {
        for chunk in buf.chunks_mut(8) {
            let v = self.next_u64().to_le_bytes();
            let n = chunk.len();
            chunk.copy_from_slice(&v[..n]);
        }
    }
}
