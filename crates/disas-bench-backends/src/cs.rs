//! Capstone backend.

use capstone::arch::x86::{ArchMode, ArchSyntax};
use capstone::prelude::*;
use disas_bench_core::{
    BackendOptions, BenchError, Bitness, DecodeBackend, Decoded, FormatBuf, Result, Syntax,
    FORMAT_BUF_CAPACITY,
};

const NAME: &str = "capstone";

/// Capstone in x86 mode with instruction details disabled.
///
/// Capstone always renders mnemonic and operand text while decoding, so there is
/// no separate formatting step: the text is copied out at decode time and
/// `format` only hands it over. With [`keep_text`](Self::keep_text) off the
/// copy is skipped and `format` writes nothing.
pub struct CapstoneBackend {
    cs: Capstone,
    keep_text: bool,
    text: String,
}

impl CapstoneBackend {
    pub fn new(options: &BackendOptions) -> Result<Self> {
        let mode = match options.bitness {
            Bitness::Bits16 => ArchMode::Mode16,
            Bitness::Bits32 => ArchMode::Mode32,
            Bitness::Bits64 => ArchMode::Mode64,
        };
        let syntax = match options.syntax {
            Syntax::Intel => ArchSyntax::Intel,
            Syntax::Gas => ArchSyntax::Att,
            other => {
                return Err(BenchError::UnsupportedSyntax {
                    backend: NAME,
                    syntax: other,
                })
            }
        };

        let cs = Capstone::new()
            .x86()
            .mode(mode)
            .syntax(syntax)
            .detail(false)
            .build()
            .map_err(|err| BenchError::BackendInit {
                backend: NAME,
                reason: err.to_string(),
            })?;

        Ok(Self {
            cs,
            keep_text: true,
            text: String::with_capacity(FORMAT_BUF_CAPACITY),
        })
    }

    /// Whether decode copies the instruction text for a later `format`.
    pub fn keep_text(mut self, keep: bool) -> Self {
        self.keep_text = keep;
        self
    }
}

impl DecodeBackend for CapstoneBackend {
    fn name(&self) -> &'static str {
        NAME
    }

    fn decode(&mut self, code: &[u8], offset: usize) -> Decoded {
        let Some(rest) = code.get(offset..) else {
            return Decoded::Invalid;
        };
        let Ok(insns) = self.cs.disasm_count(rest, offset as u64, 1) else {
            return Decoded::Invalid;
        };
        let Some(insn) = insns.iter().next() else {
            return Decoded::Invalid;
        };

        if self.keep_text {
            self.text.clear();
            if let Some(mnemonic) = insn.mnemonic() {
                self.text.push_str(mnemonic);
            }
            if let Some(op_str) = insn.op_str().filter(|s| !s.is_empty()) {
                self.text.push(' ');
                self.text.push_str(op_str);
            }
        }
        Decoded::valid(insn.bytes().len())
    }

    fn format(&mut self, out: &mut FormatBuf) {
        out.push_str(&self.text);
    }
}
