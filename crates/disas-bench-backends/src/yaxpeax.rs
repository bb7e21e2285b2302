//! yaxpeax-x86 backend.

use core::fmt::Write as _;

use disas_bench_core::{
    BackendOptions, BenchError, Bitness, DecodeBackend, Decoded, FormatBuf, Result, Syntax,
};
use yaxpeax_arch::{Decoder, Reader, U8Reader};
use yaxpeax_x86::{long_mode, protected_mode, real_mode};

const NAME: &str = "yaxpeax";

/// Architectural limit on x86 instruction length.
const MAX_INST_LEN: usize = 15;

enum ModeDecoder {
    Real(real_mode::InstDecoder, real_mode::Instruction),
    Protected(protected_mode::InstDecoder, protected_mode::Instruction),
    Long(long_mode::InstDecoder, long_mode::Instruction),
}

/// yaxpeax-x86 decoder for one processor mode.
///
/// Formatting goes through the instruction's `Display` impl, which only knows
/// Intel syntax.
pub struct YaxpeaxBackend {
    mode: ModeDecoder,
}

impl YaxpeaxBackend {
    pub fn new(options: &BackendOptions) -> Result<Self> {
        if options.syntax != Syntax::Intel {
            return Err(BenchError::UnsupportedSyntax {
                backend: NAME,
                syntax: options.syntax,
            });
        }
        let mode = match options.bitness {
            Bitness::Bits16 => {
                ModeDecoder::Real(real_mode::InstDecoder::default(), real_mode::Instruction::default())
            }
            Bitness::Bits32 => ModeDecoder::Protected(
                protected_mode::InstDecoder::default(),
                protected_mode::Instruction::default(),
            ),
            Bitness::Bits64 => {
                ModeDecoder::Long(long_mode::InstDecoder::default(), long_mode::Instruction::default())
            }
        };
        Ok(Self { mode })
    }
}

impl DecodeBackend for YaxpeaxBackend {
    fn name(&self) -> &'static str {
        NAME
    }

    #[inline]
    fn decode(&mut self, code: &[u8], offset: usize) -> Decoded {
        let Some(rest) = code.get(offset..) else {
            return Decoded::Invalid;
        };
        let window = &rest[..rest.len().min(MAX_INST_LEN)];
        let mut reader = U8Reader::new(window);

        let decoded = match &mut self.mode {
            ModeDecoder::Real(decoder, inst) => decoder.decode_into(inst, &mut reader).is_ok(),
            ModeDecoder::Protected(decoder, inst) => decoder.decode_into(inst, &mut reader).is_ok(),
            ModeDecoder::Long(decoder, inst) => decoder.decode_into(inst, &mut reader).is_ok(),
        };
        if !decoded {
            return Decoded::Invalid;
        }

        let len = <U8Reader<'_> as Reader<u64, u8>>::total_offset(&mut reader) as usize;
        Decoded::valid(len)
    }

    fn format(&mut self, out: &mut FormatBuf) {
        // `FormatBuf` never reports an error; a truncated render is fine.
        let _ = match &self.mode {
            ModeDecoder::Real(_, inst) => write!(out, "{inst}"),
            ModeDecoder::Protected(_, inst) => write!(out, "{inst}"),
            ModeDecoder::Long(_, inst) => write!(out, "{inst}"),
        };
    }
}
