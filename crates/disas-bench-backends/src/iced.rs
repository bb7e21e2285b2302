//! iced-x86 backend.

use disas_bench_core::{
    BackendOptions, BenchError, DecodeBackend, Decoded, FormatBuf, Result, Syntax,
    FORMAT_BUF_CAPACITY,
};
use iced_x86::{
    Decoder, DecoderOptions, FastFormatter, Formatter, FormatterOutput, FormatterTextKind,
    GasFormatter, Instruction, IntelFormatter, MasmFormatter, NasmFormatter,
};

const NAME: &str = "iced";

/// Adapts the bounded format buffer to iced's output trait.
struct Sink<'a>(&'a mut FormatBuf);

impl FormatterOutput for Sink<'_> {
    fn write(&mut self, text: &str, _kind: FormatterTextKind) {
        self.0.push_str(text);
    }
}

enum TextFormatter {
    Intel(IntelFormatter),
    Masm(MasmFormatter),
    Nasm(NasmFormatter),
    Gas(GasFormatter),
    // `FastFormatter` only writes into a `String`; keep one around for reuse.
    Fast(FastFormatter, String),
}

impl TextFormatter {
    fn new(syntax: Syntax) -> Self {
        match syntax {
            Syntax::Intel => TextFormatter::Intel(IntelFormatter::new()),
            Syntax::Masm => TextFormatter::Masm(MasmFormatter::new()),
            Syntax::Nasm => TextFormatter::Nasm(NasmFormatter::new()),
            Syntax::Gas => TextFormatter::Gas(GasFormatter::new()),
            Syntax::Fast => {
                TextFormatter::Fast(FastFormatter::new(), String::with_capacity(FORMAT_BUF_CAPACITY))
            }
        }
    }

    fn format(&mut self, instruction: &Instruction, out: &mut FormatBuf) {
        match self {
            TextFormatter::Intel(f) => f.format(instruction, &mut Sink(out)),
            TextFormatter::Masm(f) => f.format(instruction, &mut Sink(out)),
            TextFormatter::Nasm(f) => f.format(instruction, &mut Sink(out)),
            TextFormatter::Gas(f) => f.format(instruction, &mut Sink(out)),
            TextFormatter::Fast(f, text) => {
                text.clear();
                f.format(instruction, text);
                out.push_str(text);
            }
        }
    }
}

/// iced-x86 decoder with one of its five formatters.
///
/// iced's `Decoder` borrows the bytes it decodes, so the backend is bound to the
/// code buffer at construction and every step only repositions that decoder.
/// Any other buffer is decoded through a one-shot decoder.
pub struct IcedBackend<'a> {
    code: &'a [u8],
    decoder: Decoder<'a>,
    bitness: u32,
    instruction: Instruction,
    formatter: TextFormatter,
}

impl<'a> IcedBackend<'a> {
    pub fn new(options: &BackendOptions, code: &'a [u8]) -> Result<Self> {
        let bitness = options.bitness.bits();
        let decoder = Decoder::try_with_ip(bitness, code, 0, DecoderOptions::NONE).map_err(|err| {
            BenchError::BackendInit {
                backend: NAME,
                reason: err.to_string(),
            }
        })?;
        Ok(Self {
            code,
            decoder,
            bitness,
            instruction: Instruction::default(),
            formatter: TextFormatter::new(options.syntax),
        })
    }

    #[cold]
    fn decode_unbound(&mut self, code: &[u8], offset: usize) -> bool {
        let Some(bytes) = code.get(offset..) else {
            return false;
        };
        match Decoder::try_with_ip(self.bitness, bytes, offset as u64, DecoderOptions::NONE) {
            Ok(mut decoder) => {
                decoder.decode_out(&mut self.instruction);
                true
            }
            Err(_) => false,
        }
    }
}

impl DecodeBackend for IcedBackend<'_> {
    fn name(&self) -> &'static str {
        NAME
    }

    #[inline]
    fn decode(&mut self, code: &[u8], offset: usize) -> Decoded {
        let decoded = if core::ptr::eq(code, self.code) {
            if self.decoder.set_position(offset).is_err() {
                return Decoded::Invalid;
            }
            self.decoder.set_ip(offset as u64);
            self.decoder.decode_out(&mut self.instruction);
            true
        } else {
            self.decode_unbound(code, offset)
        };

        if !decoded || self.instruction.is_invalid() {
            Decoded::Invalid
        } else {
            Decoded::valid(self.instruction.len())
        }
    }

    fn format(&mut self, out: &mut FormatBuf) {
        self.formatter.format(&self.instruction, out);
    }
}
