use core::fmt;
use core::str::FromStr;

use crate::error::BenchError;
use crate::source::{auto_loop_count, parse_int};

/// Processor mode a backend decodes for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bitness {
    Bits16,
    Bits32,
    #[default]
    Bits64,
}

impl Bitness {
    pub fn bits(self) -> u32 {
        match self {
            Bitness::Bits16 => 16,
            Bitness::Bits32 => 32,
            Bitness::Bits64 => 64,
        }
    }
}

impl TryFrom<u32> for Bitness {
    type Error = BenchError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        match bits {
            16 => Ok(Bitness::Bits16),
            32 => Ok(Bitness::Bits32),
            64 => Ok(Bitness::Bits64),
            other => Err(BenchError::UnsupportedBitness(other)),
        }
    }
}

impl FromStr for Bitness {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bits = s
            .trim()
            .parse::<u32>()
            .map_err(|_| BenchError::InvalidInteger(s.to_string()))?;
        Bitness::try_from(bits)
    }
}

impl fmt::Display for Bitness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

/// Text syntax used when formatting is enabled.
///
/// Not every engine supports every syntax; backends reject unsupported ones at
/// construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Syntax {
    #[default]
    Intel,
    Masm,
    Nasm,
    /// AT&T syntax.
    Gas,
    /// iced-x86's `FastFormatter` (Intel-like, fewer options).
    Fast,
}

impl Syntax {
    pub const ALL: [Syntax; 5] = [
        Syntax::Intel,
        Syntax::Masm,
        Syntax::Nasm,
        Syntax::Gas,
        Syntax::Fast,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Syntax::Intel => "intel",
            Syntax::Masm => "masm",
            Syntax::Nasm => "nasm",
            Syntax::Gas => "gas",
            Syntax::Fast => "fast",
        }
    }
}

impl FromStr for Syntax {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "att" => Ok(Syntax::Gas),
            name => Syntax::ALL
                .into_iter()
                .find(|syntax| syntax.name() == name)
                .ok_or_else(|| BenchError::UnknownSyntax(s.to_string())),
        }
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Construction-time settings shared by all backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BackendOptions {
    pub bitness: Bitness,
    pub syntax: Syntax,
}

/// Number of rounds to run.
///
/// `Auto` scales the round count so that every input processes roughly the same
/// number of bytes as 20 passes over the 0x2460400-byte reference input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopCount {
    Auto,
    Fixed(usize),
}

impl LoopCount {
    pub fn resolve(self, code_len: usize) -> usize {
        match self {
            LoopCount::Auto => auto_loop_count(code_len),
            LoopCount::Fixed(n) => n,
        }
    }
}

impl FromStr for LoopCount {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            return Ok(LoopCount::Auto);
        }
        let n = parse_int(s)?;
        usize::try_from(n)
            .map(LoopCount::Fixed)
            .map_err(|_| BenchError::InvalidInteger(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitness_parses_supported_widths_only() {
        assert_eq!("16".parse::<Bitness>().unwrap(), Bitness::Bits16);
        assert_eq!("32".parse::<Bitness>().unwrap(), Bitness::Bits32);
        assert_eq!("64".parse::<Bitness>().unwrap(), Bitness::Bits64);
        assert!(matches!(
            "8".parse::<Bitness>(),
            Err(BenchError::UnsupportedBitness(8))
        ));
        assert!(matches!(
            "sixty-four".parse::<Bitness>(),
            Err(BenchError::InvalidInteger(_))
        ));
    }

    #[test]
    fn syntax_names_round_trip_and_att_is_gas() {
        for syntax in Syntax::ALL {
            assert_eq!(syntax.name().parse::<Syntax>().unwrap(), syntax);
        }
        assert_eq!("ATT".parse::<Syntax>().unwrap(), Syntax::Gas);
        assert!(matches!(
            "yasm".parse::<Syntax>(),
            Err(BenchError::UnknownSyntax(name)) if name == "yasm"
        ));
    }

    #[test]
    fn loop_count_accepts_hex_decimal_and_auto() {
        assert_eq!("0x14".parse::<LoopCount>().unwrap(), LoopCount::Fixed(20));
        assert_eq!("3".parse::<LoopCount>().unwrap(), LoopCount::Fixed(3));
        assert_eq!("auto".parse::<LoopCount>().unwrap(), LoopCount::Auto);
        assert_eq!(LoopCount::Fixed(7).resolve(123), 7);
        assert_eq!(LoopCount::Auto.resolve(0x2460400), 20);
    }
}
