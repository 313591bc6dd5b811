//! Instruction format, opcodes and the decoder.
//!
//! An instruction word packs the opcode in its low two decimal digits and one
//! addressing-mode digit per argument above them:
//!
//! ```text
//!   1002  ->  opcode 02 (mul), modes [0, 1, 0]
//!   ^^^^
//!   |||+-- opcode (ones)
//!   ||+--- opcode (tens)
//!   |+---- mode of argument 0
//!   +----- mode of argument 1   (argument 2 absent -> 0)
//! ```

use core::fmt;
use core::str::FromStr;

use num_enum::TryFromPrimitive;

use crate::error::{VmError, VmResult};
use crate::memory::Memory;

/// Widest argument list of any opcode.
pub const MAX_ARGS: usize = 3;

/// Instruction-set revision understood by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    /// Opcodes 1-8 and 99, indirect and immediate modes only.
    Basic,
    /// Adds the relative base register: opcode 9 and relative mode.
    #[default]
    Extended,
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
pub enum Opcode {
    Add = 1,
    Mul = 2,
    In = 3,
    Out = 4,
    Jnz = 5,
    Jz = 6,
    SetLt = 7,
    SetEq = 8,
    SetBase = 9,
    Halt = 99,
}

impl Opcode {
    pub const ALL: [Opcode; 10] = [
        Opcode::Add,
        Opcode::Mul,
        Opcode::In,
        Opcode::Out,
        Opcode::Jnz,
        Opcode::Jz,
        Opcode::SetLt,
        Opcode::SetEq,
        Opcode::SetBase,
        Opcode::Halt,
    ];

    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Add => "add",
            Opcode::Mul => "mul",
            Opcode::In => "in",
            Opcode::Out => "out",
            Opcode::Jnz => "jnz",
            Opcode::Jz => "jz",
            Opcode::SetLt => "setlt",
            Opcode::SetEq => "seteq",
            Opcode::SetBase => "setb",
            Opcode::Halt => "halt",
        }
    }

    pub fn from_mnemonic(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.mnemonic() == name)
    }

    #[inline]
    pub fn nargs(self) -> usize {
        match self {
            Opcode::Add | Opcode::Mul | Opcode::SetLt | Opcode::SetEq => 3,
            Opcode::Jnz | Opcode::Jz => 2,
            Opcode::In | Opcode::Out | Opcode::SetBase => 1,
            Opcode::Halt => 0,
        }
    }

    /// Jumps move the instruction pointer themselves.
    #[inline]
    pub fn is_jump(self) -> bool {
        matches!(self, Opcode::Jnz | Opcode::Jz)
    }

    pub fn supported_by(self, variant: Variant) -> bool {
        variant == Variant::Extended || self != Opcode::SetBase
    }
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
pub enum Mode {
    Indirect = 0,
    Immediate = 1,
    Relative = 2,
}

// Written out by hand: `#[default]` would become a num_enum catch-all.
impl Default for Mode {
    fn default() -> Self {
        Mode::Indirect
    }
}

impl Mode {
    pub fn supported_by(self, variant: Variant) -> bool {
        variant == Variant::Extended || self != Mode::Relative
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Arg {
    pub mode: Mode,
    pub value: i64,
}

impl Arg {
    pub const fn new(mode: Mode, value: i64) -> Self {
        Self { mode, value }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            Mode::Indirect => write!(f, "{}", self.value),
            Mode::Immediate => write!(f, "#{}", self.value),
            Mode::Relative => write!(f, "B{:+}", self.value),
        }
    }
}

impl FromStr for Arg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (mode, digits) = if let Some(rest) = s.strip_prefix('#') {
            (Mode::Immediate, rest)
        } else if let Some(rest) = s.strip_prefix('B') {
            (Mode::Relative, rest)
        } else {
            (Mode::Indirect, s)
        };
        digits
            .parse::<i64>()
            .map(|value| Arg::new(mode, value))
            .map_err(|_| format!("bad argument `{}`", s))
    }
}

/// A decoded instruction. Lives for one step only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub ip: usize,
    pub opcode: Opcode,
    args: [Arg; MAX_ARGS],
}

impl Instruction {
    /// Builds an instruction from its parts; `args` beyond the opcode's
    /// argument count are ignored, missing ones default to `0`.
    pub fn new(ip: usize, opcode: Opcode, args: &[Arg]) -> Self {
        let mut packed = [Arg::default(); MAX_ARGS];
        for (slot, arg) in packed.iter_mut().zip(args.iter().take(opcode.nargs())) {
            *slot = *arg;
        }
        Self {
            ip,
            opcode,
            args: packed,
        }
    }

    /// Decodes the instruction at `ip`.
    pub fn decode(mem: &Memory, ip: usize, variant: Variant) -> VmResult<Self> {
        let word = mem.fetch(ip)?;
        let opcode = u8::try_from(word.rem_euclid(100))
            .ok()
            .and_then(|code| Opcode::try_from(code).ok())
            .filter(|op| op.supported_by(variant))
            .ok_or(VmError::InvalidOpcode { ip, word })?;

        let mut args = [Arg::default(); MAX_ARGS];
        let mut place = 100i64;
        for (i, slot) in args.iter_mut().enumerate().take(opcode.nargs()) {
            let digit = word.div_euclid(place).rem_euclid(10);
            let mode = Mode::try_from(digit as u8)
                .ok()
                .filter(|m| m.supported_by(variant))
                .ok_or(VmError::InvalidAddressingMode {
                    ip,
                    word,
                    mode: digit,
                })?;
            *slot = Arg::new(mode, mem.fetch(ip + 1 + i)?);
            place *= 10;
        }

        Ok(Self { ip, opcode, args })
    }

    #[inline]
    pub fn args(&self) -> &[Arg] {
        &self.args[..self.opcode.nargs()]
    }

    #[inline]
    pub fn arg(&self, idx: usize) -> Arg {
        self.args[idx]
    }

    /// Number of words the instruction occupies.
    #[inline]
    pub fn width(&self) -> usize {
        1 + self.opcode.nargs()
    }

    /// Packs the instruction back into its memory words.
    pub fn encode(&self) -> Vec<i64> {
        let mut word = self.opcode as i64;
        let mut place = 100i64;
        for arg in self.args() {
            word += arg.mode as i64 * place;
            place *= 10;
        }
        let mut words = Vec::with_capacity(self.width());
        words.push(word);
        words.extend(self.args().iter().map(|a| a.value));
        words
    }
}

/// Trace format: `<ip>: <mnemonic> <args...>`, ip right-aligned to 4.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:4}: {}", self.ip, self.opcode.mnemonic())?;
        for arg in self.args() {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}
