//! Static disassembly and listing re-assembly.
//!
//! A listing uses the trace format, one instruction per line:
//!
//! ```text
//!    0: add 9 10 3
//!    4: mul 3 11 0
//!    8: halt
//! ```
//!
//! The address prefix is optional when assembling.

use std::io::Write;

use crate::error::{VmError, VmResult};
use crate::instruction::{Arg, Instruction, Opcode, Variant};
use crate::memory::Memory;

/// Decodes `program` linearly from address 0 without executing it.
///
/// Every word is treated as code, so embedded data that does not decode
/// stops the listing with the decoder's error.
pub fn disassemble(program: &[i64], variant: Variant) -> VmResult<Vec<Instruction>> {
    let mem = Memory::new(program);
    let mut listing = Vec::new();
    let mut ip = 0;
    while ip < mem.len() {
        let inst = Instruction::decode(&mem, ip, variant)?;
        ip += inst.width();
        listing.push(inst);
    }
    Ok(listing)
}

/// Prints the listing of `program`, stopping at the first undecodable word.
pub fn write_listing<W: Write>(out: &mut W, program: &[i64], variant: Variant) -> VmResult<()> {
    let mem = Memory::new(program);
    let mut ip = 0;
    while ip < mem.len() {
        let inst = Instruction::decode(&mem, ip, variant)?;
        writeln!(out, "{}", inst)?;
        ip += inst.width();
    }
    Ok(())
}

/// Packs a listing back into memory words.
pub fn assemble(listing: &str) -> VmResult<Vec<i64>> {
    let mut words = Vec::new();
    for (idx, raw) in listing.lines().enumerate() {
        let line_no = idx + 1;
        let err = |message: String| VmError::Assembly {
            line: line_no,
            message,
        };

        let mut body = raw.trim();
        if body.is_empty() {
            continue;
        }
        if let Some((addr, rest)) = body.split_once(':') {
            let addr: usize = addr
                .trim()
                .parse()
                .map_err(|_| err(format!("bad address `{}`", addr.trim())))?;
            if addr != words.len() {
                return Err(err(format!("address {} but next word is {}", addr, words.len())));
            }
            body = rest.trim();
        }

        let mut tokens = body.split_whitespace();
        let name = tokens.next().unwrap_or_default();
        let opcode =
            Opcode::from_mnemonic(name).ok_or_else(|| err(format!("unknown mnemonic `{}`", name)))?;
        let args = tokens
            .map(|t| t.parse::<Arg>().map_err(&err))
            .collect::<VmResult<Vec<_>>>()?;
        if args.len() != opcode.nargs() {
            return Err(err(format!(
                "{} takes {} arguments, got {}",
                name,
                opcode.nargs(),
                args.len()
            )));
        }

        words.extend(Instruction::new(words.len(), opcode, &args).encode());
    }
    Ok(words)
}
