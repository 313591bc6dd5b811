//! Intcode virtual machine.
//!
//! This crate provides the interpreter for the Intcode instruction set:
//! - Growable memory image with indirect/immediate/relative addressing
//! - Decoder for packed opcode + addressing-mode words
//! - Executor for the fixed opcode table
//! - Pluggable input/output channels (terminal, ASCII, values, callbacks, queues)
//! - Linear disassembler and listing assembler

pub mod error;
pub mod memory;
pub mod instruction;
pub mod io;
pub mod exec;
pub mod vm;
pub mod loader;
pub mod disasm;
#[cfg(feature = "multithread")]
pub mod queue;
#[cfg(test)]
mod testing;

pub use error::{VmError, VmResult};
pub use memory::Memory;
pub use instruction::{Arg, Instruction, Mode, Opcode, Variant};
pub use io::{Console, InputChannel, OutputChannel};
pub use vm::Vm;
pub use loader::{load, load_reader, parse_program};
pub use disasm::{assemble, disassemble, write_listing};
#[cfg(feature = "multithread")]
pub use queue::{spawn, BlockingQueue};

/// Builds a VM for `program` and runs it to completion.
pub fn run(
    program: &[i64],
    input: &mut InputChannel<'_>,
    output: &mut OutputChannel<'_>,
    trace: bool,
) -> VmResult<Vm> {
    let mut vm = Vm::new(program);
    vm.run(input, output, trace)?;
    Ok(vm)
}
