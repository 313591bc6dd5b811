//! Virtual machine main structure.

use crate::error::VmResult;
use crate::exec;
use crate::instruction::{Instruction, Opcode, Variant};
use crate::io::{Console, InputChannel, OutputChannel, Ports};
use crate::memory::Memory;

/// Registers and address space, the part of the VM opcodes mutate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmState {
    pub memory: Memory,
    pub ip: usize,
    pub relative_base: i64,
}

impl VmState {
    pub fn new(memory: Memory) -> Self {
        Self {
            memory,
            ip: 0,
            relative_base: 0,
        }
    }
}

/// One Intcode machine executing one program.
///
/// `ip` and the relative base persist across `run` calls, so a VM suspended
/// by `step_out` or by a failing input can be resumed.
#[derive(Debug)]
pub struct Vm {
    state: VmState,
    variant: Variant,
    console: Console,
}

impl Vm {
    /// Copies `program` into a new extended-variant VM.
    pub fn new(program: &[i64]) -> Self {
        Self::with_variant(program, Variant::default())
    }

    pub fn with_variant(program: &[i64], variant: Variant) -> Self {
        Self {
            state: VmState::new(Memory::new(program)),
            variant,
            console: Console::stdio(),
        }
    }

    /// Replaces the terminal used for prompts, ASCII I/O and traces.
    pub fn with_console(mut self, console: Console) -> Self {
        self.console = console;
        self
    }

    #[inline]
    pub fn memory(&self) -> &Memory {
        &self.state.memory
    }

    #[inline]
    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.state.memory
    }

    #[inline]
    pub fn ip(&self) -> usize {
        self.state.ip
    }

    pub fn set_ip(&mut self, ip: usize) {
        self.state.ip = ip;
    }

    #[inline]
    pub fn relative_base(&self) -> i64 {
        self.state.relative_base
    }

    /// Decodes the instruction at the current `ip` without executing it.
    pub fn current(&self) -> VmResult<Instruction> {
        Instruction::decode(&self.state.memory, self.state.ip, self.variant)
    }

    /// Runs until a halt instruction.
    pub fn run(
        &mut self,
        input: &mut InputChannel<'_>,
        output: &mut OutputChannel<'_>,
        trace: bool,
    ) -> VmResult<()> {
        log::debug!("run from ip {} ({} words)", self.state.ip, self.state.memory.len());
        let mut steps = 0u64;
        while self.step(input, output, trace)? {
            steps += 1;
        }
        log::debug!("halted at ip {} after {} steps", self.state.ip, steps);
        Ok(())
    }

    /// Decodes and executes one instruction. Returns `false` on halt.
    pub fn step(
        &mut self,
        input: &mut InputChannel<'_>,
        output: &mut OutputChannel<'_>,
        trace: bool,
    ) -> VmResult<bool> {
        let inst = self.current()?;
        if trace {
            writeln!(self.console.writer(), "{}", inst)?;
        }
        if inst.opcode == Opcode::Halt {
            return Ok(false);
        }

        let mut ports = Ports {
            input,
            output,
            console: &mut self.console,
        };
        exec::execute(&mut self.state, &inst, &mut ports)?;

        if !inst.opcode.is_jump() {
            self.state.ip += inst.width();
        }
        Ok(true)
    }

    /// Runs until the program produces exactly one value or halts (`None`).
    pub fn step_out(&mut self, input: &mut InputChannel<'_>, trace: bool) -> VmResult<Option<i64>> {
        let mut output = OutputChannel::values();
        while output.collected().is_empty() {
            if !self.step(input, &mut output, trace)? {
                log::debug!("step_out: halted at ip {}", self.state.ip);
                return Ok(None);
            }
        }
        Ok(output.collected().first().copied())
    }
}
